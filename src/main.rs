/*!
 * Sleeping TA - Main Entry Point
 *
 * Usage: sleeping-ta <num_students> [help_requests_per_student] [chairs]
 */

use sleeping_ta::core::limits::CHAIRS_ENV;
use sleeping_ta::{init_tracing, Office, OfficeConfig};
use tracing::{debug, info};

fn main() -> miette::Result<()> {
    init_tracing();

    let config = OfficeConfig::from_args(std::env::args().skip(1), std::env::var(CHAIRS_ENV).ok())?;
    let office = Office::new(config)?;

    info!(session_id = %office.session_id(), "Starting office hours");
    let report = office.run()?;

    info!(
        served = report.ta_served,
        rejections = report.stats.rejections,
        "All students helped"
    );
    if let Ok(json) = report.to_json() {
        debug!(report = %json, "Session report");
    }
    Ok(())
}
