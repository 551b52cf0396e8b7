/*!
 * Synchronization Primitives
 *
 * Blocking wake-up primitives used by the office protocol.
 *
 * # Architecture
 *
 * - `Semaphore`: counting signal on `parking_lot::{Mutex, Condvar}`; the TA
 *   sleeps on one of these until a student arrives or the office closes
 * - `WakeResult`: what a post did (woke a waiter or banked a permit)
 */

mod semaphore;

pub use semaphore::{Semaphore, WakeResult};
