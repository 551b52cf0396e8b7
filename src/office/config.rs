/*!
 * Office Configuration
 *
 * Student count, request count, chair count and pacing for one run.
 */

use super::pacing::DelayPolicy;
use crate::core::errors::ConfigError;
use crate::core::limits::*;
use serde::{Deserialize, Serialize};

/// Configuration for one office run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeConfig {
    /// Number of student threads
    pub students: u32,

    /// Help sessions each student needs before going home
    pub requests_per_student: u32,

    /// Hallway chairs (waiting room capacity)
    pub chairs: usize,

    /// Time a student programs before each attempt, including retries
    pub think: DelayPolicy,

    /// Time the TA spends helping one student
    pub service: DelayPolicy,
}

impl OfficeConfig {
    /// Default classroom: three chairs and human-scale timings
    pub fn classroom(students: u32) -> Self {
        Self {
            students,
            requests_per_student: DEFAULT_REQUESTS_PER_STUDENT,
            chairs: DEFAULT_CHAIRS,
            think: DelayPolicy::uniform(THINK_MIN, THINK_MAX),
            service: DelayPolicy::uniform(SERVICE_MIN, SERVICE_MAX),
        }
    }

    /// No pacing at all (testing only)
    pub fn instant(students: u32, requests_per_student: u32, chairs: usize) -> Self {
        Self {
            students,
            requests_per_student,
            chairs,
            think: DelayPolicy::None,
            service: DelayPolicy::None,
        }
    }

    pub fn builder() -> OfficeConfigBuilder {
        OfficeConfigBuilder::new()
    }

    /// Reject non-positive counts and inverted delay ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.students == 0 {
            return Err(ConfigError::NoStudents);
        }
        if self.requests_per_student == 0 {
            return Err(ConfigError::NoRequests);
        }
        if self.chairs == 0 {
            return Err(ConfigError::NoChairs);
        }
        self.think.validate()?;
        self.service.validate()?;
        Ok(())
    }

    /// Parse `<num_students> [help_requests_per_student] [chairs]`
    ///
    /// `env_chairs` is consulted only when the chair argument is absent.
    /// The result is validated.
    pub fn from_args<I, S>(args: I, env_chairs: Option<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();

        let students = match args.next() {
            Some(raw) => parse_arg("num_students", raw.as_ref())?,
            None => return Err(ConfigError::MissingArgument("num_students".into())),
        };

        let mut config = Self::classroom(students);

        if let Some(raw) = args.next() {
            config.requests_per_student = parse_arg("help_requests_per_student", raw.as_ref())?;
        }

        match args.next() {
            Some(raw) => config.chairs = parse_arg("chairs", raw.as_ref())?,
            None => {
                if let Some(raw) = env_chairs {
                    config.chairs = parse_arg(CHAIRS_ENV, &raw)?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self::classroom(1)
    }
}

fn parse_arg<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidArgument {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

/// Builder for `OfficeConfig`
#[derive(Debug, Clone)]
pub struct OfficeConfigBuilder {
    config: OfficeConfig,
}

impl OfficeConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: OfficeConfig::default(),
        }
    }

    pub fn students(mut self, students: u32) -> Self {
        self.config.students = students;
        self
    }

    pub fn requests_per_student(mut self, requests: u32) -> Self {
        self.config.requests_per_student = requests;
        self
    }

    pub fn chairs(mut self, chairs: usize) -> Self {
        self.config.chairs = chairs;
        self
    }

    pub fn think(mut self, think: DelayPolicy) -> Self {
        self.config.think = think;
        self
    }

    pub fn service(mut self, service: DelayPolicy) -> Self {
        self.config.service = service;
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<OfficeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for OfficeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
