use std::{error, fmt};

use crate::planner::PlanError;

#[derive(Debug)]
pub enum Error {
    /// Configuration could not be read or is invalid.
    Config(String),
    /// Output could not be written.
    Io(std::io::Error),
    /// Trajectory trace could not be written.
    Trace(csv::Error),
    /// Planner could not be constructed.
    Planner(PlanError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration: {}", e),
            Error::Io(e) => write!(f, "{}", e),
            Error::Trace(e) => write!(f, "trace: {}", e),
            Error::Planner(e) => write!(f, "planner: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Config(_) => None,
            Error::Io(e) => Some(e),
            Error::Trace(e) => Some(e),
            Error::Planner(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::Trace(value)
    }
}

impl From<PlanError> for Error {
    fn from(value: PlanError) -> Self {
        Error::Planner(value)
    }
}
