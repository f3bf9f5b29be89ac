use std::fmt::{self, Display};
use std::time::Duration;

use crate::wlan::WlanError;

/// The external step of a join that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStep {
    AddProfile,
    Connect,
    /// Polling the adapters for the requested SSID.
    Associate,
    DeleteProfile,
}

impl Display for JoinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            JoinStep::AddProfile => "add profile",
            JoinStep::Connect => "connect",
            JoinStep::Associate => "check association",
            JoinStep::DeleteProfile => "delete profile",
        };
        f.write_str(step)
    }
}

#[derive(Debug)]
pub enum JoinError {
    /// Rejected before anything was written or executed.
    InvalidSsid(String),
    IoError(std::io::Error),
    Step { step: JoinStep, source: WlanError },
    /// Connect was accepted but no adapter reported the SSID in time.
    NotAssociated { ssid: String, waited: Duration },
}

impl JoinError {
    /// The failing step, when the error came from an external tool.
    pub fn step(&self) -> Option<JoinStep> {
        match self {
            JoinError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JoinError {
    fn from(err: std::io::Error) -> JoinError {
        JoinError::IoError(err)
    }
}

impl Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::InvalidSsid(reason) => write!(f, "Invalid SSID: {}", reason),
            JoinError::IoError(e) => write!(f, "IO error: {}", e),
            JoinError::Step { step, source } => write!(f, "{} failed: {}", step, source),
            JoinError::NotAssociated { ssid, waited } => write!(
                f,
                "no adapter associated with '{}' within {:.1}s",
                ssid,
                waited.as_secs_f64()
            ),
        }
    }
}

impl std::error::Error for JoinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JoinError::IoError(e) => Some(e),
            JoinError::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}
