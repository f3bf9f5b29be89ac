use std::fmt::{self, Display};

/// A central error enum for everything that talks to the OS wireless stack.
#[derive(Debug)]
pub enum WlanError {
    IoError(std::io::Error),
    /// The external tool ran but reported failure.
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
    ParseError(String),
    Other(String),
}

/// Convert from std::io::Error.
impl From<std::io::Error> for WlanError {
    fn from(err: std::io::Error) -> WlanError {
        WlanError::IoError(err)
    }
}

impl Display for WlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WlanError::IoError(e) => write!(f, "IO error: {}", e),
            WlanError::CommandFailed {
                command,
                code,
                output,
            } => {
                match code {
                    Some(code) => write!(f, "`{}` exited with code {}", command, code)?,
                    None => write!(f, "`{}` was terminated", command)?,
                }
                if !output.is_empty() {
                    write!(f, ": {}", output)?;
                }
                Ok(())
            }
            WlanError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            WlanError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for WlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WlanError::IoError(e) => Some(e),
            _ => None,
        }
    }
}
