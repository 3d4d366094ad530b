use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("ticket is empty")]
    Empty,

    #[error("ticket ({0}) contains non-alphanumeric characters")]
    NotAlphanumeric(String),
}

/// A validated, ASCII-alphanumeric ticket identifier.
///
/// The ticket names the artifact file, so this is the only sanitization
/// applied to file names. Repeated tickets map to the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    pub fn parse(value: impl Into<String>) -> Result<Self, TicketError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TicketError::Empty);
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TicketError::NotAlphanumeric(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Artifact file name for this ticket
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticket {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
