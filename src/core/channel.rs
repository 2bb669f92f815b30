//! Severity channel definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A severity category with its own sink.
///
/// Every channel except [`Channel::Fatal`] also owns an in-memory buffer
/// in [`BufferedLogger`](crate::BufferedLogger). Fatal lines are always
/// written synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Info = 0,
    Error = 1,
    Warning = 2,
    Success = 3,
    Record = 4,
    Raw = 5,
    Fatal = 6,
}

impl Channel {
    /// Buffered channels, in drain order.
    pub const BUFFERED: [Channel; 6] = [
        Channel::Info,
        Channel::Error,
        Channel::Warning,
        Channel::Success,
        Channel::Record,
        Channel::Raw,
    ];

    /// All channels, including fatal.
    pub const ALL: [Channel; 7] = [
        Channel::Info,
        Channel::Error,
        Channel::Warning,
        Channel::Success,
        Channel::Record,
        Channel::Raw,
        Channel::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Info => "info",
            Channel::Error => "error",
            Channel::Warning => "warning",
            Channel::Success => "success",
            Channel::Record => "record",
            Channel::Raw => "raw",
            Channel::Fatal => "fatal",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn is_buffered(&self) -> bool {
        !matches!(self, Channel::Fatal)
    }

    /// Console color for this channel, `None` to leave the line untouched.
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self {
            Channel::Info | Channel::Record | Channel::Raw => None,
            Channel::Error => Some(Red),
            Channel::Warning => Some(Yellow),
            Channel::Success => Some(Green),
            Channel::Fatal => Some(BrightRed),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Channel::Info),
            "error" => Ok(Channel::Error),
            "warning" | "warn" => Ok(Channel::Warning),
            "success" => Ok(Channel::Success),
            "record" => Ok(Channel::Record),
            "raw" => Ok(Channel::Raw),
            "fatal" => Ok(Channel::Fatal),
            _ => Err(format!("Invalid channel: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_order_and_indices() {
        for (i, channel) in Channel::BUFFERED.iter().enumerate() {
            assert_eq!(channel.index(), i);
            assert!(channel.is_buffered());
        }
        assert!(!Channel::Fatal.is_buffered());
    }

    #[test]
    fn test_parse() {
        assert_eq!("WARN".parse::<Channel>(), Ok(Channel::Warning));
        assert_eq!("Success".parse::<Channel>(), Ok(Channel::Success));
        assert!("debug".parse::<Channel>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Channel::Record).unwrap();
        assert_eq!(json, "\"record\"");
    }
}
