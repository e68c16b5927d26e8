use std::fmt;

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => anyhow::bail!("invalid priority '{s}': must be high, medium, or low"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high before medium before low.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Low
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    College,
    Other,
}

impl Category {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "college" => Ok(Self::College),
            "other" => Ok(Self::Other),
            _ => anyhow::bail!("invalid category '{s}': must be work, personal, college, or other"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::College => "college",
            Self::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Work
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub deadline: Option<DateTime<Local>>,
    pub priority: Priority,
    pub category: Category,
    /// True once a reminder has fired for this task. Never resets.
    pub reminded_at: bool,
}

impl Task {
    pub fn icon(&self) -> &'static str {
        if self.done {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a user-supplied deadline in local time.
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, the `T`-separated variant, and a bare
/// date (taken as midnight).
pub fn parse_deadline(s: &str) -> anyhow::Result<DateTime<Local>> {
    let s = s.trim();
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .with_context(|| format!("invalid deadline '{s}': expected YYYY-MM-DD[ HH:MM[:SS]]"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("deadline '{s}' does not exist in the local timezone"))
}

pub fn format_deadline(deadline: &DateTime<Local>) -> String {
    deadline.format("%Y-%m-%d %H:%M").to_string()
}
