//! Archival timestamps
//!
//! History entries record when they were archived as text in a
//! zone-qualified format:
//!
//! ```text
//! 18/10/2026, 15:03:05 AEST
//! ```
//!
//! The default zone is `Australia/Sydney` with the literal label `AEST`.
//! Sydney wall-clock time follows daylight saving; the label does not
//! change with it. A fixed UTC offset can be used instead.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Largest accepted offset from UTC, in minutes (18 hours)
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// IANA zone used when none is configured
pub const DEFAULT_TIME_ZONE: &str = "Australia/Sydney";

/// Label appended when none is configured
pub const DEFAULT_ZONE_LABEL: &str = "AEST";

const ARCHIVE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Invalid archive zone settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveZoneError {
    /// Offset is more than 18 hours from UTC
    #[error("utc offset {minutes} minutes is out of range (max ±{max})")]
    OffsetOutOfRange {
        /// Rejected offset
        minutes: i32,
        /// Largest accepted magnitude
        max: i32,
    },

    /// Zone name is not in the IANA database
    #[error("unknown time zone '{name}'")]
    UnknownZone {
        /// Rejected name
        name: String,
    },

    /// Label is empty
    #[error("zone label cannot be empty")]
    EmptyLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneRule {
    Named(Tz),
    Fixed(FixedOffset),
}

/// Zone used to render archival timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveZone {
    rule: ZoneRule,
    label: String,
}

impl ArchiveZone {
    /// Create a zone from an IANA name, e.g. `Australia/Sydney`
    ///
    /// # Errors
    ///
    /// Returns `ArchiveZoneError` if the name is unknown or the label is
    /// empty.
    pub fn named(name: &str, label: impl Into<String>) -> Result<Self, ArchiveZoneError> {
        let tz: Tz = name.parse().map_err(|_| ArchiveZoneError::UnknownZone {
            name: name.to_string(),
        })?;
        Self::with_rule(ZoneRule::Named(tz), label.into())
    }

    /// Create a zone from a fixed offset east of UTC
    ///
    /// # Errors
    ///
    /// Returns `ArchiveZoneError` if the offset exceeds ±18 hours or the
    /// label is empty.
    pub fn fixed(offset_minutes: i32, label: impl Into<String>) -> Result<Self, ArchiveZoneError> {
        let out_of_range = ArchiveZoneError::OffsetOutOfRange {
            minutes: offset_minutes,
            max: MAX_OFFSET_MINUTES,
        };
        if offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(out_of_range);
        }
        let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or(out_of_range)?;
        Self::with_rule(ZoneRule::Fixed(offset), label.into())
    }

    fn with_rule(rule: ZoneRule, label: String) -> Result<Self, ArchiveZoneError> {
        if label.is_empty() {
            return Err(ArchiveZoneError::EmptyLabel);
        }
        Ok(Self { rule, label })
    }

    /// Sydney wall-clock time labelled `AEST`
    pub fn aest() -> Self {
        Self {
            rule: ZoneRule::Named(Tz::Australia__Sydney),
            label: DEFAULT_ZONE_LABEL.to_string(),
        }
    }

    /// IANA name, or `None` for a fixed offset
    pub fn zone_name(&self) -> Option<&'static str> {
        match self.rule {
            ZoneRule::Named(tz) => Some(tz.name()),
            ZoneRule::Fixed(_) => None,
        }
    }

    /// Display label appended to rendered times
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Render an instant as `dd/mm/yyyy, HH:MM:SS <label>`
    pub fn render(&self, at: DateTime<Utc>) -> String {
        let local = match self.rule {
            ZoneRule::Named(tz) => at.with_timezone(&tz).format(ARCHIVE_FORMAT).to_string(),
            ZoneRule::Fixed(offset) => at.with_timezone(&offset).format(ARCHIVE_FORMAT).to_string(),
        };
        format!("{} {}", local, self.label)
    }

    /// Render the current instant
    pub fn now(&self) -> String {
        self.render(Utc::now())
    }
}

impl Default for ArchiveZone {
    fn default() -> Self {
        Self::aest()
    }
}
