//! Label request validation.
//!
//! A [`LabelRequest`] is built exactly once per run from the raw command
//! input and is immutable afterwards. Validation is fail-closed: the first
//! offending field aborts with an error naming that field, and nothing
//! downstream (template patching, provisioning, printing) runs.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::product::ProductCode;

/// Inclusive upper bound on distinct label instances per run.
pub const MAX_INSTANCES: u32 = 25;
/// Inclusive upper bound on printer-level copies per instance.
pub const MAX_COPIES: u32 = 5;

// ── Errors ──────────────────────────────────────────────────────────────────

/// A request field that failed syntax or policy validation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The type code does not match the accepted grammar.
    #[error("invalid type: {0}")]
    Type(String),

    /// The version is not `2.<minor>` with a canonical minor.
    #[error("invalid version: {0}")]
    Version(String),

    /// The serial number is neither `-` nor ten digits starting with `5`.
    #[error("invalid serial number: {0}")]
    Serial(String),

    /// The build date is not a canonical `YYYY-MM` string.
    #[error("invalid build date: {0}")]
    BuildDate(String),

    /// The build date lies before the current month (freshness guard).
    #[error("build date {date} is before the current month {current}")]
    StaleBuildDate {
        /// The requested build date.
        date: BuildDate,
        /// The year-month the date was checked against.
        current: BuildDate,
    },
}

/// A count option outside its permitted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid {field}: {value} (must be {min}..={max})")]
pub struct RangeError {
    /// Name of the offending option.
    pub field: &'static str,
    /// Inclusive lower bound.
    pub min: u32,
    /// Inclusive upper bound.
    pub max: u32,
    /// The rejected value.
    pub value: u32,
}

/// Any failure while constructing a [`LabelRequest`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A field failed syntax or policy validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A count option was out of bounds.
    #[error(transparent)]
    Range(#[from] RangeError),
}

// ── Field types ─────────────────────────────────────────────────────────────

/// A firmware version as printed on the label.
///
/// Major version is fixed at 2; the minor is `0` or a positive integer
/// without leading zeros, so every version has exactly one spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl FromStr for Version {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minor = s
            .strip_prefix("2.")
            .ok_or_else(|| ValidationError::Version(s.to_string()))?;
        let canonical = !minor.is_empty()
            && minor.bytes().all(|b| b.is_ascii_digit())
            && (minor == "0" || !minor.starts_with('0'));
        if !canonical {
            return Err(ValidationError::Version(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl Version {
    /// The literal version string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the per-instance serial number is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialAssignment {
    /// Fetch a fresh serial from the provisioning service for each instance.
    Auto,
    /// Use this literal serial for every instance; no network access.
    Literal(String),
}

impl FromStr for SerialAssignment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Self::Auto);
        }
        let well_formed =
            s.len() == 10 && s.starts_with('5') && s.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(ValidationError::Serial(s.to_string()));
        }
        Ok(Self::Literal(s.to_string()))
    }
}

/// A label build date with month resolution.
///
/// The derived ordering compares `(year, month)` lexicographically, which is
/// what the freshness guard relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BuildDate {
    /// Four-digit year.
    pub year: u16,
    /// Month, 1–12.
    pub month: u8,
}

impl FromStr for BuildDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::BuildDate(s.to_string());

        // Canonical form only: 4-digit year, dash, zero-padded 2-digit month.
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        if y.len() != 4
            || m.len() != 2
            || !y.bytes().all(|b| b.is_ascii_digit())
            || !m.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year = y.parse().map_err(|_| invalid())?;
        let month: u8 = m.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }
}

impl fmt::Display for BuildDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ── Request ─────────────────────────────────────────────────────────────────

/// The six request fields as they arrive from the command line, unvalidated.
#[derive(Debug, Clone)]
pub struct RequestFields<'a> {
    /// Type code, e.g. `WARP2-CS-11KW-50`.
    pub type_code: &'a str,
    /// Version string, e.g. `2.17`.
    pub version: &'a str,
    /// Serial number or the `-` auto-assign marker.
    pub serial_number: &'a str,
    /// Build date, `YYYY-MM`.
    pub build_date: &'a str,
    /// Number of distinct labels to generate.
    pub instances: u32,
    /// Printer-level copies of each label.
    pub copies: u32,
    /// Accept a build date earlier than the current month.
    pub allow_past_build_date: bool,
}

/// One validated, normalized label-generation request.
#[derive(Debug, Clone)]
pub struct LabelRequest {
    /// Validated product type code.
    pub product: ProductCode,
    /// Validated firmware version.
    pub version: Version,
    /// Serial assignment mode.
    pub serial: SerialAssignment,
    /// Validated build date.
    pub build_date: BuildDate,
    /// Distinct labels to generate, `1..=`[`MAX_INSTANCES`].
    pub instances: u32,
    /// Printer copies per label, `1..=`[`MAX_COPIES`].
    pub copies: u32,
}

impl LabelRequest {
    /// Validate the raw request fields against syntax and policy rules.
    ///
    /// `current` is the year-month the freshness guard compares against;
    /// callers pass it in so validation itself carries no clock dependency.
    pub fn validate(fields: &RequestFields<'_>, current: BuildDate) -> Result<Self, RequestError> {
        let product: ProductCode = fields.type_code.parse()?;
        let version: Version = fields.version.parse()?;
        let serial: SerialAssignment = fields.serial_number.parse()?;
        let build_date: BuildDate = fields.build_date.parse()?;

        if !fields.allow_past_build_date && build_date < current {
            return Err(ValidationError::StaleBuildDate {
                date: build_date,
                current,
            }
            .into());
        }

        let instances = check_range("instances", fields.instances, 1, MAX_INSTANCES)?;
        let copies = check_range("copies", fields.copies, 1, MAX_COPIES)?;

        Ok(Self {
            product,
            version,
            serial,
            build_date,
            instances,
            copies,
        })
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32, RangeError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(RangeError {
            field,
            min,
            max,
            value,
        })
    }
}
