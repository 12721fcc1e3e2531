//! Error types for the greenhouse controller.
//!
//! Each subsystem has its own small `Copy` enum that converts into the
//! crate-wide [`Error`], so the control loop can report any failure through
//! one type.

use core::fmt;

use crate::alarms::AlarmCondition;
use crate::sensors::Quantity;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Preferences are inconsistent or could not be parsed.
    Config(ConfigError),
    /// A persisted file could not be read or written.
    Storage(StorageError),
    /// The alarm tracker rejected an update.
    Alarm(AlarmError),
    /// A rendering surface rejected a write.
    Display(DisplayError),
    /// An actuator output pin could not be driven.
    Actuator(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Alarm(e) => write!(f, "alarm: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Actuator(pin) => write!(f, "actuator: {pin} pin write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A low alarm limit is not strictly below its high limit.
    InvertedLimits(Quantity),
    /// A simulator range has `min >= max`.
    EmptyRange(Quantity),
    /// A limit, range bound or setpoint is NaN or infinite.
    NotFinite(Quantity),
    /// The tick interval is zero.
    ZeroInterval,
    /// The preferences file is not valid JSON for [`crate::preferences::Preferences`].
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedLimits(q) => write!(f, "{q} low alarm limit must be below the high limit"),
            Self::EmptyRange(q) => write!(f, "{q} sensor range minimum must be below the maximum"),
            Self::NotFinite(q) => write!(f, "{q} value is not a finite number"),
            Self::ZeroInterval => write!(f, "tick interval must be non-zero"),
            Self::Malformed => write!(f, "preferences file is malformed"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The file could not be opened or created.
    Open,
    /// Reading from the file failed.
    Read,
    /// Writing to the file failed.
    Write,
    /// A setpoint record has the wrong size or holds non-finite values.
    Corrupt { expected: usize, found: usize },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "could not open file"),
            Self::Read => write!(f, "read failed"),
            Self::Write => write!(f, "write failed"),
            Self::Corrupt { expected, found } => {
                write!(f, "corrupt record (expected {expected} bytes, found {found})")
            }
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Alarm errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmError {
    /// No room was left to record a newly raised alarm. The tracker is
    /// unchanged and the condition is retried on the next tick.
    Exhausted(AlarmCondition),
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted(c) => write!(f, "no room to record {c}"),
        }
    }
}

impl From<AlarmError> for Error {
    fn from(e: AlarmError) -> Self {
        Self::Alarm(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// A pixel or bar lies outside the 8x8 surface.
    OutOfBounds,
    /// A formatted line did not fit its fixed-capacity buffer.
    LineOverflow,
    /// The underlying device refused the write.
    Device,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "coordinates outside the surface"),
            Self::LineOverflow => write!(f, "line too long"),
            Self::Device => write!(f, "device write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
