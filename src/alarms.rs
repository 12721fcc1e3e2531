//! Threshold evaluation and the set of currently active alarms.
//!
//! Every tick the six alarm conditions are evaluated against the latest
//! [`Reading`] and the outcome is folded into an [`AlarmTracker`]:
//!
//! 1. A condition that just became true is appended as a new [`ActiveAlarm`].
//! 2. A condition that is still true has its timestamp and value refreshed
//!    in place, keeping its position.
//! 3. A condition that became false is removed; the remaining alarms keep
//!    their relative order.
//!
//! The tracker therefore always lists alarms in the order they were raised,
//! which is the order a display shows them in.

use core::fmt;

use heapless::Vec;
use log::{info, warn};

use crate::clock::Timestamp;
use crate::error::AlarmError;
use crate::preferences::AlarmLimits;
use crate::sensors::{Quantity, Reading};

/// Upper bound on simultaneously active alarms: one per condition.
pub const MAX_ACTIVE_ALARMS: usize = AlarmCondition::ALL.len();

/// Which side of the acceptable band a condition guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    High,
    Low,
}

/// One of the six monitored threshold checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmCondition {
    HighTemperature,
    LowTemperature,
    HighHumidity,
    LowHumidity,
    HighPressure,
    LowPressure,
}

impl AlarmCondition {
    /// Canonical evaluation order.
    pub const ALL: [AlarmCondition; 6] = [
        AlarmCondition::HighTemperature,
        AlarmCondition::LowTemperature,
        AlarmCondition::HighHumidity,
        AlarmCondition::LowHumidity,
        AlarmCondition::HighPressure,
        AlarmCondition::LowPressure,
    ];

    pub const fn quantity(self) -> Quantity {
        match self {
            AlarmCondition::HighTemperature | AlarmCondition::LowTemperature => {
                Quantity::Temperature
            }
            AlarmCondition::HighHumidity | AlarmCondition::LowHumidity => Quantity::Humidity,
            AlarmCondition::HighPressure | AlarmCondition::LowPressure => Quantity::Pressure,
        }
    }

    pub const fn bound(self) -> Bound {
        match self {
            AlarmCondition::HighTemperature
            | AlarmCondition::HighHumidity
            | AlarmCondition::HighPressure => Bound::High,
            AlarmCondition::LowTemperature
            | AlarmCondition::LowHumidity
            | AlarmCondition::LowPressure => Bound::Low,
        }
    }

    pub fn limit(self, limits: &AlarmLimits) -> f32 {
        let (low, high) = limits.bounds(self.quantity());
        match self.bound() {
            Bound::High => high,
            Bound::Low => low,
        }
    }

    /// Both boundaries are inclusive. NaN never triggers.
    pub fn is_triggered(self, value: f32, limits: &AlarmLimits) -> bool {
        let limit = self.limit(limits);
        match self.bound() {
            Bound::High => value >= limit,
            Bound::Low => value <= limit,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AlarmCondition::HighTemperature => "High Temperature",
            AlarmCondition::LowTemperature => "Low Temperature",
            AlarmCondition::HighHumidity => "High Humidity",
            AlarmCondition::LowHumidity => "Low Humidity",
            AlarmCondition::HighPressure => "High Pressure",
            AlarmCondition::LowPressure => "Low Pressure",
        }
    }
}

impl fmt::Display for AlarmCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of checking one condition against one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub condition: AlarmCondition,
    pub active: bool,
    /// The reading value the condition was checked against.
    pub value: f32,
}

/// Checks every condition against `reading`, in canonical order.
pub fn evaluate(reading: &Reading, limits: &AlarmLimits) -> [Verdict; MAX_ACTIVE_ALARMS] {
    AlarmCondition::ALL.map(|condition| {
        let value = reading.value(condition.quantity());
        Verdict {
            condition,
            active: condition.is_triggered(value, limits),
            value,
        }
    })
}

/// A condition that is currently true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveAlarm {
    pub condition: AlarmCondition,
    /// Time of the most recent reading that triggered the condition.
    pub observed_at: Timestamp,
    /// Value of the most recent triggering reading.
    pub value: f32,
}

/// What a single [`AlarmTracker::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmChange {
    Raised,
    Refreshed,
    Cleared,
    Unchanged,
}

/// The set of currently active alarms, keyed by condition, in the order they
/// were raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmTracker {
    active: Vec<ActiveAlarm, MAX_ACTIVE_ALARMS>,
}

impl AlarmTracker {
    pub const fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Upserts or removes `condition` depending on `is_active`.
    ///
    /// On error the tracker is left exactly as it was.
    pub fn apply(
        &mut self,
        condition: AlarmCondition,
        is_active: bool,
        observed_at: Timestamp,
        value: f32,
    ) -> Result<AlarmChange, AlarmError> {
        let position = self.position(condition);
        match (is_active, position) {
            (true, Some(i)) => {
                let alarm = &mut self.active[i];
                alarm.observed_at = observed_at;
                alarm.value = value;
                Ok(AlarmChange::Refreshed)
            }
            (true, None) => {
                self.active
                    .push(ActiveAlarm {
                        condition,
                        observed_at,
                        value,
                    })
                    .map_err(|_| AlarmError::Exhausted(condition))?;
                Ok(AlarmChange::Raised)
            }
            (false, Some(i)) => {
                // order-preserving removal
                self.active.remove(i);
                Ok(AlarmChange::Cleared)
            }
            (false, None) => Ok(AlarmChange::Unchanged),
        }
    }

    /// Evaluates `reading` and applies all six verdicts in canonical order.
    ///
    /// A failed insert does not stop the remaining conditions; the first
    /// failure is returned once every condition has been applied.
    pub fn update(&mut self, reading: &Reading, limits: &AlarmLimits) -> Result<(), AlarmError> {
        let mut first_error = None;
        for verdict in evaluate(reading, limits) {
            match self.apply(verdict.condition, verdict.active, reading.timestamp, verdict.value) {
                Ok(AlarmChange::Raised) => {
                    warn!("ALARM RAISED: {} ({})", verdict.condition, verdict.value);
                }
                Ok(AlarmChange::Cleared) => {
                    info!("ALARM CLEARED: {}", verdict.condition);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("alarm update skipped: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn get(&self, condition: AlarmCondition) -> Option<&ActiveAlarm> {
        self.active.iter().find(|a| a.condition == condition)
    }

    pub fn contains(&self, condition: AlarmCondition) -> bool {
        self.position(condition).is_some()
    }

    /// Active alarms, oldest raise first.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveAlarm> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn position(&self, condition: AlarmCondition) -> Option<usize> {
        self.active.iter().position(|a| a.condition == condition)
    }
}

impl<'a> IntoIterator for &'a AlarmTracker {
    type Item = &'a ActiveAlarm;
    type IntoIter = core::slice::Iter<'a, ActiveAlarm>;

    fn into_iter(self) -> Self::IntoIter {
        self.active.iter()
    }
}
