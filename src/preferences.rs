use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StorageError};
use crate::sensors::Quantity;
use crate::timer::TICK_INTERVAL_MS;

/// Size of a persisted [`Setpoints`] record: two little-endian `f32`s.
pub const SETPOINT_RECORD_LEN: usize = 8;

/// Target values the heater and humidifier steer towards.
/// temperature: Celsius
/// humidity: relative humidity percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setpoints {
    pub temperature: f32,
    pub humidity: f32,
}

impl Default for Setpoints {
    fn default() -> Self {
        Setpoints {
            temperature: 25.0,
            humidity: 55.0,
        }
    }
}

impl Setpoints {
    /// Encodes the fixed 8-byte record, temperature first.
    pub fn to_record(&self) -> Result<[u8; SETPOINT_RECORD_LEN], StorageError> {
        let mut record = [0u8; SETPOINT_RECORD_LEN];
        let written = postcard::to_slice(self, &mut record)
            .map_err(|_| StorageError::Write)?
            .len();
        if written != SETPOINT_RECORD_LEN {
            return Err(StorageError::Corrupt {
                expected: SETPOINT_RECORD_LEN,
                found: written,
            });
        }
        Ok(record)
    }

    /// Decodes a record written by [`Setpoints::to_record`].
    pub fn from_record(bytes: &[u8]) -> Result<Self, StorageError> {
        let corrupt = StorageError::Corrupt {
            expected: SETPOINT_RECORD_LEN,
            found: bytes.len(),
        };
        if bytes.len() != SETPOINT_RECORD_LEN {
            return Err(corrupt);
        }
        let setpoints: Setpoints = postcard::from_bytes(bytes).map_err(|_| corrupt)?;
        if !setpoints.temperature.is_finite() || !setpoints.humidity.is_finite() {
            return Err(corrupt);
        }
        Ok(setpoints)
    }
}

/// Inclusive alarm thresholds. A reading at or above a high limit, or at or
/// below a low limit, raises the matching alarm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmLimits {
    pub high_temp: f32,
    pub low_temp: f32,
    pub high_humidity: f32,
    pub low_humidity: f32,
    pub high_pressure: f32,
    pub low_pressure: f32,
}

impl Default for AlarmLimits {
    fn default() -> Self {
        AlarmLimits {
            high_temp: 30.0,
            low_temp: 10.0,
            high_humidity: 70.0,
            low_humidity: 25.0,
            high_pressure: 1016.0,
            low_pressure: 985.0,
        }
    }
}

impl AlarmLimits {
    /// (low, high) pair for a quantity
    pub fn bounds(&self, quantity: Quantity) -> (f32, f32) {
        match quantity {
            Quantity::Temperature => (self.low_temp, self.high_temp),
            Quantity::Humidity => (self.low_humidity, self.high_humidity),
            Quantity::Pressure => (self.low_pressure, self.high_pressure),
        }
    }

    /// Rejects limit pairs that would leave an alarm permanently raised or
    /// permanently silent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for quantity in Quantity::ALL {
            let (low, high) = self.bounds(quantity);
            if !low.is_finite() || !high.is_finite() {
                return Err(ConfigError::NotFinite(quantity));
            }
            if low >= high {
                return Err(ConfigError::InvertedLimits(quantity));
            }
        }
        Ok(())
    }
}

/// Half-open `[min, max)` span a simulated sensor draws from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorRange {
    pub min: f32,
    pub max: f32,
}

impl SensorRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Position of `value` inside the range, 0.0 at `min` and 1.0 at `max`
    pub fn fraction(&self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorRanges {
    pub temperature: SensorRange,
    pub humidity: SensorRange,
    pub pressure: SensorRange,
}

impl Default for SensorRanges {
    fn default() -> Self {
        SensorRanges {
            temperature: SensorRange::new(-10.0, 50.0),
            humidity: SensorRange::new(0.0, 100.0),
            pressure: SensorRange::new(975.0, 1016.0),
        }
    }
}

impl SensorRanges {
    pub fn get(&self, quantity: Quantity) -> SensorRange {
        match quantity {
            Quantity::Temperature => self.temperature,
            Quantity::Humidity => self.humidity,
            Quantity::Pressure => self.pressure,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for quantity in Quantity::ALL {
            let range = self.get(quantity);
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(ConfigError::NotFinite(quantity));
            }
            if range.min >= range.max {
                return Err(ConfigError::EmptyRange(quantity));
            }
        }
        Ok(())
    }
}

/// Preferences holds everything loaded once at startup and read-only
/// afterwards.
/// limits: alarm thresholds
/// ranges: span of the simulated sensors, also used to scale the gauges
/// tick_interval_ms: delay between control loop ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub limits: AlarmLimits,
    pub ranges: SensorRanges,
    pub tick_interval_ms: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            limits: AlarmLimits::default(),
            ranges: SensorRanges::default(),
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.ranges.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Parses a JSON preferences file. Missing fields keep their defaults.
    #[cfg(feature = "std")]
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let preferences: Preferences = serde_json::from_slice(bytes).map_err(|e| {
            log::error!("preferences parse error: {e}");
            ConfigError::Malformed
        })?;
        preferences.validate()?;
        Ok(preferences)
    }
}
