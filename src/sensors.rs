use core::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, Timestamp};
use crate::preferences::{SensorRange, SensorRanges};

/// A monitored physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Temperature,
    Humidity,
    Pressure,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Temperature, Quantity::Humidity, Quantity::Pressure];

    /// Display unit: Celsius, percent relative humidity, millibars
    pub const fn unit(self) -> &'static str {
        match self {
            Quantity::Temperature => "C",
            Quantity::Humidity => "%",
            Quantity::Pressure => "mb",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperature",
            Quantity::Humidity => "Humidity",
            Quantity::Pressure => "Pressure",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sample of every sensor, taken once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: Timestamp,
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
}

impl Reading {
    pub fn value(&self, quantity: Quantity) -> f32 {
        match quantity {
            Quantity::Temperature => self.temperature,
            Quantity::Humidity => self.humidity,
            Quantity::Pressure => self.pressure,
        }
    }
}

/// Anything that can produce a [`Reading`] on demand.
///
/// Sources are total: a simulated source always has a value, and a hardware
/// source is expected to substitute its last good sample on a failed read.
pub trait ReadingSource {
    fn get_reading(&mut self) -> Reading;
}

/// Pseudo-random sensor values, uniformly distributed inside the configured
/// ranges.
pub struct SimulatedSource<C: Clock> {
    rng: ChaCha8Rng,
    ranges: SensorRanges,
    clock: C,
}

impl<C: Clock> SimulatedSource<C> {
    /// `ranges` must already be validated (`min < max` for every quantity).
    pub fn new(ranges: SensorRanges, clock: C, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ranges,
            clock,
        }
    }

    fn sample(&mut self, range: SensorRange) -> f32 {
        self.rng.random_range(range.min..range.max)
    }
}

impl<C: Clock> ReadingSource for SimulatedSource<C> {
    fn get_reading(&mut self) -> Reading {
        let timestamp = self.clock.now();
        let temperature = self.sample(self.ranges.temperature);
        let humidity = self.sample(self.ranges.humidity);
        let pressure = self.sample(self.ranges.pressure);
        Reading {
            timestamp,
            temperature,
            humidity,
            pressure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            Timestamp(self.0)
        }
    }

    #[test]
    fn simulated_values_stay_in_range() {
        let ranges = SensorRanges::default();
        let mut source = SimulatedSource::new(ranges, FixedClock(42), 7);
        for _ in 0..500 {
            let r = source.get_reading();
            assert_eq!(r.timestamp, Timestamp(42));
            for q in Quantity::ALL {
                let range = ranges.get(q);
                let v = r.value(q);
                assert!(v >= range.min && v < range.max, "{q} {v} outside range");
            }
        }
    }

    #[test]
    fn same_seed_same_readings() {
        let ranges = SensorRanges::default();
        let mut a = SimulatedSource::new(ranges, FixedClock(0), 1234);
        let mut b = SimulatedSource::new(ranges, FixedClock(0), 1234);
        for _ in 0..10 {
            assert_eq!(a.get_reading(), b.get_reading());
        }
    }

    #[test]
    fn reading_value_selects_quantity() {
        let r = Reading {
            timestamp: Timestamp(0),
            temperature: 21.5,
            humidity: 48.0,
            pressure: 1001.0,
        };
        assert_eq!(r.value(Quantity::Temperature), 21.5);
        assert_eq!(r.value(Quantity::Humidity), 48.0);
        assert_eq!(r.value(Quantity::Pressure), 1001.0);
    }
}
