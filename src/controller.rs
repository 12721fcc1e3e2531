use crate::alarms::AlarmTracker;
use crate::controls::Controls;
use crate::error::AlarmError;
use crate::preferences::{Preferences, Setpoints};
use crate::sensors::{Reading, ReadingSource};

/// Everything produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub reading: Reading,
    pub controls: Controls,
    /// Set when an alarm could not be recorded this tick. The rest of the
    /// alarm set is still up to date.
    pub alarm_error: Option<AlarmError>,
}

/// Owns the reading source and the alarm state across ticks.
pub struct Controller<S: ReadingSource> {
    source: S,
    preferences: Preferences,
    setpoints: Setpoints,
    tracker: AlarmTracker,
}

impl<S: ReadingSource> Controller<S> {
    /// `preferences` must already be validated.
    pub fn new(source: S, preferences: Preferences, setpoints: Setpoints) -> Self {
        Self {
            source,
            preferences,
            setpoints,
            tracker: AlarmTracker::new(),
        }
    }

    /// Acquires one reading, decides the actuator states and folds the
    /// reading into the alarm set.
    pub fn step(&mut self) -> Tick {
        let reading = self.source.get_reading();
        let controls = Controls::decide(&self.setpoints, &reading);
        let alarm_error = self
            .tracker
            .update(&reading, &self.preferences.limits)
            .err();
        Tick {
            reading,
            controls,
            alarm_error,
        }
    }

    pub fn tracker(&self) -> &AlarmTracker {
        &self.tracker
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn setpoints(&self) -> &Setpoints {
        &self.setpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::AlarmCondition;
    use crate::clock::Timestamp;

    struct Scripted {
        readings: std::vec::Vec<(f32, f32, f32)>,
        next: usize,
    }

    impl ReadingSource for Scripted {
        fn get_reading(&mut self) -> Reading {
            let (temperature, humidity, pressure) = self.readings[self.next];
            self.next += 1;
            Reading {
                timestamp: Timestamp(self.next as u64),
                temperature,
                humidity,
                pressure,
            }
        }
    }

    #[test]
    fn step_updates_controls_and_alarms() {
        let source = Scripted {
            readings: vec![(32.0, 50.0, 1000.0), (20.0, 60.0, 1000.0)],
            next: 0,
        };
        let mut controller =
            Controller::new(source, Preferences::default(), Setpoints::default());

        let tick = controller.step();
        assert_eq!(tick.alarm_error, None);
        assert!(!tick.controls.heater);
        assert!(tick.controls.humidifier);
        assert!(controller.tracker().contains(AlarmCondition::HighTemperature));

        let tick = controller.step();
        assert!(tick.controls.heater);
        assert!(!tick.controls.humidifier);
        assert!(controller.tracker().is_empty());
    }
}
