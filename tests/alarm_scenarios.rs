//! End-to-end alarm tracking over scripted tick sequences.

use greenhouse_rs::alarms::{evaluate, AlarmCondition, AlarmTracker, MAX_ACTIVE_ALARMS};
use greenhouse_rs::clock::Timestamp;
use greenhouse_rs::preferences::AlarmLimits;
use greenhouse_rs::sensors::Reading;

use AlarmCondition::*;

fn limits() -> AlarmLimits {
    AlarmLimits {
        high_temp: 30.0,
        low_temp: 10.0,
        high_humidity: 70.0,
        low_humidity: 25.0,
        high_pressure: 1016.0,
        low_pressure: 985.0,
    }
}

fn reading(t: u64, temperature: f32, humidity: f32, pressure: f32) -> Reading {
    Reading {
        timestamp: Timestamp(t),
        temperature,
        humidity,
        pressure,
    }
}

fn active(tracker: &AlarmTracker) -> Vec<AlarmCondition> {
    tracker.iter().map(|a| a.condition).collect()
}

#[test]
fn single_high_temperature() {
    let mut tracker = AlarmTracker::new();
    tracker.update(&reading(100, 32.0, 50.0, 1000.0), &limits()).unwrap();

    assert_eq!(active(&tracker), [HighTemperature]);
    let alarm = tracker.get(HighTemperature).unwrap();
    assert_eq!(alarm.observed_at, Timestamp(100));
    assert_eq!(alarm.value, 32.0);
}

#[test]
fn three_simultaneous_alarms() {
    let mut tracker = AlarmTracker::new();
    tracker.update(&reading(100, 5.0, 80.0, 1020.0), &limits()).unwrap();

    assert_eq!(active(&tracker), [LowTemperature, HighHumidity, HighPressure]);
    assert_eq!(tracker.get(HighHumidity).unwrap().value, 80.0);
}

#[test]
fn all_alarms_clear_on_normal_reading() {
    let mut tracker = AlarmTracker::new();
    tracker.update(&reading(100, 5.0, 80.0, 1020.0), &limits()).unwrap();
    tracker.update(&reading(102, 20.0, 50.0, 1000.0), &limits()).unwrap();

    assert!(tracker.is_empty());
}

#[test]
fn boundary_value_triggers() {
    let mut tracker = AlarmTracker::new();
    tracker.update(&reading(1, 30.0, 50.0, 1000.0), &limits()).unwrap();
    assert_eq!(active(&tracker), [HighTemperature]);

    // just below the limit clears it again
    tracker.update(&reading(2, 29.99, 50.0, 1000.0), &limits()).unwrap();
    assert!(tracker.is_empty());
}

#[test]
fn persistent_alarm_reflects_latest_tick() {
    let mut tracker = AlarmTracker::new();
    for (t, temp) in [(10, 31.0), (12, 35.0), (14, 33.0)] {
        tracker.update(&reading(t, temp, 50.0, 1000.0), &limits()).unwrap();
    }
    assert_eq!(tracker.len(), 1);
    let alarm = tracker.get(HighTemperature).unwrap();
    assert_eq!(alarm.observed_at, Timestamp(14));
    assert_eq!(alarm.value, 33.0);
}

#[test]
fn clearing_one_leaves_others_untouched() {
    let mut tracker = AlarmTracker::new();
    tracker.update(&reading(1, 5.0, 80.0, 1020.0), &limits()).unwrap();
    let before: Vec<_> = tracker.iter().copied().collect();

    // humidity back to normal, temperature and pressure unchanged in value
    tracker.apply(HighHumidity, false, Timestamp(2), 50.0).unwrap();

    let after: Vec<_> = tracker.iter().copied().collect();
    assert_eq!(after, [before[0], before[2]]);
}

#[test]
fn new_alarm_appends_after_survivors() {
    let mut tracker = AlarmTracker::new();
    tracker.update(&reading(1, 5.0, 80.0, 1000.0), &limits()).unwrap();
    assert_eq!(active(&tracker), [LowTemperature, HighHumidity]);

    // temperature recovers, humidity stays high, pressure drops
    tracker.update(&reading(2, 20.0, 75.0, 980.0), &limits()).unwrap();
    assert_eq!(active(&tracker), [HighHumidity, LowPressure]);
    assert_eq!(tracker.get(HighHumidity).unwrap().observed_at, Timestamp(2));
}

#[test]
fn unchanged_reading_is_fixed_point() {
    let mut tracker = AlarmTracker::new();
    let r = reading(1, 5.0, 20.0, 1020.0);
    tracker.update(&r, &limits()).unwrap();
    let snapshot = tracker.clone();

    tracker.update(&r, &limits()).unwrap();
    assert_eq!(tracker, snapshot);

    let verdicts = evaluate(&r, &limits());
    for v in verdicts {
        assert_eq!(v.active, tracker.contains(v.condition));
    }
}

#[test]
fn never_more_than_six_alarms() {
    // Overlapping limits let every condition fire at once.
    let wide = AlarmLimits {
        high_temp: 0.0,
        low_temp: 100.0,
        high_humidity: 0.0,
        low_humidity: 100.0,
        high_pressure: 0.0,
        low_pressure: 2000.0,
    };
    let mut tracker = AlarmTracker::new();
    for t in 0..5 {
        tracker.update(&reading(t, 50.0, 50.0, 1000.0), &wide).unwrap();
    }
    assert_eq!(tracker.len(), MAX_ACTIVE_ALARMS);
    assert_eq!(active(&tracker), AlarmCondition::ALL);
}
