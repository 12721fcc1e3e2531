use core::fmt::{self, Write};

use heapless::String;

use crate::alarms::{AlarmCondition, AlarmTracker};
use crate::controls::Controls;
use crate::error::DisplayError;
use crate::preferences::{SensorRange, SensorRanges, Setpoints};
use crate::sensors::{Quantity, Reading};

/// Width and height of the LED matrix.
pub const MATRIX_SIZE: u8 = 8;

/// Matrix column of each gauge bar.
pub const TEMPERATURE_BAR: u8 = 7;
pub const HUMIDITY_BAR: u8 = 5;
pub const PRESSURE_BAR: u8 = 3;

/// Matrix column holding one red indicator per active alarm.
pub const ALARM_COLUMN: u8 = 1;

/// Longest line a text display is handed.
pub const LINE_CAPACITY: usize = 64;

pub type Line = String<LINE_CAPACITY>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Color {
    #[default]
    Black,
    Green,
    Magenta,
    Red,
}

/// An 8x8 pixel surface. `x` is the column, `y` the row counted from the
/// bottom of a gauge.
pub trait PixelDisplay {
    fn clear(&mut self) -> Result<(), DisplayError>;
    fn set_pixel(&mut self, x: u8, y: u8, color: Color) -> Result<(), DisplayError>;
}

/// A line-oriented text surface, e.g. a console or character LCD.
pub trait TextDisplay {
    fn write_line(&mut self, line: &str) -> Result<(), DisplayError>;
}

/// In-memory pixel surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[Color; MATRIX_SIZE as usize]; MATRIX_SIZE as usize],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixel(&self, x: u8, y: u8) -> Option<Color> {
        self.pixels
            .get(usize::from(y))
            .and_then(|row| row.get(usize::from(x)))
            .copied()
    }

    /// Rows from `y = 0` upwards.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Color; MATRIX_SIZE as usize]> {
        self.pixels.iter()
    }
}

impl PixelDisplay for FrameBuffer {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.pixels = Default::default();
        Ok(())
    }

    fn set_pixel(&mut self, x: u8, y: u8, color: Color) -> Result<(), DisplayError> {
        let cell = self
            .pixels
            .get_mut(usize::from(y))
            .and_then(|row| row.get_mut(usize::from(x)))
            .ok_or(DisplayError::OutOfBounds)?;
        *cell = color;
        Ok(())
    }
}

/// Maps a value onto a gauge row, 0..=7. Values outside the range pin to the
/// nearest end.
pub fn gauge_level(value: f32, range: SensorRange) -> u8 {
    let level = f32::from(MATRIX_SIZE) * (range.fraction(value) + 0.05) - 1.0;
    // NaN casts to 0
    level.clamp(0.0, f32::from(MATRIX_SIZE - 1)) as u8
}

/// Lights rows `0..=level` of column `bar` in `color` and blanks the rest.
pub fn set_vertical_bar<D: PixelDisplay>(
    display: &mut D,
    bar: u8,
    color: Color,
    level: u8,
) -> Result<(), DisplayError> {
    if bar >= MATRIX_SIZE {
        return Err(DisplayError::OutOfBounds);
    }
    let level = level.min(MATRIX_SIZE - 1);
    for y in 0..MATRIX_SIZE {
        let c = if y <= level { color } else { Color::Black };
        display.set_pixel(bar, y, c)?;
    }
    Ok(())
}

/// Draws a green bar per quantity with a magenta marker at the setpoint for
/// temperature and humidity.
pub fn render_gauges<D: PixelDisplay>(
    display: &mut D,
    reading: &Reading,
    target: &Setpoints,
    ranges: &SensorRanges,
) -> Result<(), DisplayError> {
    display.clear()?;

    let gauges = [
        (TEMPERATURE_BAR, Quantity::Temperature, Some(target.temperature)),
        (HUMIDITY_BAR, Quantity::Humidity, Some(target.humidity)),
        (PRESSURE_BAR, Quantity::Pressure, None),
    ];
    for (bar, quantity, setpoint) in gauges {
        let range = ranges.get(quantity);
        set_vertical_bar(display, bar, Color::Green, gauge_level(reading.value(quantity), range))?;
        if let Some(setpoint) = setpoint {
            display.set_pixel(bar, gauge_level(setpoint, range), Color::Magenta)?;
        }
    }
    Ok(())
}

/// Lights row `i` of [`ALARM_COLUMN`] red while `AlarmCondition::ALL[i]` is
/// active, black otherwise.
pub fn render_alarm_indicators<D: PixelDisplay>(
    display: &mut D,
    tracker: &AlarmTracker,
) -> Result<(), DisplayError> {
    for (y, condition) in (0u8..).zip(AlarmCondition::ALL) {
        let color = if tracker.contains(condition) {
            Color::Red
        } else {
            Color::Black
        };
        display.set_pixel(ALARM_COLUMN, y, color)?;
    }
    Ok(())
}

fn format_line(args: fmt::Arguments<'_>) -> Result<Line, DisplayError> {
    let mut line = Line::new();
    line.write_fmt(args).map_err(|_| DisplayError::LineOverflow)?;
    Ok(line)
}

fn on_off(state: bool) -> &'static str {
    if state {
        "ON"
    } else {
        "OFF"
    }
}

pub fn render_header<D: TextDisplay>(display: &mut D, serial: u64) -> Result<(), DisplayError> {
    display.write_line(&format_line(format_args!("Unit: {serial:X} Greenhouse Controller"))?)
}

pub fn render_readings<D: TextDisplay>(
    display: &mut D,
    reading: &Reading,
) -> Result<(), DisplayError> {
    let when = reading.timestamp.civil().to_display();
    display.write_line(&format_line(format_args!(
        "{}  T: {:5.1}C  H: {:5.1}%  P: {:6.1}mb",
        when, reading.temperature, reading.humidity, reading.pressure
    ))?)
}

pub fn render_targets<D: TextDisplay>(
    display: &mut D,
    target: &Setpoints,
) -> Result<(), DisplayError> {
    display.write_line(&format_line(format_args!(
        "Setpoints  T: {:.1}C  H: {:.1}%",
        target.temperature, target.humidity
    ))?)
}

pub fn render_controls<D: TextDisplay>(
    display: &mut D,
    controls: &Controls,
) -> Result<(), DisplayError> {
    display.write_line(&format_line(format_args!(
        "Controls  Heater: {}  Humidifier: {}",
        on_off(controls.heater),
        on_off(controls.humidifier)
    ))?)
}

/// Writes an "Alarms" heading followed by one line per active alarm, in
/// tracker order.
pub fn render_alarms<D: TextDisplay>(
    display: &mut D,
    tracker: &AlarmTracker,
) -> Result<(), DisplayError> {
    display.write_line("Alarms")?;
    for alarm in tracker {
        let when = alarm.observed_at.civil().to_display();
        display.write_line(&format_line(format_args!(
            "{:<16} {}  {:.1}{}",
            alarm.condition.name(),
            when,
            alarm.value,
            alarm.condition.quantity().unit()
        ))?)?;
    }
    Ok(())
}
