use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use log::debug;

use crate::error::{Error, Result};
use crate::preferences::Setpoints;
use crate::sensors::Reading;

/// On/off state of the binary actuators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub heater: bool,
    pub humidifier: bool,
}

impl Controls {
    /// Heater runs below the temperature setpoint, humidifier below the
    /// humidity setpoint.
    pub fn decide(target: &Setpoints, reading: &Reading) -> Self {
        Controls {
            heater: reading.temperature < target.temperature,
            humidifier: reading.humidity < target.humidity,
        }
    }
}

/// Heater and humidifier relays.
pub struct Actuators<H: OutputPin, U: OutputPin> {
    heater: H,
    humidifier: U,
}

impl<H: OutputPin, U: OutputPin> Actuators<H, U> {
    pub fn new(heater: H, humidifier: U) -> Self {
        Self { heater, humidifier }
    }

    /// Drives both pins to match `controls`.
    pub fn apply(&mut self, controls: Controls) -> Result<()> {
        self.heater
            .set_state(PinState::from(controls.heater))
            .map_err(|_| Error::Actuator("heater"))?;
        self.humidifier
            .set_state(PinState::from(controls.humidifier))
            .map_err(|_| Error::Actuator("humidifier"))?;
        Ok(())
    }

    pub fn release(self) -> (H, U) {
        (self.heater, self.humidifier)
    }
}

/// An output pin that only remembers its level. Stands in for a relay on
/// hosts without GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedPin {
    name: &'static str,
    high: bool,
}

impl SimulatedPin {
    pub const fn new(name: &'static str) -> Self {
        Self { name, high: false }
    }

    pub fn is_set_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for SimulatedPin {
    type Error = Infallible;
}

impl OutputPin for SimulatedPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        if self.high {
            debug!("{} off", self.name);
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if !self.high {
            debug!("{} on", self.name);
        }
        self.high = true;
        Ok(())
    }
}
