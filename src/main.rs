use std::io::{self, Write};

use anyhow::Context;
use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use greenhouse_rs::clock::{Clock, SystemClock};
use greenhouse_rs::controller::{Controller, Tick};
use greenhouse_rs::controls::{Actuators, SimulatedPin};
use greenhouse_rs::error::DisplayError;
use greenhouse_rs::preferences::Preferences;
use greenhouse_rs::rendering::{
    render_alarm_indicators, render_alarms, render_controls, render_gauges, render_header,
    render_readings, render_targets, Color, FrameBuffer, TextDisplay,
};
use greenhouse_rs::sensors::SimulatedSource;
use greenhouse_rs::storage::{append_reading, device_serial, load_or_init_setpoints};
use greenhouse_rs::timer::HostDelay;

const LOG_FILE: &str = "ghdata.txt";
const SETPOINTS_FILE: &str = "setpoints.dat";
/// Environment variable naming an optional JSON preferences file.
const CONFIG_ENV: &str = "GHC_CONFIG";

/// Writes status lines to stdout.
struct Console;

impl TextDisplay for Console {
    fn write_line(&mut self, line: &str) -> Result<(), DisplayError> {
        writeln!(io::stdout().lock(), "{line}").map_err(|_| DisplayError::Device)
    }
}

fn load_preferences() -> anyhow::Result<Preferences> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        info!("{CONFIG_ENV} not set, using default preferences");
        return Ok(Preferences::default());
    };
    let bytes = std::fs::read(&path).with_context(|| format!("reading preferences {path}"))?;
    let preferences = Preferences::from_json(&bytes)
        .map_err(greenhouse_rs::Error::from)
        .with_context(|| format!("invalid preferences in {path}"))?;
    info!("preferences loaded from {path}");
    Ok(preferences)
}

/// Prints the matrix top row first, one character per pixel.
fn print_matrix(frame: &FrameBuffer) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for row in frame.rows().rev() {
        let line: String = row
            .iter()
            .map(|c| match c {
                Color::Black => '.',
                Color::Green => 'G',
                Color::Magenta => 'M',
                Color::Red => 'R',
            })
            .collect();
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn present(
    console: &mut Console,
    frame: &mut FrameBuffer,
    controller: &Controller<SimulatedSource<SystemClock>>,
    tick: &Tick,
    serial: u64,
) -> greenhouse_rs::Result<()> {
    render_gauges(
        frame,
        &tick.reading,
        controller.setpoints(),
        &controller.preferences().ranges,
    )?;
    render_alarm_indicators(frame, controller.tracker())?;
    print_matrix(frame).map_err(|_| DisplayError::Device)?;
    render_header(console, serial)?;
    render_readings(console, &tick.reading)?;
    render_targets(console, controller.setpoints())?;
    render_controls(console, &tick.controls)?;
    render_alarms(console, controller.tracker())?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("GreenHousePi Starting");

    let preferences = load_preferences()?;
    let setpoints = load_or_init_setpoints(SETPOINTS_FILE);
    let serial = device_serial();

    let source = SimulatedSource::new(preferences.ranges, SystemClock, SystemClock.now().0);
    let mut controller = Controller::new(source, preferences, setpoints);

    let mut actuators = Actuators::new(SimulatedPin::new("heater"), SimulatedPin::new("humidifier"));
    let mut frame = FrameBuffer::new();
    let mut console = Console;
    let mut delay = HostDelay;

    info!("GreenHousePi Ready");

    loop {
        let tick = controller.step();

        if let Err(e) = append_reading(LOG_FILE, &tick.reading) {
            warn!("could not log reading to {LOG_FILE}: {e}");
        }
        if let Err(e) = actuators.apply(tick.controls) {
            error!("{e}");
        }
        if let Some(e) = tick.alarm_error {
            warn!("{e}, retrying next tick");
        }
        if let Err(e) = present(&mut console, &mut frame, &controller, &tick, serial) {
            warn!("render failed: {e}");
        }

        delay.delay_ms(controller.preferences().tick_interval_ms);
    }
}
