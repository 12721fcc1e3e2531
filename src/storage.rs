//! Flat-file persistence: the append-only readings log, the setpoint record
//! and the board serial number.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::{debug, warn};

use crate::error::StorageError;
use crate::preferences::Setpoints;
use crate::sensors::Reading;

/// Prefix of the serial number line in `/proc/cpuinfo`.
const SERIAL_PREFIX: &str = "serial";
const CPUINFO: &str = "/proc/cpuinfo";

/// Formats one log line: `DD/MM/YYYY,HH:MM:SS,T,H,P`.
pub fn log_line(reading: &Reading) -> String {
    let (time, date) = reading.timestamp.civil().formatted();
    format!(
        "{},{},{:5.1},{:5.1},{:6.1}",
        date, time, reading.temperature, reading.humidity, reading.pressure
    )
}

/// Appends `reading` to the log at `path`, creating the file if needed.
pub fn append_reading(path: impl AsRef<Path>, reading: &Reading) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            debug!("open {}: {e}", path.display());
            StorageError::Open
        })?;
    writeln!(file, "{}", log_line(reading)).map_err(|e| {
        debug!("write {}: {e}", path.display());
        StorageError::Write
    })
}

pub fn save_setpoints(path: impl AsRef<Path>, setpoints: &Setpoints) -> Result<(), StorageError> {
    let path = path.as_ref();
    let record = setpoints.to_record()?;
    fs::write(path, record).map_err(|e| {
        debug!("write {}: {e}", path.display());
        StorageError::Write
    })
}

pub fn load_setpoints(path: impl AsRef<Path>) -> Result<Setpoints, StorageError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        debug!("read {}: {e}", path.display());
        match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                StorageError::Open
            }
            _ => StorageError::Read,
        }
    })?;
    Setpoints::from_record(&bytes)
}

/// Loads the stored setpoints, falling back to (and persisting) the defaults
/// when the record is missing or unreadable.
pub fn load_or_init_setpoints(path: impl AsRef<Path>) -> Setpoints {
    let path = path.as_ref();
    match load_setpoints(path) {
        Ok(setpoints) => setpoints,
        Err(e) => {
            warn!("setpoints unavailable ({e}), using defaults");
            let defaults = Setpoints::default();
            if let Err(e) = save_setpoints(path, &defaults) {
                warn!("could not save default setpoints: {e}");
            }
            defaults
        }
    }
}

/// Extracts the hex serial number from `/proc/cpuinfo`-style text.
pub fn parse_serial(cpuinfo: &str) -> Option<u64> {
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if !key.trim().eq_ignore_ascii_case(SERIAL_PREFIX) {
            return None;
        }
        u64::from_str_radix(value.trim(), 16).ok()
    })
}

/// Board serial number, or 0 when the platform does not expose one.
pub fn device_serial() -> u64 {
    fs::read_to_string(CPUINFO)
        .ok()
        .and_then(|info| parse_serial(&info))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Timestamp;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("greenhouse-storage-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    fn reading(t: u64) -> Reading {
        Reading {
            timestamp: Timestamp(t),
            temperature: 21.5,
            humidity: 48.0,
            pressure: 1001.5,
        }
    }

    #[test]
    fn log_line_layout() {
        assert_eq!(
            log_line(&reading(1_000_000_000)),
            "09/09/2001,01:46:40, 21.5, 48.0,1001.5"
        );
    }

    #[test]
    fn log_line_survives_far_future_timestamp() {
        assert_eq!(
            log_line(&reading(u64::MAX)),
            "31/12/9999,23:59:59, 21.5, 48.0,1001.5"
        );
    }

    #[test]
    fn appends_one_line_per_reading() {
        let path = scratch("ghdata.txt");
        append_reading(&path, &reading(0)).unwrap();
        append_reading(&path, &reading(60)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("01/01/1970,00:00:00,"));
        assert!(lines[1].starts_with("01/01/1970,00:01:00,"));
    }

    #[test]
    fn append_to_missing_directory_fails() {
        let path = scratch("missing").join("nested").join("ghdata.txt");
        assert_eq!(append_reading(&path, &reading(0)), Err(StorageError::Open));
    }

    #[test]
    fn setpoints_round_trip_through_file() {
        let path = scratch("setpoints.dat");
        let sp = Setpoints {
            temperature: 22.5,
            humidity: 60.0,
        };
        save_setpoints(&path, &sp).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 8);
        assert_eq!(load_setpoints(&path), Ok(sp));
    }

    #[test]
    fn missing_setpoints_fall_back_and_persist_defaults() {
        let path = scratch("fresh-setpoints.dat");
        assert_eq!(load_setpoints(&path), Err(StorageError::Open));
        assert_eq!(load_or_init_setpoints(&path), Setpoints::default());
        assert_eq!(load_setpoints(&path), Ok(Setpoints::default()));
    }

    #[test]
    fn truncated_setpoints_fall_back() {
        let path = scratch("short-setpoints.dat");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        assert!(matches!(
            load_setpoints(&path),
            Err(StorageError::Corrupt { found: 3, .. })
        ));
        assert_eq!(load_or_init_setpoints(&path), Setpoints::default());
    }

    #[test]
    fn parses_cpuinfo_serial() {
        let info = "processor\t: 0\nHardware\t: BCM2835\nSerial\t\t: 000000001ae1741e\nModel\t\t: Raspberry Pi\n";
        assert_eq!(parse_serial(info), Some(0x1ae1_741e));
        assert_eq!(parse_serial("processor\t: 0\n"), None);
    }
}
