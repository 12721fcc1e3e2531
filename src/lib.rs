#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # GreenhousePi-rs
//! ## A greenhouse controller in Rust
//!
//! Features:
//! - Temperature, humidity and pressure sampling (simulated on hosts)
//! - Heater and humidifier control against stored setpoints
//! - High/low alarms for every quantity, tracked while they stay active
//! - Gauge rendering on an 8x8 matrix and status text
//! - Append-only readings log and persisted setpoints (`std` feature)

pub mod alarms;
pub mod clock;
pub mod controller;
pub mod controls;
pub mod error;
pub mod preferences;
pub mod rendering;
pub mod sensors;
#[cfg(feature = "std")]
pub mod storage;
pub mod timer;

pub use error::{Error, Result};
