/// Default delay between control loop ticks.
pub const TICK_INTERVAL_MS: u32 = 2000; // 2000ms ideally

/// Blocking delay backed by the host's thread sleep.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDelay;

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
