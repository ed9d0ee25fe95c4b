use crate::hal::GpioBackend;

/// Recording backend for tests: remembers which pins were configured and
/// every write in order, instead of touching hardware.
pub struct GpioMock {
    configured: Vec<u8>,
    writes: Vec<(u8, bool)>,
}

impl GpioMock {
    pub fn new() -> Self {
        GpioMock {
            configured: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn configured_pins(&self) -> &[u8] {
        &self.configured
    }

    /// The full ordered write log as `(pin, level)` pairs.
    pub fn writes(&self) -> &[(u8, bool)] {
        &self.writes
    }

    /// The most recent level written to `pin`, if any.
    pub fn last_level(&self, pin: u8) -> Option<bool> {
        self.writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
    }
}

impl GpioBackend for GpioMock {
    fn get_name(&self) -> String {
        "GpioMock".to_string()
    }

    fn configure_output(&mut self, pin: u8) -> Result<(), String> {
        self.configured.push(pin);
        Ok(())
    }

    fn write_level(&mut self, pin: u8, level: bool) {
        self.writes.push((pin, level));
    }
}
