use crate::hal::GpioBackend;

use rppal::gpio::{Gpio, Level, OutputPin};
use std::collections::HashMap;
use tracing::{error, info};

/// Production backend over the Raspberry Pi GPIO peripheral.
pub struct RppalGpio {
    gpio: Gpio,
    pins: HashMap<u8, OutputPin>,
}

impl RppalGpio {
    /// Acquires the GPIO register interface. Fails when the process lacks
    /// access to the gpiomem device or is not running on a Pi.
    pub fn new() -> Result<Self, String> {
        match Gpio::new() {
            Ok(gpio) => {
                info!("GPIO initialized successfully");
                Ok(RppalGpio {
                    gpio,
                    pins: HashMap::new(),
                })
            }
            Err(e) => Err(format!("Failed to initialize GPIO: {}", e)),
        }
    }
}

impl GpioBackend for RppalGpio {
    fn get_name(&self) -> String {
        "RppalGpio".to_string()
    }

    fn configure_output(&mut self, pin: u8) -> Result<(), String> {
        let output = self
            .gpio
            .get(pin)
            .map(|p| p.into_output())
            .map_err(|e| format!("Failed to configure pin {} as output: {}", pin, e))?;
        self.pins.insert(pin, output);
        Ok(())
    }

    fn write_level(&mut self, pin: u8, level: bool) {
        match self.pins.get_mut(&pin) {
            Some(output) => {
                let level = if level { Level::High } else { Level::Low };
                output.write(level);
            }
            None => {
                error!("Write to unconfigured pin {} dropped", pin);
            }
        }
    }
}
