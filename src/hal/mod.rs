pub mod gpio_mock;
pub mod rppal_gpio;

/// Capability interface over the hardware GPIO register layer.
///
/// Acquiring the interface is backend construction; once a backend exists,
/// pins are configured as outputs and written individually. Writes are
/// assumed reliable after configuration succeeds.
pub trait GpioBackend: Send {
    fn get_name(&self) -> String;

    /// Configures `pin` as a digital output.
    fn configure_output(&mut self, pin: u8) -> Result<(), String>;

    /// Writes a binary level to `pin`. The pin must have been configured as
    /// an output first; writes to unconfigured pins are dropped.
    fn write_level(&mut self, pin: u8, level: bool);
}
