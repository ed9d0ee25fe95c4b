use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// The GPIO register interface could not be acquired, or a pin could not
    /// be configured as an output. Fatal to the subsystem; not retried.
    #[error("GPIO initialization failed: {0}")]
    Init(String),

    /// An unrecognized signal name was passed at the untyped call boundary.
    #[error("unrecognized stepper signal '{0}'")]
    InvalidSignal(String),

    /// A raw stepper index outside the two supported channels.
    #[error("stepper index {0} out of range (valid: 0-1)")]
    InvalidStepper(u8),

    /// The configured laser power range is empty or inverted.
    #[error("invalid laser power range: min {min} must be below max {max}")]
    PowerRange { min: f32, max: f32 },
}
