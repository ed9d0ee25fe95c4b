pub mod config;
pub mod controller;
pub mod error;
pub mod hal;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::controller::SignalController;
use crate::error::ControllerError;
use crate::hal::rppal_gpio::RppalGpio;

pub fn configure_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                info!("RUST_LOG not set, using default log level 'info'");
                EnvFilter::new("info") // Default log level if not set
            }),
        )
        .with_thread_ids(true)
        .with_thread_names(false)
        .with_writer(std::io::stdout) // log to stdout for compat with containerized environments
        .init();
}

/// Acquires the Raspberry Pi GPIO interface and builds the signal controller
/// on top of it. This is the one reportable failure path of the subsystem:
/// once it returns `Ok`, all signal operations are plain register writes.
pub fn init_controller(
    app_config: &AppConfig,
) -> Result<SignalController<RppalGpio>, ControllerError> {
    let backend = RppalGpio::new().map_err(ControllerError::Init)?;
    SignalController::new(backend, app_config)
}
