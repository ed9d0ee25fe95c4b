use serde::{Deserialize, Serialize};
use tracing::debug;

/// BCM pin assignments for one stepper driver channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepperPins {
    pub enable_pin: u8,
    pub step_pin: u8,
    pub dir_pin: u8,
}

/// BCM pin assignments and power range for the laser module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserConfig {
    pub thermal_enable_pin: u8,
    pub water_interlock_pin: u8,
    pub pwm_pin: u8,
    pub min_power: f32,
    pub max_power: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub stepper0: StepperPins,
    pub stepper1: StepperPins,
    pub laser: LaserConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            stepper0: StepperPins {
                enable_pin: 12,
                step_pin: 19,
                dir_pin: 13,
            },
            stepper1: StepperPins {
                enable_pin: 4,
                step_pin: 18,
                dir_pin: 24,
            },
            laser: LaserConfig::default(),
        }
    }
}

impl Default for LaserConfig {
    fn default() -> Self {
        LaserConfig {
            thermal_enable_pin: 16,
            water_interlock_pin: 21,
            pwm_pin: 20,
            min_power: 0.0,
            max_power: 1.0,
        }
    }
}

pub fn get_config_path() -> String {
    "/etc/engraver-gpio/config.yaml".to_string()
}

pub fn load_app_config_from_str(config_str: &str) -> AppConfig {
    serde_yaml::from_str(config_str).expect("Failed to parse app config")
}

pub fn load_app_config() -> AppConfig {
    let app_config_path = get_config_path();
    let config_str = std::fs::read_to_string(&app_config_path).expect(&format!(
        "Failed to read app config file at {}",
        app_config_path
    ));

    let app_config: AppConfig = load_app_config_from_str(&config_str);

    // Log the config struct as json
    debug!(
        "Parsed app config: {}",
        serde_json::to_string(&app_config).unwrap_or_default()
    );
    app_config
}
