use crate::config::AppConfig;
use crate::error::ControllerError;
use crate::hal::GpioBackend;

use core::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Duty level above which the laser PWM pin is driven high.
const PWM_THRESHOLD: u16 = 0x8000;

/// The three signal lines of a stepper driver channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperSignal {
    Enable,
    Step,
    Direction,
}

impl fmt::Display for StepperSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepperSignal::Enable => write!(f, "enable"),
            StepperSignal::Step => write!(f, "step"),
            StepperSignal::Direction => write!(f, "direction"),
        }
    }
}

impl FromStr for StepperSignal {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enable" => Ok(StepperSignal::Enable),
            "step" => Ok(StepperSignal::Step),
            "dir" | "direction" => Ok(StepperSignal::Direction),
            _ => Err(ControllerError::InvalidSignal(s.to_string())),
        }
    }
}

/// One of the two stepper driver channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperId {
    Stepper0,
    Stepper1,
}

impl StepperId {
    fn index(self) -> usize {
        match self {
            StepperId::Stepper0 => 0,
            StepperId::Stepper1 => 1,
        }
    }
}

impl fmt::Display for StepperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stepper{}", self.index())
    }
}

impl TryFrom<u8> for StepperId {
    type Error = ControllerError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(StepperId::Stepper0),
            1 => Ok(StepperId::Stepper1),
            _ => Err(ControllerError::InvalidStepper(id)),
        }
    }
}

/// Drives the enable/step/direction lines of both stepper channels and the
/// laser module's thermal-enable, water-interlock and power-modulation pins.
///
/// Constructing the controller configures every pin as an output and forces
/// the water interlock low, so the laser stays gated off until coolant flow
/// is proven. All other operations are direct pin writes.
pub struct SignalController<B: GpioBackend> {
    backend: B,
    enable_pins: [u8; 2],
    step_pins: [u8; 2],
    dir_pins: [u8; 2],
    thermal_enable_pin: u8,
    water_interlock_pin: u8,
    pwm_pin: u8,
    min_power: f32,
    max_power: f32,
    laser_power: u16,
}

impl<B: GpioBackend> SignalController<B> {
    pub fn new(mut backend: B, config: &AppConfig) -> Result<Self, ControllerError> {
        let laser = &config.laser;
        if laser.min_power >= laser.max_power {
            return Err(ControllerError::PowerRange {
                min: laser.min_power,
                max: laser.max_power,
            });
        }

        let enable_pins = [config.stepper0.enable_pin, config.stepper1.enable_pin];
        let step_pins = [config.stepper0.step_pin, config.stepper1.step_pin];
        let dir_pins = [config.stepper0.dir_pin, config.stepper1.dir_pin];

        for stepper in 0..2 {
            backend
                .configure_output(enable_pins[stepper])
                .map_err(ControllerError::Init)?;
            backend
                .configure_output(step_pins[stepper])
                .map_err(ControllerError::Init)?;
            backend
                .configure_output(dir_pins[stepper])
                .map_err(ControllerError::Init)?;
        }

        for pin in [
            laser.thermal_enable_pin,
            laser.water_interlock_pin,
            laser.pwm_pin,
        ] {
            backend.configure_output(pin).map_err(ControllerError::Init)?;
        }

        // Water interlock starts inactive; the laser stays gated off.
        backend.write_level(laser.water_interlock_pin, false);

        info!(
            "Signal controller initialized via {} backend",
            backend.get_name()
        );

        Ok(SignalController {
            backend,
            enable_pins,
            step_pins,
            dir_pins,
            thermal_enable_pin: laser.thermal_enable_pin,
            water_interlock_pin: laser.water_interlock_pin,
            pwm_pin: laser.pwm_pin,
            min_power: laser.min_power,
            max_power: laser.max_power,
            laser_power: 0,
        })
    }

    /// Writes `level` to the pin selected by (`signal`, `stepper`).
    pub fn set_state(&mut self, signal: StepperSignal, stepper: StepperId, level: bool) {
        let pin = match signal {
            StepperSignal::Enable => self.enable_pins[stepper.index()],
            StepperSignal::Step => self.step_pins[stepper.index()],
            StepperSignal::Direction => self.dir_pins[stepper.index()],
        };
        debug!("Writing {} to {} pin of {}", level, signal, stepper);
        self.backend.write_level(pin, level);
    }

    /// `set_state` for callers holding raw signal names and indices, e.g. a
    /// command parser. Rejects unrecognized signals and out-of-range stepper
    /// indices without touching any pin.
    pub fn set_state_by_name(
        &mut self,
        signal: &str,
        stepper: u8,
        level: bool,
    ) -> Result<(), ControllerError> {
        let signal = StepperSignal::from_str(signal)?;
        let stepper = StepperId::try_from(stepper)?;
        self.set_state(signal, stepper, level);
        Ok(())
    }

    /// Clamps `power` into the configured range and stores the scaled 16-bit
    /// duty value for the PWM consumer.
    pub fn set_laser_power(&mut self, power: f32) {
        let clamped = power.clamp(self.min_power, self.max_power);
        let fraction = (clamped - self.min_power) / (self.max_power - self.min_power);
        let duty = (fraction * 65535.0) as u16;

        self.laser_power = duty;
        debug!("Laser power {} -> duty {}", power, duty);

        // TODO: drive this pin from a PWM run loop consuming laser_power()
        // instead of thresholding the duty here.
        self.backend.write_level(self.pwm_pin, duty > PWM_THRESHOLD);
    }

    /// Writes the thermal-enable flag for the laser module.
    pub fn set_laser_enable(&mut self, enable: bool) {
        debug!("Laser thermal enable -> {}", enable);
        self.backend.write_level(self.thermal_enable_pin, enable);
    }

    /// The last stored 16-bit laser duty value.
    pub fn laser_power(&self) -> u16 {
        self.laser_power
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::hal::gpio_mock::GpioMock;

    fn mock_controller() -> SignalController<GpioMock> {
        SignalController::new(GpioMock::new(), &AppConfig::default()).unwrap()
    }

    #[test]
    fn test_init_configures_all_pins_and_forces_interlock_low() {
        let controller = mock_controller();

        assert_eq!(
            controller.backend().configured_pins(),
            &[12, 19, 13, 4, 18, 24, 16, 21, 20]
        );
        // The only write during init is the water interlock safety default.
        assert_eq!(controller.backend().writes(), &[(21, false)]);
    }

    #[test]
    fn test_power_below_min_stores_zero_duty() {
        let mut controller = mock_controller();

        controller.set_laser_power(-3.5);

        assert_eq!(controller.laser_power(), 0);
        assert_eq!(controller.backend().last_level(20), Some(false));
    }

    #[test]
    fn test_power_above_max_stores_full_duty() {
        let mut controller = mock_controller();

        controller.set_laser_power(7.0);

        assert_eq!(controller.laser_power(), 65535);
        assert_eq!(controller.backend().last_level(20), Some(true));
    }

    #[test]
    fn test_power_range_endpoints() {
        let mut controller = mock_controller();

        controller.set_laser_power(0.0);
        assert_eq!(controller.laser_power(), 0);

        controller.set_laser_power(1.0);
        assert_eq!(controller.laser_power(), 65535);
    }

    #[test]
    fn test_midpoint_power_stays_below_pwm_threshold() {
        let mut controller = mock_controller();

        controller.set_laser_power(0.5);

        assert_eq!(controller.laser_power(), 32767);
        assert_eq!(controller.backend().last_level(20), Some(false));
    }

    #[test]
    fn test_pwm_threshold_boundary() {
        // A 0..65536 range makes the normalization exact enough to land on
        // the duty values either side of the threshold.
        let mut config = AppConfig::default();
        config.laser.min_power = 0.0;
        config.laser.max_power = 65536.0;
        let mut controller = SignalController::new(GpioMock::new(), &config).unwrap();

        controller.set_laser_power(32769.0);
        assert_eq!(controller.laser_power(), 0x8000);
        assert_eq!(controller.backend().last_level(20), Some(false));

        controller.set_laser_power(32770.0);
        assert_eq!(controller.laser_power(), 0x8001);
        assert_eq!(controller.backend().last_level(20), Some(true));
    }

    #[test]
    fn test_laser_enable_writes_thermal_pin() {
        let mut controller = mock_controller();

        controller.set_laser_enable(false);
        assert_eq!(controller.backend().last_level(16), Some(false));

        controller.set_laser_enable(true);
        assert_eq!(controller.backend().last_level(16), Some(true));
    }

    #[test]
    fn test_set_state_writes_exactly_one_pin() {
        let mut controller = mock_controller();
        let writes_after_init = controller.backend().writes().len();

        controller.set_state(StepperSignal::Enable, StepperId::Stepper0, true);

        let writes = controller.backend().writes();
        assert_eq!(writes.len(), writes_after_init + 1);
        assert_eq!(writes.last(), Some(&(12, true)));
    }

    #[test]
    fn test_set_state_routes_per_stepper() {
        let mut controller = mock_controller();

        controller.set_state(StepperSignal::Step, StepperId::Stepper1, true);
        assert_eq!(controller.backend().last_level(18), Some(true));

        controller.set_state(StepperSignal::Direction, StepperId::Stepper0, true);
        assert_eq!(controller.backend().last_level(13), Some(true));
    }

    #[test]
    fn test_set_state_by_name_accepts_known_signals() {
        let mut controller = mock_controller();

        controller.set_state_by_name("enable", 1, true).unwrap();
        assert_eq!(controller.backend().last_level(4), Some(true));

        controller.set_state_by_name("dir", 0, true).unwrap();
        assert_eq!(controller.backend().last_level(13), Some(true));
    }

    #[test]
    fn test_set_state_by_name_rejects_unknown_signal() {
        let mut controller = mock_controller();
        let writes_after_init = controller.backend().writes().len();

        let result = controller.set_state_by_name("brake", 0, true);

        assert!(matches!(result, Err(ControllerError::InvalidSignal(_))));
        assert_eq!(controller.backend().writes().len(), writes_after_init);
    }

    #[test]
    fn test_set_state_by_name_rejects_out_of_range_stepper() {
        let mut controller = mock_controller();
        let writes_after_init = controller.backend().writes().len();

        let result = controller.set_state_by_name("step", 2, true);

        assert!(matches!(result, Err(ControllerError::InvalidStepper(2))));
        assert_eq!(controller.backend().writes().len(), writes_after_init);
    }

    #[test]
    fn test_empty_power_range_rejected() {
        let mut config = AppConfig::default();
        config.laser.min_power = 1.0;
        config.laser.max_power = 1.0;

        let result = SignalController::new(GpioMock::new(), &config);

        assert!(matches!(
            result,
            Err(ControllerError::PowerRange { .. })
        ));
    }

    #[test]
    fn test_signal_parsing() {
        assert_eq!(
            "direction".parse::<StepperSignal>().unwrap(),
            StepperSignal::Direction
        );
        assert_eq!("step".parse::<StepperSignal>().unwrap(), StepperSignal::Step);
        assert!("pwm".parse::<StepperSignal>().is_err());
    }
}
