//! The standard rover wired onto simulated hardware
//!
//! Behaviors borrow the shared pose and encoder counts, and the controller
//! borrows the behaviors, so the rover is built in three layers that each
//! outlive the next:
//!
//! ```
//! use subsumption_rover::parameters::RoverParams;
//! use subsumption_sitl::{RoverBehaviors, RoverState, SitlHardware, SitlRover};
//!
//! let params = RoverParams::default();
//! let hardware = SitlHardware::new();
//! let state = RoverState::new();
//! let mut behaviors = RoverBehaviors::new(&state, &hardware, &params);
//! let rover = SitlRover::new(&mut behaviors, &state, hardware, params.tick_ms, 0).unwrap();
//! assert!(rover.controller().scheduler().is_inhibited());
//! ```

use std::cell::Cell;
use std::fmt;

use subsumption_rover::behaviors::{
    collision_recovery, cruise_control, led_driver, motor_driver, navigator, position, waypoints,
    CollisionRecovery, CruiseControl, EncoderCounts, Gains, LedDriver, LedPair, MotorChannel,
    MotorDriver, Navigator, Pose, Position, WaypointManager,
};
use subsumption_rover::console::UartConsole;
use subsumption_rover::core::{Controller, TimeSource};
use subsumption_rover::indicator::GpioIndicator;
use subsumption_rover::platform::UartInterface;
use subsumption_rover::log_info;
use subsumption_rover::parameters::RoverParams;

use crate::console::console_symbol;
use crate::error::SitlError;
use crate::platform::{SitlGpio, SitlHardware, SitlPwm, SitlTimeSource};

/// Arena capacity: seven behaviors plus one spare
pub const BEHAVIOR_SLOTS: usize = 8;

/// State shared between behaviors
#[derive(Debug, Default)]
pub struct RoverState {
    pub encoders: EncoderCounts,
    pub pose: Cell<Pose>,
}

impl RoverState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One instance of every rover behavior, configured from [`RoverParams`]
pub struct RoverBehaviors<'s> {
    pub position: Position<'s>,
    pub collision: CollisionRecovery<SitlGpio>,
    pub navigator: Navigator<'s>,
    pub cruise: CruiseControl<'s>,
    pub leds: LedDriver<'s, SitlPwm>,
    pub motors: MotorDriver<SitlPwm, SitlGpio>,
    pub waypoints: WaypointManager,
}

impl<'s> RoverBehaviors<'s> {
    pub fn new(state: &'s RoverState, hardware: &SitlHardware, params: &RoverParams) -> Self {
        let (kp, ki, kd) = params.cruise_gains;
        let (left_ratio, right_ratio) = params.led_ratios;
        Self {
            position: Position::new(
                &state.encoders,
                &state.pose,
                params.ticks_per_inch,
                params.wheel_spacing,
            ),
            collision: CollisionRecovery::new(
                hardware.left_bumper.clone(),
                hardware.right_bumper.clone(),
            )
            .with_profile(params.bump_speeds, params.bump_times),
            navigator: Navigator::new(&state.pose),
            cruise: CruiseControl::new(&state.pose)
                .with_gains(Gains { kp, ki, kd })
                .with_speed(params.cruise_ips),
            leds: LedDriver::new(
                LedPair::new(
                    hardware.left_led_forward.clone(),
                    hardware.left_led_back.clone(),
                ),
                LedPair::new(
                    hardware.right_led_forward.clone(),
                    hardware.right_led_back.clone(),
                ),
                &state.encoders,
            )
            .with_ratios(left_ratio, right_ratio),
            motors: MotorDriver::new(
                MotorChannel::new(hardware.left_motor.clone(), hardware.left_direction.clone()),
                MotorChannel::new(
                    hardware.right_motor.clone(),
                    hardware.right_direction.clone(),
                ),
            ),
            waypoints: WaypointManager::new(),
        }
    }
}

/// A wired controller plus handles for observing the simulation
pub struct SitlRover<'b> {
    controller: Controller<'b, BEHAVIOR_SLOTS>,
    state: &'b RoverState,
    hardware: SitlHardware,
    indicator: GpioIndicator<SitlGpio>,
}

impl<'b> SitlRover<'b> {
    /// Attach every behavior, lowest priority first
    ///
    /// The resulting chain is `P B N C L M`; `W` answers commands only.
    pub fn new(
        behaviors: &'b mut RoverBehaviors<'_>,
        state: &'b RoverState,
        hardware: SitlHardware,
        tick_ms: u32,
        now_ms: u64,
    ) -> Result<Self, SitlError> {
        let RoverBehaviors {
            position,
            collision,
            navigator,
            cruise,
            leds,
            motors,
            waypoints,
        } = behaviors;

        let mut controller = Controller::new(tick_ms, now_ms);
        controller.attach(motors, motor_driver::LETTER)?;
        controller.attach(leds, led_driver::LETTER)?;
        controller.attach(cruise, cruise_control::LETTER)?;
        controller.attach(navigator, navigator::LETTER)?;
        controller.attach(collision, collision_recovery::LETTER)?;
        controller.attach(position, position::LETTER)?;
        controller.attach_commands(waypoints, waypoints::LETTER)?;
        log_info!("rover wired, tick {} ms", tick_ms);

        let indicator = GpioIndicator::new(hardware.activity_led.clone());
        Ok(Self {
            controller,
            state,
            hardware,
            indicator,
        })
    }

    /// Feed one host byte, returning whether a line was dispatched
    pub fn feed(&mut self, byte: u8, console: &mut dyn fmt::Write) -> bool {
        match console_symbol(byte) {
            Some(symbol) => self.controller.feed(symbol, console),
            None => false,
        }
    }

    /// Feed host text, returning the number of lines dispatched
    pub fn feed_str(&mut self, input: &str, console: &mut dyn fmt::Write) -> usize {
        input
            .bytes()
            .filter(|&byte| self.feed(byte, console))
            .count()
    }

    /// Dispatch every byte waiting on a serial console
    ///
    /// Bytes go to the router as received, so line ends must already be `\r`.
    pub fn pump<U: UartInterface>(&mut self, console: &mut UartConsole<U>) -> usize {
        console.pump(&mut self.controller)
    }

    /// Run one tick if it is due
    pub fn poll(&mut self, now_ms: u64, console: &mut dyn fmt::Write) -> bool {
        self.controller
            .poll_with(now_ms, console, &mut self.indicator)
    }

    /// Advance simulated time in 1 ms steps for `duration_ms`, polling after each
    ///
    /// Returns the number of ticks run.
    pub fn run_for(
        &mut self,
        time: &SitlTimeSource,
        duration_ms: u64,
        console: &mut dyn fmt::Write,
    ) -> u32 {
        let mut ticks = 0;
        for _ in 0..duration_ms {
            time.advance_ms(1);
            if self.poll(time.now_ms(), console) {
                ticks += 1;
            }
        }
        ticks
    }

    /// Pose as of the last tick
    pub fn pose(&self) -> Pose {
        self.state.pose.get()
    }

    pub fn encoders(&self) -> (i32, i32) {
        self.state.encoders.snapshot()
    }

    pub fn hardware(&self) -> &SitlHardware {
        &self.hardware
    }

    pub fn controller(&self) -> &Controller<'b, BEHAVIOR_SLOTS> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<'b, BEHAVIOR_SLOTS> {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subsumption_rover::platform::traits::UartConfig;
    use subsumption_rover::platform::GpioInterface;

    use crate::platform::SitlUart;

    fn run<F>(test: F)
    where
        F: FnOnce(&mut SitlRover<'_>, &SitlTimeSource, &mut String),
    {
        let params = RoverParams::default();
        let hardware = SitlHardware::new();
        let state = RoverState::new();
        let mut behaviors = RoverBehaviors::new(&state, &hardware, &params);
        let time = SitlTimeSource::new();
        let mut rover = SitlRover::new(&mut behaviors, &state, hardware, 20, 0).unwrap();
        let mut console = String::new();
        test(&mut rover, &time, &mut console);
    }

    #[test]
    fn test_chain_order() {
        run(|rover, _, _| {
            let arena = rover.controller().arena();
            let mut names = Vec::new();
            let mut next = rover.controller().scheduler().head();
            while let Some(id) = next {
                names.push(arena.get(id).map(|b| b.core().name()).unwrap_or("?"));
                next = arena.next_control(id);
            }
            assert_eq!(
                names,
                ["Position", "Crash Recover", "Navigator", "Cruise Control", "LED 'Motor'", "Motor"]
            );
            assert_eq!(arena.len(), 7);
        });
    }

    #[test]
    fn test_inhibited_until_go() {
        run(|rover, time, console| {
            assert_eq!(rover.run_for(time, 100, console), 5);
            assert_eq!(rover.hardware().motor_output(), (0, 0));
            assert_eq!(rover.controller().token().claimant().map(|c| c.name), Some("Director"));
        });
    }

    #[test]
    fn test_manual_drive_moves_rover() {
        run(|rover, time, console| {
            rover.feed_str("DG\nNG 50 50\n", console);
            rover.run_for(time, 200, console);
            assert_eq!(rover.hardware().motor_output(), (50, 50));
            assert_eq!(rover.hardware().led_output(), (50, 50));
            let pose = rover.pose();
            assert!(pose.y_inches > 0.0);
            assert!(pose.x_inches.abs() < pose.y_inches / 10.0);
            assert!(!rover.hardware().activity_led.read());
        });
    }

    #[test]
    fn test_serial_console_drives_rover() {
        run(|rover, time, _| {
            let mut serial = UartConsole::new(SitlUart::new(UartConfig::default()));
            serial.uart_mut().inject_rx_data(b"DG\rNG 30 30\r");
            assert_eq!(rover.pump(&mut serial), 2);

            rover.run_for(time, 100, &mut serial);
            assert_eq!(rover.hardware().motor_output(), (30, 30));
            let output = String::from_utf8(serial.uart_mut().drain_tx()).unwrap();
            assert!(output.contains("Director Started"));
            assert_eq!(serial.take_error(), None);
        });
    }

    #[test]
    fn test_log_macros_expand_outside_defining_crate() {
        let tick_ms = 20;
        subsumption_rover::log_info!("rover wired, tick {} ms", tick_ms);
        subsumption_rover::log_warn!("console read failed on {}", "uart0");
        subsumption_rover::log_error!("pwm {} rejected", 2);
        subsumption_rover::log_debug!("tick");
        subsumption_rover::log_trace!("claimant {}", "Navigator");
    }
}
