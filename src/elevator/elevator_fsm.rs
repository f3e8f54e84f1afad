//! Top-level synchronous controller.
//!
//! [`Controller::step`] is one clock edge: inputs are sampled once, the state
//! advances at most one transition, and the returned outputs hold until the
//! next call. Outputs are a function of the post-update state, so the three
//! output invariants (motor exclusivity, door exclusivity, no motion while a
//! door command is asserted) hold on every tick.
//!
//! Request lines are edge-triggered: a call is latched on the tick its line
//! rises, and holding the line afterwards raises nothing further. A floor served
//! while its button is still held stays cleared until the button is released
//! and pressed again.

use crate::config::config;
use crate::elevator::dispatch;
use crate::elevator::doors::{DoorPhase, DoorSequencer};
use crate::elevator::motion::Motion;
use crate::elevator::orders::Requests;
use crate::elevator::position::{FloorIndex, PositionTracker};
use crate::elevator::state::{ControllerState, Direction, Inputs, Outputs, Snapshot};

use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Controller {
    config: config::ControllerConfig,
    state: ControllerState,
    position: PositionTracker,
    requests: Requests,
    request_lines: Inputs,
    doors: DoorSequencer,
    motion: Option<Motion>,
    last_direction: Direction,
    outputs: Outputs,
    ticks: u64,
    idle_ticks: u64,
}

impl Controller {
    pub fn new(config: config::ControllerConfig) -> Result<Self, config::ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ControllerState::Reset,
            position: PositionTracker::new(config.num_floors),
            requests: Requests::init(config.num_floors),
            request_lines: Inputs::default(),
            doors: DoorSequencer::from_config(&config),
            motion: None,
            last_direction: Direction::Stop,
            outputs: Outputs::default(),
            ticks: 0,
            idle_ticks: 0,
            config,
        })
    }

    pub fn step(&mut self, inputs: &Inputs) -> Outputs {
        self.ticks += 1;
        let floor = self.position.update(inputs.floor_sensors).ok();
        let calls = inputs.rising_requests(&self.request_lines);
        self.request_lines = *inputs;

        if inputs.reset {
            self.enter_reset();
        } else {
            match self.state {
                ControllerState::Reset => self.transition(ControllerState::Idle),
                ControllerState::Idle => {
                    self.requests.latch(&calls);
                    if let Some(floor) = floor {
                        self.dispatch(floor);
                    }
                }
                ControllerState::Moving => {
                    self.requests.latch(&calls);
                    if let Some(floor) = floor {
                        self.track_motion(floor);
                    }
                }
                ControllerState::DoorOpen => {
                    self.requests.latch(&calls);
                    if self.doors.tick() == DoorPhase::Closing {
                        self.transition(ControllerState::DoorClosing);
                    }
                }
                ControllerState::DoorClosing => {
                    self.requests.latch(&calls);
                    if self.doors.tick() == DoorPhase::Closed {
                        self.transition(ControllerState::Idle);
                    }
                }
            }
        }

        self.idle_ticks = match self.state {
            ControllerState::Idle => self.idle_ticks + 1,
            _ => 0,
        };
        self.outputs = self.drive_outputs();
        self.outputs
    }

    fn enter_reset(&mut self) {
        if self.state != ControllerState::Reset {
            self.transition(ControllerState::Reset);
        }
        self.requests.clear_all();
        self.doors.reset();
        self.motion = None;
        self.last_direction = Direction::Stop;
    }

    fn dispatch(&mut self, floor: FloorIndex) {
        let Some(next) = dispatch::select_target(floor, self.last_direction, &self.requests) else {
            return;
        };

        if next.in_place(floor) {
            self.serve(floor);
        } else {
            info!(from = floor, to = next.target, direction = %next.direction.to_string(), "departing");
            self.motion = Some(Motion::toward(next.target));
            self.last_direction = next.direction;
            self.transition(ControllerState::Moving);
        }
    }

    fn track_motion(&mut self, floor: FloorIndex) {
        let Some(motion) = self.motion else {
            // Moving is only entered with a committed target.
            self.transition(ControllerState::Idle);
            return;
        };

        if motion.arrived(floor) {
            self.motion = None;
            self.serve(floor);
        } else {
            self.last_direction = motion.drive(floor);
        }
    }

    fn serve(&mut self, floor: FloorIndex) {
        self.requests.clear_floor(floor);
        self.doors.open();
        info!(floor, "serving floor");
        self.transition(ControllerState::DoorOpen);
    }

    fn transition(&mut self, next: ControllerState) {
        debug!(
            tick = self.ticks,
            from = %self.state.to_string(),
            to = %next.to_string(),
            floor = self.position.floor(),
            "state transition"
        );
        self.state = next;
    }

    fn drive_outputs(&self) -> Outputs {
        let floor = self.position.floor();
        let outputs = Outputs::idle(floor, self.position.is_faulted());
        match self.state {
            ControllerState::Reset | ControllerState::Idle => outputs,
            ControllerState::Moving => match self.motion {
                Some(motion) => outputs.with_motor(motion.drive(floor)),
                None => outputs,
            },
            ControllerState::DoorOpen => Outputs {
                door_open: true,
                ..outputs
            },
            ControllerState::DoorClosing => Outputs {
                door_close: true,
                ..outputs
            },
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn outputs(&self) -> Outputs {
        self.outputs
    }

    pub fn current_floor(&self) -> FloorIndex {
        self.position.floor()
    }

    pub fn sensor_fault(&self) -> bool {
        self.position.is_faulted()
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub fn target(&self) -> Option<FloorIndex> {
        self.motion.map(|motion| motion.target())
    }

    pub fn requests(&self) -> &Requests {
        &self.requests
    }

    pub fn door_timer(&self) -> u32 {
        self.doors.timer()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &config::ControllerConfig {
        &self.config
    }

    /// Idle for at least `margin` consecutive ticks.
    pub fn is_settled(&self, margin: u32) -> bool {
        self.state == ControllerState::Idle && self.idle_ticks >= u64::from(margin)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            state: self.state,
            direction: self.last_direction,
            outputs: self.outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator::orders::{FloorMask, RequestKind};

    fn quick_config() -> config::ControllerConfig {
        config::ControllerConfig {
            num_floors: 4,
            door_open_time: 3,
            door_close_time: 2,
            settle_margin: 2,
        }
    }

    fn released(floor: FloorIndex) -> Controller {
        let mut controller = Controller::new(quick_config()).unwrap();
        controller.step(&Inputs {
            reset: true,
            ..Inputs::at_floor(floor)
        });
        controller.step(&Inputs::at_floor(floor));
        controller
    }

    #[test]
    fn starts_in_reset_and_releases_to_idle() {
        let mut controller = Controller::new(quick_config()).unwrap();
        assert_eq!(controller.state(), ControllerState::Reset);

        let outputs = controller.step(&Inputs {
            reset: true,
            internal_requests: FloorMask::single(2),
            ..Inputs::at_floor(0)
        });
        assert!(outputs.is_quiet());
        assert!(!controller.requests().has_any());

        controller.step(&Inputs {
            internal_requests: FloorMask::single(2),
            ..Inputs::at_floor(0)
        });
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.outputs().is_quiet());
        assert!(!controller.requests().has_any());
    }

    #[test]
    fn departs_on_the_tick_a_call_is_sampled() {
        let mut controller = released(0);
        let outputs = controller.step(&Inputs {
            internal_requests: FloorMask::single(2),
            ..Inputs::at_floor(0)
        });
        assert_eq!(controller.state(), ControllerState::Moving);
        assert!(outputs.motor_up && !outputs.motor_down);
        assert_eq!(controller.target(), Some(2));
        assert_eq!(controller.last_direction(), Direction::Up);
    }

    #[test]
    fn arrival_stops_motor_and_opens_door_same_tick() {
        let mut controller = released(0);
        controller.step(&Inputs {
            internal_requests: FloorMask::single(1),
            ..Inputs::at_floor(0)
        });
        let outputs = controller.step(&Inputs::at_floor(1));
        assert_eq!(controller.state(), ControllerState::DoorOpen);
        assert!(outputs.door_open && !outputs.motor_up && !outputs.motor_down);
        assert!(!controller.requests().is_pending(RequestKind::Internal, 1));
    }

    #[test]
    fn in_place_call_opens_door_without_motion() {
        let mut controller = released(2);
        let outputs = controller.step(&Inputs {
            external_down_requests: FloorMask::single(2),
            ..Inputs::at_floor(2)
        });
        assert_eq!(controller.state(), ControllerState::DoorOpen);
        assert!(outputs.door_open);
        assert_eq!(controller.door_timer(), 0);
    }

    #[test]
    fn held_call_is_served_once() {
        let mut controller = released(2);
        let held = Inputs {
            internal_requests: FloorMask::single(2),
            ..Inputs::at_floor(2)
        };
        controller.step(&held);
        assert_eq!(controller.state(), ControllerState::DoorOpen);

        for _ in 0..3 {
            controller.step(&held);
            assert!(!controller.requests().has_any());
        }
        while controller.state() != ControllerState::Idle {
            controller.step(&held);
        }
        controller.step(&held);
        assert_eq!(controller.state(), ControllerState::Idle);

        controller.step(&Inputs::at_floor(2));
        controller.step(&held);
        assert_eq!(controller.state(), ControllerState::DoorOpen);
    }

    #[test]
    fn line_held_through_reset_is_not_a_call() {
        let mut controller = released(0);
        let held = Inputs {
            external_up_requests: FloorMask::single(3),
            ..Inputs::at_floor(0)
        };
        controller.step(&Inputs { reset: true, ..held });
        controller.step(&held);
        controller.step(&held);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(!controller.requests().has_any());
    }

    #[test]
    fn zero_door_duration_is_rejected() {
        let config = config::ControllerConfig {
            door_open_time: 0,
            ..quick_config()
        };
        assert!(matches!(
            Controller::new(config),
            Err(config::ConfigError::ZeroDuration("door_open_time"))
        ));
    }

    #[test]
    fn reset_wins_from_any_state() {
        let mut controller = released(0);
        controller.step(&Inputs {
            internal_requests: FloorMask::from_bits(0b1100),
            ..Inputs::at_floor(0)
        });
        assert_eq!(controller.state(), ControllerState::Moving);

        let outputs = controller.step(&Inputs {
            reset: true,
            ..Inputs::at_floor(1)
        });
        assert_eq!(controller.state(), ControllerState::Reset);
        assert!(outputs.is_quiet());
        assert_eq!(outputs.current_floor, 1);
        assert_eq!(controller.target(), None);
        assert!(!controller.requests().has_any());
    }

    #[test]
    fn settles_after_margin_idle_ticks() {
        let mut controller = released(0);
        assert!(!controller.is_settled(2));
        controller.step(&Inputs::at_floor(0));
        assert!(controller.is_settled(2));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, ControllerState::Idle);
        assert_eq!(snapshot.tick, controller.ticks());
    }
}
