use crate::elevator::orders::FloorMask;
use crate::elevator::position::FloorIndex;

use serde;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Reset,
    Idle,
    Moving,
    DoorOpen,
    DoorClosing,
}

impl ControllerState {
    pub fn to_string(&self) -> String {
        match self {
            ControllerState::Reset => "reset".to_string(),
            ControllerState::Idle => "idle".to_string(),
            ControllerState::Moving => "moving".to_string(),
            ControllerState::DoorOpen => "doorOpen".to_string(),
            ControllerState::DoorClosing => "doorClosing".to_string(),
        }
    }
}

/// Direction of the most recent or ongoing motion. `Stop` means no direction
/// has been established yet.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Direction {
    #[default]
    Stop,
    Up,
    Down,
}

impl Direction {
    pub fn to_string(&self) -> String {
        match self {
            Direction::Up => "up".to_string(),
            Direction::Down => "down".to_string(),
            Direction::Stop => "stop".to_string(),
        }
    }
}

/// One synchronously sampled input vector.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    pub reset: bool,
    pub internal_requests: FloorMask,
    pub external_up_requests: FloorMask,
    pub external_down_requests: FloorMask,
    pub floor_sensors: FloorMask,
}

impl Inputs {
    /// Inputs with every request line low and the sensor reading `floor`.
    pub fn at_floor(floor: FloorIndex) -> Self {
        Self {
            floor_sensors: FloorMask::single(floor),
            ..Self::default()
        }
    }

    /// Request lines asserted now but not on the `previous` tick. A line held
    /// across several ticks is one call.
    pub fn rising_requests(&self, previous: &Inputs) -> Inputs {
        Inputs {
            internal_requests: self.internal_requests.difference(previous.internal_requests),
            external_up_requests: self.external_up_requests.difference(previous.external_up_requests),
            external_down_requests: self
                .external_down_requests
                .difference(previous.external_down_requests),
            ..*self
        }
    }
}

/// Command outputs driven every tick.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outputs {
    pub motor_up: bool,
    pub motor_down: bool,
    pub door_open: bool,
    pub door_close: bool,
    pub current_floor: FloorIndex,
    pub sensor_fault: bool,
}

impl Outputs {
    pub fn idle(current_floor: FloorIndex, sensor_fault: bool) -> Self {
        Self {
            current_floor,
            sensor_fault,
            ..Self::default()
        }
    }

    pub fn with_motor(mut self, direction: Direction) -> Self {
        self.motor_up = direction == Direction::Up;
        self.motor_down = direction == Direction::Down;
        self
    }

    pub fn is_quiet(&self) -> bool {
        !(self.motor_up || self.motor_down || self.door_open || self.door_close)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub tick: u64,
    pub state: ControllerState,
    pub direction: Direction,
    pub outputs: Outputs,
}
