use crate::elevator::position::FloorIndex;
use crate::elevator::state::Direction;

pub fn motor_direction(current_floor: FloorIndex, target: FloorIndex) -> Direction {
    if target > current_floor {
        Direction::Up
    } else if target < current_floor {
        Direction::Down
    } else {
        Direction::Stop
    }
}

/// A committed destination. Once set it is held until the car arrives;
/// newer calls never redirect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    target: FloorIndex,
}

impl Motion {
    pub fn toward(target: FloorIndex) -> Self {
        Self { target }
    }

    pub fn target(&self) -> FloorIndex {
        self.target
    }

    pub fn arrived(&self, current_floor: FloorIndex) -> bool {
        current_floor == self.target
    }

    pub fn drive(&self, current_floor: FloorIndex) -> Direction {
        motor_direction(current_floor, self.target)
    }
}
