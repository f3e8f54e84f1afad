//! Next-destination selection.
//!
//! Directional scan: keep going while calls remain ahead, otherwise pick the
//! nearest pending floor in either direction. Equal distances resolve to the
//! lower floor. A call at the current floor is served in place only when no
//! other floor is waiting.

use crate::elevator::motion;
use crate::elevator::orders::Requests;
use crate::elevator::position::FloorIndex;
use crate::elevator::state::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub target: FloorIndex,
    pub direction: Direction,
}

impl Dispatch {
    pub fn in_place(&self, current_floor: FloorIndex) -> bool {
        self.target == current_floor
    }
}

pub fn select_target(
    current_floor: FloorIndex,
    last_direction: Direction,
    requests: &Requests,
) -> Option<Dispatch> {
    if !requests.has_any() {
        return None;
    }

    if last_direction != Direction::Stop && requests.pending_in_direction(current_floor, last_direction) {
        if let Some(target) = requests.nearest_ahead(current_floor, last_direction) {
            return Some(Dispatch {
                target,
                direction: last_direction,
            });
        }
    }

    if let Some(target) = nearest_outward(current_floor, requests) {
        return Some(Dispatch {
            target,
            direction: motion::motor_direction(current_floor, target),
        });
    }

    // Only the current floor is waiting.
    Some(Dispatch {
        target: current_floor,
        direction: Direction::Stop,
    })
}

fn nearest_outward(current_floor: FloorIndex, requests: &Requests) -> Option<FloorIndex> {
    let pending = requests.pending_floors();
    for distance in 1..requests.num_floors() {
        let below = current_floor.checked_sub(distance);
        let above = current_floor
            .checked_add(distance)
            .filter(|&floor| floor < requests.num_floors());

        if below.is_none() && above.is_none() {
            break;
        }
        if let Some(floor) = below.filter(|&floor| pending.contains(floor)) {
            return Some(floor);
        }
        if let Some(floor) = above.filter(|&floor| pending.contains(floor)) {
            return Some(floor);
        }
    }
    None
}
