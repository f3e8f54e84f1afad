use crate::config::config;
use crate::elevator::position::FloorIndex;
use crate::elevator::state::{Direction, Inputs};

use std::fmt;
use tracing::warn;

/// One bit per floor, bit `i` for floor `i`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloorMask(u32);

impl FloorMask {
    pub const EMPTY: FloorMask = FloorMask(0);

    pub fn from_bits(bits: u32) -> Self {
        FloorMask(bits)
    }

    pub fn single(floor: FloorIndex) -> Self {
        if floor >= config::MAX_FLOORS {
            return FloorMask::EMPTY;
        }
        FloorMask(1 << floor)
    }

    /// Every floor below `num_floors`.
    pub fn all(num_floors: u8) -> Self {
        if num_floors >= config::MAX_FLOORS {
            FloorMask(u32::MAX)
        } else {
            FloorMask((1u32 << num_floors) - 1)
        }
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, floor: FloorIndex) -> bool {
        floor < config::MAX_FLOORS && self.0 & (1 << floor) != 0
    }

    pub fn insert(&mut self, floor: FloorIndex) {
        self.0 |= FloorMask::single(floor).0;
    }

    pub fn remove(&mut self, floor: FloorIndex) {
        self.0 &= !FloorMask::single(floor).0;
    }

    pub fn union(self, other: FloorMask) -> Self {
        FloorMask(self.0 | other.0)
    }

    pub fn intersection(self, other: FloorMask) -> Self {
        FloorMask(self.0 & other.0)
    }

    pub fn difference(self, other: FloorMask) -> Self {
        FloorMask(self.0 & !other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn lowest(&self) -> Option<FloorIndex> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as FloorIndex)
        }
    }

    pub fn floors(self) -> impl Iterator<Item = FloorIndex> {
        (0..config::MAX_FLOORS).filter(move |&floor| self.contains(floor))
    }
}

impl fmt::Display for FloorMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestKind {
    Internal,
    ExternalUp,
    ExternalDown,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::Internal,
        RequestKind::ExternalUp,
        RequestKind::ExternalDown,
    ];

    pub fn to_string(&self) -> String {
        match self {
            RequestKind::Internal => "internal".to_string(),
            RequestKind::ExternalUp => "externalUp".to_string(),
            RequestKind::ExternalDown => "externalDown".to_string(),
        }
    }
}

/// Pending, unserviced calls. Bits are raised only from sampled inputs and
/// cleared only when the controller services a floor.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Requests {
    num_floors: u8,
    internal: FloorMask,
    external_up: FloorMask,
    external_down: FloorMask,
}

impl Requests {
    pub fn init(num_floors: u8) -> Self {
        Self {
            num_floors,
            internal: FloorMask::EMPTY,
            external_up: FloorMask::EMPTY,
            external_down: FloorMask::EMPTY,
        }
    }

    pub fn num_floors(&self) -> u8 {
        self.num_floors
    }

    fn set_mut(&mut self, kind: RequestKind) -> &mut FloorMask {
        match kind {
            RequestKind::Internal => &mut self.internal,
            RequestKind::ExternalUp => &mut self.external_up,
            RequestKind::ExternalDown => &mut self.external_down,
        }
    }

    pub fn mask(&self, kind: RequestKind) -> FloorMask {
        match kind {
            RequestKind::Internal => self.internal,
            RequestKind::ExternalUp => self.external_up,
            RequestKind::ExternalDown => self.external_down,
        }
    }

    pub fn raise(&mut self, kind: RequestKind, floor: FloorIndex) {
        if floor >= self.num_floors {
            warn!(floor, kind = %kind.to_string(), "ignoring request outside configured floors");
            return;
        }
        self.set_mut(kind).insert(floor);
    }

    pub fn clear(&mut self, kind: RequestKind, floor: FloorIndex) {
        self.set_mut(kind).remove(floor);
    }

    /// Clears every kind of call at `floor`.
    pub fn clear_floor(&mut self, floor: FloorIndex) {
        for kind in RequestKind::ALL {
            self.clear(kind, floor);
        }
    }

    pub fn clear_all(&mut self) {
        *self = Requests::init(self.num_floors);
    }

    /// Raises every asserted request line in `inputs`. Lines beyond the
    /// configured floors are outside the signal width and dropped.
    pub fn latch(&mut self, inputs: &Inputs) {
        let width = FloorMask::all(self.num_floors);
        self.internal = self.internal.union(inputs.internal_requests.intersection(width));
        self.external_up = self.external_up.union(inputs.external_up_requests.intersection(width));
        self.external_down = self
            .external_down
            .union(inputs.external_down_requests.intersection(width));
    }

    pub fn is_pending(&self, kind: RequestKind, floor: FloorIndex) -> bool {
        self.mask(kind).contains(floor)
    }

    pub fn at_floor(&self, floor: FloorIndex) -> bool {
        self.pending_floors().contains(floor)
    }

    /// Floors with at least one call of any kind.
    pub fn pending_floors(&self) -> FloorMask {
        self.internal.union(self.external_up).union(self.external_down)
    }

    pub fn has_any(&self) -> bool {
        !self.pending_floors().is_empty()
    }

    /// True if continuing in `direction` from `current_floor` has work to do:
    /// a call strictly beyond it, or any call at the floor itself.
    pub fn pending_in_direction(&self, current_floor: FloorIndex, direction: Direction) -> bool {
        self.at_floor(current_floor) || self.nearest_ahead(current_floor, direction).is_some()
    }

    /// Nearest floor with a call strictly beyond `current_floor` in `direction`.
    pub fn nearest_ahead(&self, current_floor: FloorIndex, direction: Direction) -> Option<FloorIndex> {
        let pending = self.pending_floors();
        match direction {
            Direction::Up => ((current_floor + 1)..self.num_floors).find(|&floor| pending.contains(floor)),
            Direction::Down => (0..current_floor).rev().find(|&floor| pending.contains(floor)),
            Direction::Stop => None,
        }
    }
}
