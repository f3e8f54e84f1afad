//! Floor position decoding from the one-hot sensor vector.

use crate::elevator::orders::FloorMask;

use thiserror::Error;
use tracing::{info, warn};

pub type FloorIndex = u8;

/// A sensor vector that does not name exactly one configured floor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    #[error("no floor sensor asserted")]
    NoFloor,
    #[error("multiple floor sensors asserted: {0}")]
    MultipleFloors(FloorMask),
    #[error("floor sensor outside configured floors: {0}")]
    OutOfRange(FloorMask),
}

/// Decodes a one-hot sensor vector into a floor index.
pub fn decode(sensors: FloorMask, num_floors: u8) -> Result<FloorIndex, SensorFault> {
    if sensors.is_empty() {
        return Err(SensorFault::NoFloor);
    }
    if sensors.count() > 1 {
        return Err(SensorFault::MultipleFloors(sensors));
    }
    let floor = sensors.lowest().ok_or(SensorFault::NoFloor)?;
    if floor >= num_floors {
        return Err(SensorFault::OutOfRange(sensors));
    }
    Ok(floor)
}

/// Latches the last valid floor across faulty readings.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    num_floors: u8,
    floor: FloorIndex,
    fault: Option<SensorFault>,
}

impl PositionTracker {
    pub fn new(num_floors: u8) -> Self {
        Self {
            num_floors,
            floor: 0,
            fault: None,
        }
    }

    pub fn update(&mut self, sensors: FloorMask) -> Result<FloorIndex, SensorFault> {
        match decode(sensors, self.num_floors) {
            Ok(floor) => {
                if self.fault.take().is_some() {
                    info!(floor, "floor sensor recovered");
                }
                self.floor = floor;
                Ok(floor)
            }
            Err(fault) => {
                if self.fault != Some(fault) {
                    warn!(%fault, latched_floor = self.floor, "floor sensor fault");
                }
                self.fault = Some(fault);
                Err(fault)
            }
        }
    }

    pub fn floor(&self) -> FloorIndex {
        self.floor
    }

    pub fn fault(&self) -> Option<SensorFault> {
        self.fault
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }
}
