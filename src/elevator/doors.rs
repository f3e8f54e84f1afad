use crate::config::config;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPhase {
    Closed,
    Open,
    Closing,
}

/// Counts the open hold and the closing phase in ticks. The timer restarts at
/// zero on entry to each phase.
#[derive(Debug, Clone)]
pub struct DoorSequencer {
    open_ticks: u32,
    close_ticks: u32,
    phase: DoorPhase,
    timer: u32,
}

impl DoorSequencer {
    /// Both durations must be nonzero; `ControllerConfig::validate` rejects
    /// zero before a controller is built.
    pub fn new(open_ticks: u32, close_ticks: u32) -> Self {
        Self {
            open_ticks,
            close_ticks,
            phase: DoorPhase::Closed,
            timer: 0,
        }
    }

    pub fn from_config(config: &config::ControllerConfig) -> Self {
        Self::new(config.door_open_time, config.door_close_time)
    }

    pub fn open(&mut self) {
        self.phase = DoorPhase::Open;
        self.timer = 0;
    }

    /// Advances one tick and returns the phase the doors are in afterwards.
    pub fn tick(&mut self) -> DoorPhase {
        match self.phase {
            DoorPhase::Open => {
                self.timer += 1;
                if self.timer >= self.open_ticks {
                    self.phase = DoorPhase::Closing;
                    self.timer = 0;
                }
            }
            DoorPhase::Closing => {
                self.timer += 1;
                if self.timer >= self.close_ticks {
                    self.phase = DoorPhase::Closed;
                    self.timer = 0;
                }
            }
            DoorPhase::Closed => {}
        }
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = DoorPhase::Closed;
        self.timer = 0;
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }
}
