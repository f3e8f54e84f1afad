use std::fs;
use std::path::{Path, PathBuf};
use std::time;

use thiserror::Error;

pub const MAX_FLOORS: u8 = 32;
pub const MIN_FLOORS: u8 = 2;

pub const DEFAULT_NUM_FLOORS: u8 = 4;

// Door timings are counted in controller ticks.
pub const DOOR_OPEN_TIME: u32 = 5000;
pub const DOOR_CLOSE_TIME: u32 = DOOR_OPEN_TIME;
pub const SETTLE_MARGIN: u32 = 1000;

pub const TICK_PERIOD: time::Duration = time::Duration::from_micros(100);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("num_floors must be within {}..={}, got {}", MIN_FLOORS, MAX_FLOORS, .0)]
    NumFloors(u8),
    #[error("{0} must be at least one tick")]
    ZeroDuration(&'static str),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ControllerConfig {
    pub num_floors: u8,
    pub door_open_time: u32,
    pub door_close_time: u32,
    pub settle_margin: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            num_floors: DEFAULT_NUM_FLOORS,
            door_open_time: DOOR_OPEN_TIME,
            door_close_time: DOOR_CLOSE_TIME,
            settle_margin: SETTLE_MARGIN,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FLOORS..=MAX_FLOORS).contains(&self.num_floors) {
            return Err(ConfigError::NumFloors(self.num_floors));
        }
        if self.door_open_time == 0 {
            return Err(ConfigError::ZeroDuration("door_open_time"));
        }
        if self.door_close_time == 0 {
            return Err(ConfigError::ZeroDuration("door_close_time"));
        }
        Ok(())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub controller: ControllerConfig,
    pub tick_period_us: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            tick_period_us: TICK_PERIOD.as_micros() as u64,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        if self.tick_period_us == 0 {
            return Err(ConfigError::ZeroDuration("tick_period_us"));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> time::Duration {
        time::Duration::from_micros(self.tick_period_us)
    }
}
