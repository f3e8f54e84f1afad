use crate::config::config::{Config, ConfigError};

use std::path::PathBuf;

use clap::Parser;

/// Single-car elevator controller driven by a fixed-period clock.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "elevator-controller", version, about)]
pub struct Arguments {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of served floors.
    #[arg(long)]
    pub floors: Option<u8>,

    /// Ticks the door is held open.
    #[arg(long)]
    pub door_open_time: Option<u32>,

    /// Ticks spent closing the door.
    #[arg(long)]
    pub door_close_time: Option<u32>,

    /// Clock period in microseconds.
    #[arg(long)]
    pub tick_us: Option<u64>,
}

impl Arguments {
    /// Builds the effective configuration: file (or defaults), then flags.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(floors) = self.floors {
            config.controller.num_floors = floors;
        }
        if let Some(ticks) = self.door_open_time {
            config.controller.door_open_time = ticks;
        }
        if let Some(ticks) = self.door_close_time {
            config.controller.door_close_time = ticks;
        }
        if let Some(micros) = self.tick_us {
            config.tick_period_us = micros;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn fetch_command_line_arguments() -> Arguments {
    Arguments::parse()
}
