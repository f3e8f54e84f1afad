use crate::config::config;
use crate::elevator::elevator_fsm::Controller;
use crate::elevator::orders::{FloorMask, RequestKind};
use crate::elevator::position::FloorIndex;
use crate::elevator::state::{Inputs, Snapshot};

use std::time;

use crossbeam_channel as cbc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pulses a request line for the next sampled tick.
    Call(RequestKind, FloorIndex),
    /// Sets the floor sensor vector until changed.
    Sensors(FloorMask),
    /// Holds the reset line.
    Reset(bool),
    Shutdown,
}

/// Input levels held between ticks, plus request pulses waiting to be sampled.
#[derive(Debug, Clone, Copy, Default)]
struct InputLatch {
    levels: Inputs,
    pulses: Inputs,
}

impl InputLatch {
    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Call(kind, floor) => {
                let lines = match kind {
                    RequestKind::Internal => &mut self.pulses.internal_requests,
                    RequestKind::ExternalUp => &mut self.pulses.external_up_requests,
                    RequestKind::ExternalDown => &mut self.pulses.external_down_requests,
                };
                lines.insert(floor);
            }
            InputEvent::Sensors(sensors) => self.levels.floor_sensors = sensors,
            InputEvent::Reset(asserted) => self.levels.reset = asserted,
            InputEvent::Shutdown => {}
        }
    }

    fn sample(&mut self) -> Inputs {
        let pulses = std::mem::take(&mut self.pulses);
        Inputs {
            internal_requests: self.levels.internal_requests.union(pulses.internal_requests),
            external_up_requests: self.levels.external_up_requests.union(pulses.external_up_requests),
            external_down_requests: self
                .levels
                .external_down_requests
                .union(pulses.external_down_requests),
            ..self.levels
        }
    }
}

/// Runs a controller off a fixed-period clock until shut down. A snapshot is
/// published whenever the state or outputs change. Returns the number of
/// ticks executed, or the configuration error if the controller could not be
/// built.
pub fn run(
    controller_config: config::ControllerConfig,
    tick_period: time::Duration,
    initial_sensors: FloorMask,
    input_event_rx: cbc::Receiver<InputEvent>,
    snapshot_tx: cbc::Sender<Snapshot>,
) -> Result<u64, config::ConfigError> {
    let mut controller = Controller::new(controller_config)?;
    let mut latch = InputLatch::default();
    latch.levels.floor_sensors = initial_sensors;

    let clock = cbc::tick(tick_period);
    let mut last_published: Option<Snapshot> = None;

    info!(
        num_floors = controller_config.num_floors,
        tick_period_us = tick_period.as_micros() as u64,
        "clock driver started"
    );

    loop {
        cbc::select! {
            recv(input_event_rx) -> input_event_message => {
                match input_event_message {
                    Ok(InputEvent::Shutdown) | Err(_) => break,
                    Ok(input_event) => {
                        debug!(?input_event, "input event");
                        latch.apply(input_event);
                    }
                }
            },
            recv(clock) -> _ => {
                controller.step(&latch.sample());
                let snapshot = controller.snapshot();

                let changed = last_published.map_or(true, |last| {
                    last.outputs != snapshot.outputs || last.state != snapshot.state
                });
                if changed {
                    if snapshot_tx.send(snapshot).is_err() {
                        warn!("snapshot receiver dropped, stopping clock driver");
                        break;
                    }
                    last_published = Some(snapshot);
                }
            }
        }
    }

    info!(ticks = controller.ticks(), "clock driver stopped");
    Ok(controller.ticks())
}
