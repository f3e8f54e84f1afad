use elevator_controller::config::fetch_arguments;
use elevator_controller::driver::clock;
use elevator_controller::driver::commands;
use elevator_controller::elevator::orders::FloorMask;
use elevator_controller::elevator::state::Snapshot;

use std::io::{self, BufRead};
use std::thread::spawn;

use crossbeam_channel as cbc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let arguments = fetch_arguments::fetch_command_line_arguments();
    let config = arguments.resolve()?;
    let num_floors = config.controller.num_floors;

    let (input_event_tx, input_event_rx) = cbc::unbounded::<clock::InputEvent>();
    let (snapshot_tx, snapshot_rx) = cbc::unbounded::<Snapshot>();

    let driver = {
        let controller_config = config.controller;
        let tick_period = config.tick_period();
        spawn(move || {
            clock::run(
                controller_config,
                tick_period,
                FloorMask::single(0),
                input_event_rx,
                snapshot_tx,
            )
        })
    };

    {
        let input_event_tx = input_event_tx.clone();
        spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match commands::parse_command(&line, num_floors) {
                    Ok(input_event) => {
                        if input_event_tx.send(input_event).is_err() {
                            break;
                        }
                    }
                    Err(error) => warn!(%error, "ignoring command"),
                }
            }
            let _ = input_event_tx.send(clock::InputEvent::Shutdown);
        });
    }
    drop(input_event_tx);

    for snapshot in snapshot_rx.iter() {
        let snapshot = serde_json::to_string(&snapshot)?;
        info!(%snapshot, "outputs");
    }

    let ticks = driver
        .join()
        .map_err(|_| anyhow::anyhow!("clock driver panicked"))??;
    info!(ticks, "controller stopped");

    Ok(())
}
