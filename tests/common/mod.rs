//! Shared bench for driving a controller tick by tick.

#![allow(dead_code)]

use elevator_controller::config::config::ControllerConfig;
use elevator_controller::elevator::elevator_fsm::Controller;
use elevator_controller::elevator::orders::{FloorMask, RequestKind};
use elevator_controller::elevator::state::{ControllerState, Inputs, Outputs};

pub const RESET_TICKS: usize = 5;

pub fn bench_config() -> ControllerConfig {
    ControllerConfig {
        num_floors: 4,
        door_open_time: 5,
        door_close_time: 4,
        settle_margin: 3,
    }
}

/// Checks the output invariants that must hold on every tick.
pub fn assert_output_invariants(outputs: &Outputs) {
    assert!(!(outputs.motor_up && outputs.motor_down), "both motors: {:?}", outputs);
    assert!(!(outputs.door_open && outputs.door_close), "both door commands: {:?}", outputs);
    if outputs.door_open || outputs.door_close {
        assert!(!outputs.motor_up && !outputs.motor_down, "moving with door active: {:?}", outputs);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub state: ControllerState,
    pub outputs: Outputs,
}

pub struct Bench {
    pub controller: Controller,
    pub inputs: Inputs,
    pub trace: Vec<Tick>,
}

impl Bench {
    /// Holds reset for a few ticks at `floor`, then releases it.
    pub fn new(config: ControllerConfig, floor: u8) -> Self {
        let mut bench = Bench {
            controller: Controller::new(config).unwrap(),
            inputs: Inputs {
                reset: true,
                ..Inputs::at_floor(floor)
            },
            trace: Vec::new(),
        };
        bench.run(RESET_TICKS);
        bench.inputs.reset = false;
        bench.tick();
        bench.trace.clear();
        bench
    }

    pub fn tick(&mut self) -> Outputs {
        let outputs = self.controller.step(&self.inputs);
        assert_output_invariants(&outputs);
        self.trace.push(Tick {
            state: self.controller.state(),
            outputs,
        });
        outputs
    }

    pub fn run(&mut self, ticks: usize) -> Vec<Outputs> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    pub fn set_floor(&mut self, floor: u8) {
        self.inputs.floor_sensors = FloorMask::single(floor);
    }

    pub fn set_sensors(&mut self, sensors: FloorMask) {
        self.inputs.floor_sensors = sensors;
    }

    fn lines(&mut self, kind: RequestKind) -> &mut FloorMask {
        match kind {
            RequestKind::Internal => &mut self.inputs.internal_requests,
            RequestKind::ExternalUp => &mut self.inputs.external_up_requests,
            RequestKind::ExternalDown => &mut self.inputs.external_down_requests,
        }
    }

    /// Holds request lines for `ticks` ticks, then releases them.
    pub fn pulse(&mut self, kind: RequestKind, floors: FloorMask, ticks: usize) -> Vec<Outputs> {
        *self.lines(kind) = floors;
        let outputs = self.run(ticks);
        *self.lines(kind) = FloorMask::EMPTY;
        outputs
    }

    /// Ticks until the controller has been idle for its settle margin.
    pub fn run_until_settled(&mut self, limit: usize) -> Vec<Outputs> {
        let margin = self.controller.config().settle_margin;
        let mut outputs = Vec::new();
        for _ in 0..limit {
            outputs.push(self.tick());
            if self.controller.is_settled(margin) {
                return outputs;
            }
        }
        panic!("controller did not settle within {} ticks", limit);
    }

    /// Ticks until `done` holds for the controller.
    pub fn run_until(&mut self, limit: usize, done: impl Fn(&Controller) -> bool) -> Vec<Outputs> {
        let mut outputs = Vec::new();
        for _ in 0..limit {
            outputs.push(self.tick());
            if done(&self.controller) {
                return outputs;
            }
        }
        panic!("condition not reached within {} ticks", limit);
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Floors where the door opened, in order, from the recorded trace.
    pub fn door_openings(&self) -> Vec<u8> {
        let mut floors = Vec::new();
        let mut previous = None;
        for tick in &self.trace {
            if tick.state == ControllerState::DoorOpen && previous != Some(ControllerState::DoorOpen) {
                floors.push(tick.outputs.current_floor);
            }
            previous = Some(tick.state);
        }
        floors
    }
}

/// Moves the car one floor every `travel_ticks` ticks in the commanded
/// direction.
pub struct Shaft {
    pub floor: u8,
    num_floors: u8,
    travel_ticks: u32,
    progress: u32,
}

impl Shaft {
    pub fn new(floor: u8, num_floors: u8, travel_ticks: u32) -> Self {
        Shaft {
            floor,
            num_floors,
            travel_ticks: travel_ticks.max(1),
            progress: 0,
        }
    }

    pub fn follow(&mut self, outputs: &Outputs) -> FloorMask {
        let step_up = outputs.motor_up && self.floor + 1 < self.num_floors;
        let step_down = outputs.motor_down && self.floor > 0;
        if step_up || step_down {
            self.progress += 1;
            if self.progress >= self.travel_ticks {
                self.progress = 0;
                if step_up {
                    self.floor += 1;
                } else {
                    self.floor -= 1;
                }
            }
        } else {
            self.progress = 0;
        }
        FloorMask::single(self.floor)
    }
}
