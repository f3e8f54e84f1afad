pub mod config {
    pub mod config;
    pub mod fetch_arguments;
}

pub mod elevator {
    pub mod dispatch;
    pub mod doors;
    pub mod elevator_fsm;
    pub mod motion;
    pub mod orders;
    pub mod position;
    pub mod state;
}

pub mod driver {
    pub mod clock;
    pub mod commands;
}
