//! Embassy async tasks

pub mod radio;
pub mod rts;

pub use radio::{radio_task, RadioDriver};
pub use rts::rts_task;
