mod messages;
mod worker;

pub use messages::{EngineCommand, EngineEvent, SessionParams};
pub use worker::{EngineHandle, spawn};
