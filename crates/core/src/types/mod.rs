//! Domain types for the RCON session

mod event;
mod output;
mod params;
mod state;

pub use event::SessionEvent;
pub use output::{LogLine, SessionOutput};
pub use params::{ConnectForm, ConnectionParams, Field, Secret};
pub use state::{ConnectionState, ControlState};
