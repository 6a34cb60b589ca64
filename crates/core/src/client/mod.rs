//! RCON collaborator abstraction

mod traits;

pub use traits::{MockCall, MockFailure, MockRcon, RconClient};
