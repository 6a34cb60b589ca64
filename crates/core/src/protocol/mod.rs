//! RCON wire format

pub mod codec;

pub use codec::{Packet, PacketCodec};
