//! Source RCON packet codec
//!
//! Wire format (all integers little endian):
//! `[i32 length][i32 id][i32 type][body][0x00][0x00]`
//! where `length` counts everything after itself.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CoreError, Result};

/// id + type + two terminators
const HEADER_SIZE: usize = 10;

/// Largest body a server sends in one packet
pub const MAX_BODY_SIZE: usize = 4096;

/// Default limit on the `length` field
pub const MAX_PACKET_SIZE: usize = MAX_BODY_SIZE + HEADER_SIZE;

/// Packet type codes
///
/// `SERVERDATA_AUTH_RESPONSE` and `SERVERDATA_EXECCOMMAND` share the value 2;
/// direction tells them apart.
pub const SERVERDATA_AUTH: i32 = 3;
pub const SERVERDATA_AUTH_RESPONSE: i32 = 2;
pub const SERVERDATA_EXECCOMMAND: i32 = 2;
pub const SERVERDATA_RESPONSE_VALUE: i32 = 0;

/// Request id the server returns on a rejected password
pub const AUTH_FAILED_ID: i32 = -1;

/// One RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: i32,
    pub body: Vec<u8>,
}

impl Packet {
    pub fn new(id: i32, kind: i32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Authentication request carrying the secret
    pub fn auth(id: i32, secret: &[u8]) -> Self {
        Self::new(id, SERVERDATA_AUTH, secret)
    }

    /// Command execution request
    pub fn command(id: i32, command: &str) -> Self {
        Self::new(id, SERVERDATA_EXECCOMMAND, command.as_bytes())
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Packet codec for serialization/deserialization
#[derive(Debug, Clone, Copy)]
pub struct PacketCodec {
    max_packet_size: usize,
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::new(MAX_PACKET_SIZE)
    }
}

impl PacketCodec {
    pub fn new(max_packet_size: usize) -> Self {
        Self { max_packet_size }
    }

    /// Encode packet with its length prefix
    pub fn encode(&self, packet: &Packet) -> Result<Vec<u8>> {
        let len = packet.body.len() + HEADER_SIZE;
        if len > self.max_packet_size {
            return Err(CoreError::PacketTooLarge {
                size: len,
                max: self.max_packet_size,
            });
        }

        let mut buf = BytesMut::with_capacity(4 + len);
        buf.put_i32_le(len as i32);
        buf.put_i32_le(packet.id);
        buf.put_i32_le(packet.kind);
        buf.put_slice(&packet.body);
        buf.put_u8(0);
        buf.put_u8(0);
        Ok(buf.to_vec())
    }

    /// Read the length prefix, checking it against the limits
    ///
    /// Returns the number of bytes that follow the prefix.
    pub fn frame_len(&self, prefix: [u8; 4]) -> Result<usize> {
        let len = i32::from_le_bytes(prefix);
        if len < HEADER_SIZE as i32 {
            return Err(CoreError::InvalidPacket(format!(
                "length {} below minimum {}",
                len, HEADER_SIZE
            )));
        }
        let len = len as usize;
        if len > self.max_packet_size {
            return Err(CoreError::PacketTooLarge {
                size: len,
                max: self.max_packet_size,
            });
        }
        Ok(len)
    }

    /// Decode the bytes following a length prefix
    pub fn decode_frame(&self, frame: &[u8]) -> Result<Packet> {
        if frame.len() < HEADER_SIZE {
            return Err(CoreError::InvalidPacket("Frame too small for header".into()));
        }
        let mut buf = frame;
        let id = buf.get_i32_le();
        let kind = buf.get_i32_le();
        let body_len = buf.len() - 2;
        let body = buf[..body_len].to_vec();
        if &buf[body_len..] != b"\0\0" {
            return Err(CoreError::InvalidPacket("Missing null terminators".into()));
        }
        Ok(Packet { id, kind, body })
    }
}
