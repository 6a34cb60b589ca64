//! Source RCON client over TCP
//!
//! One request is in flight at a time. A command response is read as a
//! single `SERVERDATA_RESPONSE_VALUE` packet; responses split over several
//! packets are not reassembled.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::TcpRconConfig;
use crate::client::RconClient;
use crate::error::{CoreError, Result};
use crate::protocol::codec::{
    Packet, PacketCodec, AUTH_FAILED_ID, SERVERDATA_AUTH_RESPONSE, SERVERDATA_RESPONSE_VALUE,
};

/// RCON client speaking the Source packet format over TCP
pub struct TcpRcon {
    config: TcpRconConfig,
    codec: PacketCodec,
    stream: Option<TcpStream>,
    last_id: i32,
}

impl TcpRcon {
    pub fn new(config: TcpRconConfig) -> Self {
        let codec = PacketCodec::new(config.max_packet_size);
        Self {
            config,
            codec,
            stream: None,
            last_id: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Request ids are positive so they never collide with the auth-failure id
    fn next_id(&mut self) -> i32 {
        self.last_id = if self.last_id >= i32::MAX - 1 { 1 } else { self.last_id + 1 };
        self.last_id
    }

    async fn authenticate(&mut self, stream: &mut TcpStream, secret: &[u8]) -> Result<()> {
        let id = self.next_id();
        write_packet(stream, &self.codec, &Packet::auth(id, secret)).await?;

        // Some servers send an empty RESPONSE_VALUE ahead of the auth response.
        loop {
            let packet = read_packet(stream, &self.codec).await?;
            if packet.kind != SERVERDATA_AUTH_RESPONSE {
                tracing::debug!("Skipping packet type {} during auth", packet.kind);
                continue;
            }
            if packet.id == AUTH_FAILED_ID {
                return Err(CoreError::Auth("authentication rejected by server".into()));
            }
            if packet.id != id {
                return Err(CoreError::Protocol(format!(
                    "auth response id {} does not match request {}",
                    packet.id, id
                )));
            }
            return Ok(());
        }
    }

    async fn round_trip(&mut self, command: &str) -> Result<String> {
        let id = self.next_id();
        let codec = self.codec;
        let stream = self.stream.as_mut().ok_or(CoreError::NotConnected)?;
        write_packet(stream, &codec, &Packet::command(id, command)).await?;

        loop {
            let packet = read_packet(stream, &codec).await?;
            if packet.kind == SERVERDATA_RESPONSE_VALUE && packet.id == id {
                return Ok(packet.body_text());
            }
            tracing::debug!(
                "Ignoring packet id {} type {} while waiting for {}",
                packet.id,
                packet.kind,
                id
            );
        }
    }
}

impl Default for TcpRcon {
    fn default() -> Self {
        Self::new(TcpRconConfig::default())
    }
}

async fn write_packet(stream: &mut TcpStream, codec: &PacketCodec, packet: &Packet) -> Result<()> {
    let encoded = codec.encode(packet)?;
    stream.write_all(&encoded).await?;
    stream.flush().await?;
    Ok(())
}

async fn read_packet(stream: &mut TcpStream, codec: &PacketCodec) -> Result<Packet> {
    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix).await?;
    let len = codec.frame_len(prefix)?;

    let mut frame = vec![0u8; len];
    stream.read_exact(&mut frame).await?;
    codec.decode_frame(&frame)
}

/// Failures before the session exists are network failures, except auth
fn as_connect_error(err: CoreError, address: &str) -> CoreError {
    match err {
        CoreError::Io(e) => CoreError::Network(format!("{}: {}", address, e)),
        other => other,
    }
}

#[async_trait]
impl RconClient for TcpRcon {
    async fn connect(&mut self, host: &str, port: u16, secret: &[u8]) -> Result<()> {
        self.disconnect().await;

        let address = format!("{}:{}", host, port);
        let limit = self.config.connect_timeout;
        tracing::info!("Connecting to RCON server {}", address);

        let attempt = async {
            let mut stream = TcpStream::connect(address.as_str())
                .await
                .map_err(|e| CoreError::Network(format!("{}: {}", address, e)))?;
            stream.set_nodelay(true)?;
            self.authenticate(&mut stream, secret).await?;
            Ok::<_, CoreError>(stream)
        };

        let stream = match timeout(limit, attempt).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(as_connect_error(err, &address)),
            Err(_) => return Err(CoreError::Timeout(limit.as_millis() as u64)),
        };

        tracing::info!("Authenticated with {}", address);
        self.stream = Some(stream);
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        tracing::debug!("Sending command ({} bytes)", command.len());
        match self.config.command_timeout {
            Some(limit) => match timeout(limit, self.round_trip(command)).await {
                Ok(result) => result,
                Err(_) => Err(CoreError::Timeout(limit.as_millis() as u64)),
            },
            None => self.round_trip(command).await,
        }
    }

    async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::info!("Closing RCON connection");
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Shutdown error ignored: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    const PASSWORD: &[u8] = b"s3cret";

    /// Minimal RCON server: one connection, echoes commands until EOF
    async fn spawn_server() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let codec = PacketCodec::default();
            let (mut socket, _) = listener.accept().await.unwrap();

            let auth = read_packet(&mut socket, &codec).await.unwrap();
            let reply_id = if auth.body == PASSWORD { auth.id } else { AUTH_FAILED_ID };
            let empty = Packet::new(auth.id, SERVERDATA_RESPONSE_VALUE, "");
            write_packet(&mut socket, &codec, &empty).await.unwrap();
            let verdict = Packet::new(reply_id, SERVERDATA_AUTH_RESPONSE, "");
            write_packet(&mut socket, &codec, &verdict).await.unwrap();

            while let Ok(packet) = read_packet(&mut socket, &codec).await {
                if packet.body_text() == "stop" {
                    break;
                }
                let reply = Packet::new(
                    packet.id,
                    SERVERDATA_RESPONSE_VALUE,
                    format!("echo: {}", packet.body_text()),
                );
                write_packet(&mut socket, &codec, &reply).await.unwrap();
            }
        });
        port
    }

    #[tokio::test]
    async fn test_connect_and_command() {
        let port = spawn_server().await;
        let mut client = TcpRcon::default();
        client.connect("127.0.0.1", port, PASSWORD).await.unwrap();
        assert!(client.is_connected());

        let response = client.send_command("list").await.unwrap();
        assert_eq!(response, "echo: list");
        let response = client.send_command("say hi").await.unwrap();
        assert_eq!(response, "echo: say hi");

        client.disconnect().await;
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let port = spawn_server().await;
        let mut client = TcpRcon::default();
        let result = client.connect("127.0.0.1", port, b"wrong").await;
        assert!(matches!(result, Err(CoreError::Auth(_))));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut client = TcpRcon::default();
        let result = client.connect("127.0.0.1", port, PASSWORD).await;
        assert!(matches!(result, Err(CoreError::Network(_))));
    }

    #[tokio::test]
    async fn test_server_closing_is_io_failure() {
        let port = spawn_server().await;
        let config = TcpRconConfig::default().with_command_timeout(Duration::from_secs(5));
        let mut client = TcpRcon::new(config);
        client.connect("127.0.0.1", port, PASSWORD).await.unwrap();

        let result = client.send_command("stop").await;
        let err = result.unwrap_err();
        assert!(err.is_io_failure(), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_send_without_connection() {
        let mut client = TcpRcon::default();
        let result = client.send_command("list").await;
        assert!(matches!(result, Err(CoreError::NotConnected)));
    }

    #[tokio::test]
    async fn test_disconnect_idempotent() {
        let mut client = TcpRcon::default();
        client.disconnect().await;
        client.disconnect().await;
        assert!(!client.is_connected());
    }

    #[test]
    fn test_ids_stay_positive() {
        let mut client = TcpRcon::default();
        client.last_id = i32::MAX - 1;
        assert_eq!(client.next_id(), 1);
        assert_eq!(client.next_id(), 2);
    }
}
