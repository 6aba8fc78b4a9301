//! Connection lifecycle: connect, registration handshake, read loop,
//! keepalive, teardown.
//!
//! One [`Client`] owns one connection — its stream, its state, and its
//! subscriber registry. Multiple connections are multiple `Client`s. The
//! read loop runs inside [`Client::handshake`] and ends when the peer closes
//! the stream, an I/O error occurs, or a [`ShutdownHandle`] is signalled; all
//! three are reported through the `Disconnected` event, never as an error
//! from `handshake` itself.

use crate::commands;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::events::{ClientEvent, EventKey, EventRegistry};
use crate::message::Message;
use crate::reply::{classify, Classification};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Any duplex byte stream the client can run over. Blanket-implemented; the
/// default transport is [`TcpStream`], tests use `tokio::io::duplex`.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

type BoxedTransport = Box<dyn Transport>;

/// Connection lifecycle state. Owned by the [`Client`]; observable through
/// [`Client::state`], mutated only by lifecycle calls and read-loop exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Stream open, handshake not yet sent.
    Connected,
    /// USER/NICK sent, read loop running.
    Registered,
    /// Teardown in progress.
    Closing,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Registered => "registered",
            Self::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Serialized outbound sink. The read loop (auto-pong), the keepalive task,
/// and application [`Sender`]s all write through the same mutex, so two
/// lines are never interleaved mid-line.
#[derive(Clone)]
struct Outbound {
    writer: Arc<Mutex<WriteHalf<BoxedTransport>>>,
}

impl Outbound {
    async fn send_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        trace!(raw = line, "send");
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\r\n").await?;
        writer.flush().await
    }

    async fn shutdown(&self) -> std::io::Result<()> {
        self.writer.lock().await.shutdown().await
    }
}

/// Clonable handle for sending commands on an open connection. Obtained from
/// [`Client::sender`] before the handshake; subscribers move a clone into
/// spawned tasks to talk back to the server while the read loop runs.
#[derive(Clone)]
pub struct Sender {
    outbound: Outbound,
}

impl Sender {
    /// Send one already-formatted line.
    pub async fn send_raw(&self, line: &str) -> Result<()> {
        self.outbound.send_line(line).await?;
        Ok(())
    }

    /// `PRIVMSG` to one or more receivers. No-op with zero receivers.
    pub async fn send_privmsg(&self, receivers: &[&str], message: &str) -> Result<()> {
        if receivers.is_empty() {
            return Ok(());
        }
        self.send_raw(&commands::privmsg(receivers, message)).await
    }

    /// `JOIN` the given `(channel, key)` pairs.
    pub async fn send_join(&self, channels: &[(&str, &str)]) -> Result<()> {
        self.send_raw(&commands::join(channels)).await
    }

    /// `JOIN 0` — leave all channels.
    pub async fn send_join_zero(&self) -> Result<()> {
        self.send_raw(&commands::join_zero()).await
    }

    pub async fn send_nick(&self, nickname: &str) -> Result<()> {
        self.send_raw(&commands::nick(nickname)).await
    }

    pub async fn send_ping(&self, param: &str) -> Result<()> {
        self.send_raw(&commands::ping(param)).await
    }

    pub async fn send_quit(&self, message: &str) -> Result<()> {
        self.send_raw(&commands::quit(message)).await
    }
}

/// Requests cooperative exit of a running read loop. Signalling also stops
/// the keepalive task.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }
}

/// Periodic liveness ping, spawned on connect. Fire-and-forget: a missed
/// reply is not tracked and does not close the connection.
struct Keepalive {
    handle: JoinHandle<()>,
}

impl Keepalive {
    fn spawn(
        outbound: Outbound,
        server: String,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            // First ping after one full interval, not immediately.
            let start = tokio::time::Instant::now() + period;
            let mut timer = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if let Err(e) = outbound.send_line(&commands::ping(&server)).await {
                            warn!("keepalive ping failed: {e}");
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
        });
        Self { handle }
    }

    /// Await the task after the shutdown signal; no send can happen once this
    /// returns.
    async fn stop(self) {
        let _ = self.handle.await;
    }
}

struct Link {
    reader: BufReader<ReadHalf<BoxedTransport>>,
    outbound: Outbound,
    keepalive: Option<Keepalive>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

/// An IRC client connection: configuration, lifecycle state, and the
/// per-event subscriber registry.
pub struct Client {
    config: ClientConfig,
    state: ConnectionState,
    registry: EventRegistry,
    link: Option<Link>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            registry: EventRegistry::new(),
            link: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register a subscriber callback for an event key. Callbacks run
    /// synchronously from the read loop, in registration order.
    pub fn on<F>(&mut self, key: EventKey, handler: F)
    where
        F: FnMut(&ClientEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.registry.subscribe(key, handler);
    }

    /// Open the stream to `config.server:config.port` and start the
    /// keepalive. On failure the state stays `Disconnected`.
    pub async fn connect(&mut self) -> Result<()> {
        self.require(ConnectionState::Disconnected)?;
        let host = self.config.server.clone();
        let port = self.config.port;
        let stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|source| Error::Connection { host, port, source })?;
        self.attach(Box::new(stream));
        Ok(())
    }

    /// Like [`connect`](Self::connect), over a caller-supplied duplex stream
    /// instead of a fresh TCP connection.
    pub async fn connect_with<S>(&mut self, stream: S) -> Result<()>
    where
        S: Transport + 'static,
    {
        self.require(ConnectionState::Disconnected)?;
        self.attach(Box::new(stream));
        Ok(())
    }

    /// Send `USER` and `NICK`, then run the read loop until the connection
    /// ends. Always returns `Ok(())` on loop exit — peer close, I/O failure
    /// and requested shutdown are all reported via the `Disconnected` event.
    pub async fn handshake(&mut self) -> Result<()> {
        self.require(ConnectionState::Connected)?;
        let outbound = match &self.link {
            Some(link) => link.outbound.clone(),
            None => return Err(Error::NotConnected),
        };
        outbound
            .send_line(&commands::user(
                &self.config.username,
                self.config.invisible,
                &self.config.realname,
            ))
            .await?;
        outbound
            .send_line(&commands::nick(&self.config.username))
            .await?;
        self.state = ConnectionState::Registered;
        debug!(server = %self.config.server, nick = %self.config.username, "registered");

        let reason = self.read_loop().await;
        debug!(%reason, "read loop ended");
        self.teardown().await;
        self.registry
            .dispatch(&EventKey::Disconnected, &ClientEvent::Disconnected { reason });
        Ok(())
    }

    /// Stop the keepalive, close the stream, return to `Disconnected`.
    /// Calling it while already disconnected is a no-op.
    pub async fn disconnect(&mut self) -> Result<()> {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::Closing => Ok(()),
            ConnectionState::Connected | ConnectionState::Registered => {
                self.teardown().await;
                debug!("disconnected");
                Ok(())
            }
        }
    }

    /// Handle for sending commands while the read loop runs.
    pub fn sender(&self) -> Result<Sender> {
        match &self.link {
            Some(link) => Ok(Sender {
                outbound: link.outbound.clone(),
            }),
            None => Err(Error::NotConnected),
        }
    }

    /// Handle that makes a running read loop exit cooperatively.
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        match &self.link {
            Some(link) => Ok(ShutdownHandle {
                tx: link.shutdown_tx.clone(),
            }),
            None => Err(Error::NotConnected),
        }
    }

    // Config setters, locked while a connection is open.

    pub fn set_server(&mut self, server: impl Into<String>) -> Result<()> {
        self.unlocked("server")?;
        self.config.server = server.into();
        Ok(())
    }

    pub fn set_port(&mut self, port: u16) -> Result<()> {
        self.unlocked("port")?;
        self.config.port = port;
        Ok(())
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<()> {
        self.unlocked("username")?;
        self.config.username = username.into();
        Ok(())
    }

    pub fn set_realname(&mut self, realname: impl Into<String>) -> Result<()> {
        self.unlocked("realname")?;
        self.config.realname = realname.into();
        Ok(())
    }

    pub fn set_auto_pong(&mut self, auto_pong: bool) -> Result<()> {
        self.unlocked("auto_pong")?;
        self.config.auto_pong = auto_pong;
        Ok(())
    }

    pub fn set_invisible(&mut self, invisible: bool) -> Result<()> {
        self.unlocked("invisible")?;
        self.config.invisible = invisible;
        Ok(())
    }

    fn unlocked(&self, field: &'static str) -> Result<()> {
        if self.state == ConnectionState::Disconnected {
            Ok(())
        } else {
            Err(Error::ConfigurationLocked(field))
        }
    }

    fn require(&self, expected: ConnectionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn attach(&mut self, stream: BoxedTransport) {
        let (read_half, write_half) = tokio::io::split(stream);
        let outbound = Outbound {
            writer: Arc::new(Mutex::new(write_half)),
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let keepalive = Keepalive::spawn(
            outbound.clone(),
            self.config.server.clone(),
            Duration::from_secs(self.config.keepalive_secs),
            shutdown_rx.clone(),
        );
        self.link = Some(Link {
            reader: BufReader::new(read_half),
            outbound,
            keepalive: Some(keepalive),
            shutdown_tx,
            shutdown_rx,
        });
        self.state = ConnectionState::Connected;
        debug!(server = %self.config.server, port = self.config.port, "connected");
    }

    /// One iteration per inbound line. Returns the human-readable reason the
    /// loop ended.
    async fn read_loop(&mut self) -> String {
        let Some(link) = self.link.as_mut() else {
            return "not connected".to_string();
        };
        let outbound = link.outbound.clone();
        let mut shutdown = link.shutdown_rx.clone();
        let reader = &mut link.reader;
        let registry = &mut self.registry;

        let mut line = String::new();
        loop {
            line.clear();
            let read = tokio::select! {
                res = reader.read_line(&mut line) => res,
                _ = shutdown.changed() => return "shutdown requested".to_string(),
            };
            match read {
                Ok(0) => return "connection closed by peer".to_string(),
                Ok(_) => {}
                Err(e) => return format!("read error: {e}"),
            }
            let text = line.trim_end_matches(['\r', '\n']);
            trace!(raw = text, "recv");

            let msg = Message::parse(text);

            // Protocol-mandated reply, sent before any subscriber can see
            // (or delay) the PING.
            if msg.command == "PING" && self.config.auto_pong {
                let param = msg.params.first().map(String::as_str).unwrap_or("");
                if let Err(e) = outbound.send_line(&commands::pong(param)).await {
                    return format!("write error: {e}");
                }
            }

            match classify(&msg.command) {
                Classification::Reply(code) => {
                    let key = EventKey::Reply(code);
                    let event = ClientEvent::Message {
                        message: msg,
                        reply: Some(code),
                    };
                    registry.dispatch(&key, &event);
                }
                Classification::Verb => {
                    let key = EventKey::Verb(msg.command.clone());
                    let event = ClientEvent::Message {
                        message: msg,
                        reply: None,
                    };
                    registry.dispatch(&key, &event);
                }
                Classification::Numeric(code) => {
                    trace!(code, "numeric reply with no table entry, dropped");
                }
            }
        }
    }

    async fn teardown(&mut self) {
        self.state = ConnectionState::Closing;
        if let Some(mut link) = self.link.take() {
            let _ = link.shutdown_tx.send(true);
            if let Some(keepalive) = link.keepalive.take() {
                keepalive.stop().await;
            }
            if let Err(e) = link.outbound.shutdown().await {
                debug!("stream shutdown: {e}");
            }
        }
        self.state = ConnectionState::Disconnected;
    }
}
