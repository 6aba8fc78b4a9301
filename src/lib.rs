//! Async IRC client protocol engine.
//!
//! Implements the client side of the IRC wire protocol: line
//! parsing/encoding, numeric reply classification, the connection lifecycle
//! (registration handshake, read loop with auto-pong, keepalive), and
//! synchronous per-event subscriber dispatch. The transport is any duplex
//! byte stream; TLS, SASL/CAP negotiation, and channel state tracking are
//! outside this crate.
//!
//! ```no_run
//! use ircore::{Client, ClientConfig, ClientEvent, EventKey};
//!
//! # async fn run() -> ircore::Result<()> {
//! let mut client = Client::new(ClientConfig::new("irc.libera.chat", 6667, "crabby"));
//! client.on(EventKey::Verb("PRIVMSG".into()), |event| {
//!     if let ClientEvent::Message { message, .. } = event {
//!         println!("{:?}", message.params);
//!     }
//!     Ok(())
//! });
//! client.connect().await?;
//! client.handshake().await?; // runs until the connection ends
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod reply;

pub use client::{Client, ConnectionState, Sender, ShutdownHandle, Transport};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use events::{ClientEvent, EventKey, EventRegistry};
pub use message::Message;
pub use reply::{classify, Classification, ReplyCode};
