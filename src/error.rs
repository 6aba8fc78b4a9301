//! Library error taxonomy.
//!
//! Stream termination during the read loop is deliberately absent: the peer
//! closing the connection is a normal event (see
//! [`EventKey::Disconnected`](crate::events::EventKey)), not an error
//! returned to the caller.

use crate::client::ConnectionState;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection parameters are frozen while a connection is open.
    #[error("cannot change {0} while connected")]
    ConfigurationLocked(&'static str),

    /// A lifecycle operation was invoked in the wrong state.
    #[error("operation requires state {expected}, but state is {actual}")]
    InvalidState {
        expected: ConnectionState,
        actual: ConnectionState,
    },

    /// The transport stream could not be established.
    #[error("failed to connect to {host}:{port}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// A send was attempted with no open stream.
    #[error("not connected")]
    NotConnected,

    /// Transport failure on the write path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
