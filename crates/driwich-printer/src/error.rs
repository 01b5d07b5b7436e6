//! Printer transport failures.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    /// Host or port from settings cannot name a printer.
    #[error("bad printer address: {0}")]
    BadAddress(String),

    #[error("printer at {addr} is unreachable: {source}")]
    Unreachable {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("printer at {addr} did not answer within {after:?}")]
    TimedOut { addr: SocketAddr, after: Duration },

    /// The connection dropped while the job was being written.
    #[error("printer connection broke: {0}")]
    Io(#[from] std::io::Error),
}

pub type PrintResult<T> = Result<T, PrintError>;
