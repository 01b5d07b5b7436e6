//! Raw TCP delivery to a network thermal printer

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument};

use crate::error::{PrintError, PrintResult};

/// Connect timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Network printer (raw TCP, usually port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// `host` must be an IP literal; printers on a shop LAN are addressed
    /// by IP in settings.
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        if port == 0 {
            return Err(PrintError::BadAddress("port 0".into()));
        }
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|_| PrintError::BadAddress(format!("{host:?} is not an IP address")))?;

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sends one job: connect, write everything, flush, close.
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    pub async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let addr = self.addr;
        let mut stream = match tokio::time::timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(PrintError::Unreachable { addr, source }),
            Err(_) => {
                return Err(PrintError::TimedOut {
                    addr,
                    after: self.timeout,
                })
            }
        };

        stream.write_all(data).await?;
        stream.flush().await?;
        stream.shutdown().await?;

        info!("Print job sent");
        Ok(())
    }
}
