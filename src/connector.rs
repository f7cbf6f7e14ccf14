use std::{io, net::SocketAddr};

use thiserror::Error;
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tracing::{debug, info};

/// Reasons the connection to the server could not be opened.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The address could not be resolved.
    #[error("Failed to resolve {address}")]
    Resolve {
        /// Address as given by the user.
        address: String,
        /// Lookup failure.
        source: io::Error,
    },

    /// Resolution succeeded without yielding a single socket address.
    #[error("{address} did not resolve to any socket address")]
    NoAddress {
        /// Address as given by the user.
        address: String,
    },

    /// No stream socket could be created.
    #[error("Failed to create a socket for {addr}")]
    Socket {
        /// Resolved address the socket was meant for.
        addr: SocketAddr,
        /// Socket creation failure.
        source: io::Error,
    },

    /// The remote refused the connection or could not be reached.
    #[error("Failed to connect to server at {addr}")]
    Connect {
        /// Resolved address the connection was attempted on.
        addr: SocketAddr,
        /// Connection failure.
        source: io::Error,
    },
}

/// Resolve `address` (`host:port`) and connect to the first socket address accepting the connection.
///
/// There is no retry. If every resolved address fails, the last failure is returned.
pub async fn connect(address: &str) -> Result<TcpStream, ConnectionError> {
    let addrs = lookup_host(address)
        .await
        .map_err(|source| ConnectionError::Resolve {
            address: address.to_string(),
            source,
        })?;

    let mut failure = None;
    for addr in addrs {
        match connect_to(addr).await {
            Ok(stream) => {
                info!(%addr, "Connected");
                return Ok(stream);
            }
            Err(e) => {
                debug!(%addr, error = %e, "Connection attempt failed");
                failure = Some(e);
            }
        }
    }
    Err(failure.unwrap_or_else(|| ConnectionError::NoAddress {
        address: address.to_string(),
    }))
}

async fn connect_to(addr: SocketAddr) -> Result<TcpStream, ConnectionError> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(|source| ConnectionError::Socket { addr, source })?;

    socket
        .connect(addr)
        .await
        .map_err(|source| ConnectionError::Connect { addr, source })
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_listening_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let stream = connect(&addr.to_string()).await.unwrap();
        let (_socket, peer) = listener.accept().await.unwrap();

        assert_eq!(stream.peer_addr().unwrap(), addr);
        assert_eq!(stream.local_addr().unwrap(), peer);
    }

    #[tokio::test]
    async fn reports_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = connect(&addr.to_string()).await.unwrap_err();
        assert!(
            matches!(error, ConnectionError::Connect { addr: a, .. } if a == addr),
            "{error:?}"
        );
        assert_eq!(
            error.to_string(),
            format!("Failed to connect to server at {addr}")
        );
    }

    #[tokio::test]
    async fn reports_unresolvable_address() {
        let error = connect("no port here").await.unwrap_err();
        assert!(matches!(error, ConnectionError::Resolve { .. }), "{error:?}");
    }
}
