//! Socket transport helpers for the benchmark.
//!
//! Connections are opened fresh for every exchange and wrapped in a
//! [`Connection`] so the exchange logic does not care about the platform's
//! socket type.

use std::io::{self, Read, Write};
use std::time::Duration;

use camino::Utf8Path;

#[cfg(unix)]
use std::os::fd::OwnedFd;
#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(unix)]
use socket2::{Domain, SockAddr, Socket, Type};

use crate::exchange::ExchangeError;

pub(crate) enum Connection {
    #[cfg(unix)]
    Unix(UnixStream),
    #[cfg(not(unix))]
    Unsupported(std::convert::Infallible),
}

impl Connection {
    pub(crate) fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Self::Unix(stream) => stream.set_read_timeout(Some(timeout)),
            #[cfg(not(unix))]
            Self::Unsupported(never) => match *never {},
        }
    }

    pub(crate) fn set_write_timeout(&self, timeout: Duration) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Self::Unix(stream) => stream.set_write_timeout(Some(timeout)),
            #[cfg(not(unix))]
            Self::Unsupported(never) => match *never {},
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
            #[cfg(not(unix))]
            Self::Unsupported(never) => match *never {},
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
            #[cfg(not(unix))]
            Self::Unsupported(never) => match *never {},
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
            #[cfg(not(unix))]
            Self::Unsupported(never) => match *never {},
        }
    }
}

/// Connects to the Unix socket at `endpoint`, giving up after `timeout`.
pub(crate) fn connect(endpoint: &Utf8Path, timeout: Duration) -> Result<Connection, ExchangeError> {
    #[cfg(unix)]
    {
        connect_unix(endpoint, timeout).map_err(|source| ExchangeError::Connect {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    #[cfg(not(unix))]
    {
        let _ = timeout;
        Err(ExchangeError::UnsupportedUnixTransport(endpoint.to_string()))
    }
}

#[cfg(unix)]
fn connect_unix(path: &Utf8Path, timeout: Duration) -> io::Result<Connection> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(path.as_std_path())?;
    socket.connect_timeout(&address, timeout)?;
    let stream = UnixStream::from(OwnedFd::from(socket));
    Ok(Connection::Unix(stream))
}
