//! One request, one response, one connection.
//!
//! An exchange opens a fresh connection, writes a single framed request, and
//! reads until the first line terminator, the peer closing, or the deadline,
//! whichever comes first. Timeouts, short reads and undecodable payloads all
//! resolve to an empty [`Response`]; only connection and genuine I/O failures
//! surface as [`ExchangeError`].

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::debug;
use winbench_types::{Request, Response};

use crate::interrupt::InterruptFlag;
use crate::transport::{Connection, connect};

pub(crate) const EXCHANGE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::exchange");

const READ_CHUNK: usize = 64 * 1024;
const LINE_TERMINATOR: u8 = b'\n';

#[derive(Debug, Error)]
pub(crate) enum ExchangeError {
    #[error("failed to connect to window server at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    #[error("failed to apply socket deadline: {0}")]
    Configure(io::Error),
    #[error("failed to serialise request: {0}")]
    Serialise(serde_json::Error),
    #[error("failed to send request to window server: {0}")]
    Send(io::Error),
    #[error("failed to read response from window server: {0}")]
    Receive(io::Error),
}

/// Performs request/response round trips for the driver.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Exchange {
    fn exchange(&mut self, request: &Request) -> Result<Response, ExchangeError>;
}

/// Exchanges requests with a window server over its Unix socket.
#[derive(Debug, Clone)]
pub(crate) struct SocketExchange {
    endpoint: Utf8PathBuf,
    timeout: Duration,
    interrupt: InterruptFlag,
}

impl SocketExchange {
    pub(crate) fn new(
        endpoint: impl Into<Utf8PathBuf>,
        timeout: Duration,
        interrupt: InterruptFlag,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            interrupt,
        }
    }
}

impl Exchange for SocketExchange {
    fn exchange(&mut self, request: &Request) -> Result<Response, ExchangeError> {
        exchange(&self.endpoint, request, self.timeout, &self.interrupt)
    }
}

/// Sends `request` to `endpoint` and returns the decoded reply.
///
/// `timeout` bounds the whole call: connecting, writing and reading share a
/// single deadline. A signal that raises `interrupt` while the read is
/// blocked ends the exchange early; other signals are ignored. The
/// connection is closed before the payload is decoded.
pub(crate) fn exchange(
    endpoint: &Utf8Path,
    request: &Request,
    timeout: Duration,
    interrupt: &InterruptFlag,
) -> Result<Response, ExchangeError> {
    let deadline = Deadline::after(timeout);
    let line = request.encode_line().map_err(ExchangeError::Serialise)?;
    let Some(budget) = deadline.remaining() else {
        debug!(target: EXCHANGE_TARGET, "deadline elapsed before connecting");
        return Ok(Response::empty());
    };
    let mut connection = connect(endpoint, budget)?;
    let payload = round_trip(&mut connection, &line, &deadline, interrupt)?;
    drop(connection);
    Ok(decode_payload(request, &payload))
}

fn round_trip(
    connection: &mut Connection,
    line: &[u8],
    deadline: &Deadline,
    interrupt: &InterruptFlag,
) -> Result<Vec<u8>, ExchangeError> {
    if send(connection, line, deadline)? == Progress::Expired {
        debug!(target: EXCHANGE_TARGET, "write deadline elapsed before the request was sent");
        return Ok(Vec::new());
    }
    receive(connection, deadline, interrupt)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Done,
    Expired,
}

fn send(
    connection: &mut Connection,
    line: &[u8],
    deadline: &Deadline,
) -> Result<Progress, ExchangeError> {
    let Some(remaining) = deadline.remaining() else {
        return Ok(Progress::Expired);
    };
    connection
        .set_write_timeout(remaining)
        .map_err(ExchangeError::Configure)?;
    match connection.write_all(line).and_then(|()| connection.flush()) {
        Ok(()) => Ok(Progress::Done),
        Err(error) if is_timeout(&error) => Ok(Progress::Expired),
        Err(error) => Err(ExchangeError::Send(error)),
    }
}

/// Reads until the first line terminator and returns the bytes before it.
///
/// Peer close, the deadline and a raised interrupt flag all end the read
/// early; whatever had accumulated by then is returned.
fn receive(
    connection: &mut Connection,
    deadline: &Deadline,
    interrupt: &InterruptFlag,
) -> Result<Vec<u8>, ExchangeError> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = vec![0_u8; READ_CHUNK];
    loop {
        if interrupt.is_raised() {
            debug!(target: EXCHANGE_TARGET, received = buffer.len(), "read interrupted");
            break;
        }
        let Some(remaining) = deadline.remaining() else {
            debug!(target: EXCHANGE_TARGET, received = buffer.len(), "read deadline elapsed");
            break;
        };
        connection
            .set_read_timeout(remaining)
            .map_err(ExchangeError::Configure)?;
        let read = match connection.read(&mut chunk) {
            Ok(0) => {
                debug!(target: EXCHANGE_TARGET, received = buffer.len(), "peer closed the connection");
                break;
            }
            Ok(read) => read,
            Err(error) if is_timeout(&error) => {
                debug!(target: EXCHANGE_TARGET, received = buffer.len(), "read deadline elapsed");
                break;
            }
            // The flag is checked at the top of the loop; unrelated signals
            // just resume the read.
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(ExchangeError::Receive(error)),
        };
        let scan_from = buffer.len();
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(offset) = buffer
            .get(scan_from..)
            .and_then(|fresh| fresh.iter().position(|byte| *byte == LINE_TERMINATOR))
        {
            buffer.truncate(scan_from + offset);
            break;
        }
    }
    Ok(buffer)
}

fn decode_payload(request: &Request, payload: &[u8]) -> Response {
    if payload.is_empty() {
        debug!(target: EXCHANGE_TARGET, method = %request.method(), "no response payload");
        return Response::empty();
    }
    match Response::decode(payload) {
        Ok(response) => response,
        Err(error) => {
            debug!(
                target: EXCHANGE_TARGET,
                method = %request.method(),
                bytes = payload.len(),
                %error,
                "discarding undecodable response"
            );
            Response::empty()
        }
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Fixed point in time after which the exchange stops waiting.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
        }
    }

    /// Time left before expiry; `None` once nothing usable remains.
    fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .checked_duration_since(Instant::now())
            .filter(|remaining| !remaining.is_zero())
    }
}
