//! Stub window server for exchange and behavioural tests.
//!
//! Listens on a Unix socket inside a temporary directory, records every
//! request line, and answers each connection with the configured [`Reply`].

use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tempfile::TempDir;

const ACCEPT_POLL: Duration = Duration::from_millis(5);
const TRICKLE_INTERVAL: Duration = Duration::from_millis(20);

/// How the stub answers each connection.
#[derive(Debug, Clone)]
pub(in crate::tests) enum Reply {
    /// Writes the text followed by a newline.
    Line(String),
    /// Writes the bytes verbatim, then closes.
    Raw(Vec<u8>),
    /// Reads the request and waits for the client to hang up.
    Silent,
    /// Dribbles bytes without ever sending a terminator.
    Trickle,
    /// Holds the connection open without ever reading from it.
    Deaf,
}

impl Reply {
    pub(in crate::tests) fn line(text: &str) -> Self {
        Self::Line(text.to_owned())
    }
}

pub(in crate::tests) struct StubServer {
    _dir: TempDir,
    path: Utf8PathBuf,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    pub(in crate::tests) fn spawn(reply: Reply) -> Result<Self> {
        let dir = TempDir::new().context("create socket directory")?;
        let path = Utf8PathBuf::from_path_buf(dir.path().join("stub.sock"))
            .map_err(|path| anyhow!("socket path is not UTF-8: {}", path.display()))?;
        let listener = UnixListener::bind(path.as_std_path()).context("bind stub server")?;
        listener
            .set_nonblocking(true)
            .context("stub server nonblocking")?;

        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let requests_clone = Arc::clone(&requests);
        let stop_clone = Arc::clone(&stop);
        let handle = thread::spawn(move || serve(&listener, &reply, &requests_clone, &stop_clone));

        Ok(Self {
            _dir: dir,
            path,
            requests,
            stop,
            handle: Some(handle),
        })
    }

    pub(in crate::tests) fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Request lines received so far, terminators included.
    pub(in crate::tests) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Decoded request objects received so far.
    pub(in crate::tests) fn decoded_requests(&self) -> Result<Vec<Value>> {
        self.requests()
            .iter()
            .map(|line| serde_json::from_str(line).context("decode recorded request"))
            .collect()
    }

    /// Number of recorded requests invoking `method`.
    pub(in crate::tests) fn count_method(&self, method: &str) -> Result<usize> {
        Ok(self
            .decoded_requests()?
            .iter()
            .filter(|request| request["method"] == method)
            .count())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    listener: &UnixListener,
    reply: &Reply,
    requests: &Mutex<Vec<String>>,
    stop: &AtomicBool,
) {
    while !stop.load(Ordering::Relaxed) {
        match listener.accept() {
            // A client hanging up early is not a stub failure.
            Ok((stream, _)) => drop(answer(stream, reply, requests, stop)),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
            Err(_) => return,
        }
    }
}

fn answer(
    stream: UnixStream,
    reply: &Reply,
    requests: &Mutex<Vec<String>>,
    stop: &AtomicBool,
) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    if matches!(reply, Reply::Deaf) {
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(ACCEPT_POLL);
        }
        return Ok(());
    }
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    if reader.read_line(&mut line)? > 0
        && let Ok(mut guard) = requests.lock()
    {
        guard.push(line);
    }

    let mut writer = stream;
    match reply {
        Reply::Line(text) => {
            writer.write_all(text.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()
        }
        Reply::Raw(bytes) => {
            writer.write_all(bytes)?;
            writer.flush()
        }
        Reply::Silent => io::copy(&mut reader, &mut io::sink()).map(|_| ()),
        Reply::Deaf => Ok(()),
        Reply::Trickle => {
            while !stop.load(Ordering::Relaxed) {
                writer.write_all(b"{")?;
                writer.flush()?;
                thread::sleep(TRICKLE_INTERVAL);
            }
            Ok(())
        }
    }
}
