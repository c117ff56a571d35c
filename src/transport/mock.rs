//! Mock transport for testing.
//!
//! Answers requests from a queue of canned replies or a responder closure,
//! without touching the network.

use super::Transport;
use bytes::Bytes;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the mock does with one request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Deliver this datagram.
    Data(Bytes),
    /// Deliver nothing; the attempt times out.
    Timeout,
    /// Fail the receive with an IO error carrying this text.
    IoError(String),
}

type Responder = dyn Fn(&Bytes) -> MockResponse + Send + Sync;

struct MockTransportInner {
    queued: VecDeque<MockResponse>,
    pending: VecDeque<MockResponse>,
    requests: Vec<Bytes>,
    responder: Option<Arc<Responder>>,
}

/// Scripted transport. Clones share state, so a test can keep a handle to
/// inspect what was sent.
#[derive(Clone)]
pub struct MockTransport {
    target: SocketAddr,
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            target,
            inner: Arc::new(Mutex::new(MockTransportInner {
                queued: VecDeque::new(),
                pending: VecDeque::new(),
                requests: Vec::new(),
                responder: None,
            })),
        }
    }

    /// Answer every request by calling `f`. Queued replies take precedence.
    pub fn with_responder<F>(target: SocketAddr, f: F) -> Self
    where
        F: Fn(&Bytes) -> MockResponse + Send + Sync + 'static,
    {
        let mock = Self::new(target);
        mock.lock().responder = Some(Arc::new(f));
        mock
    }

    /// Queue a datagram to answer the next request with.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.lock().queued.push_back(MockResponse::Data(data.into()));
    }

    /// Let the next request go unanswered.
    pub fn queue_timeout(&self) {
        self.lock().queued.push_back(MockResponse::Timeout);
    }

    /// Fail the next receive.
    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.lock().queued.push_back(MockResponse::IoError(msg.into()));
    }

    /// Every message sent so far.
    pub fn requests(&self) -> Vec<Bytes> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> io::Result<()> {
        let data = Bytes::copy_from_slice(data);
        let mut inner = self.lock();
        let response = match inner.queued.pop_front() {
            Some(r) => r,
            None => match &inner.responder {
                Some(f) => f(&data),
                None => MockResponse::Timeout,
            },
        };
        inner.requests.push(data);
        inner.pending.push_back(response);
        Ok(())
    }

    async fn recv(&self) -> io::Result<Bytes> {
        let next = self.lock().pending.pop_front();
        match next {
            Some(MockResponse::Data(data)) => Ok(data),
            Some(MockResponse::IoError(msg)) => Err(io::Error::other(msg)),
            Some(MockResponse::Timeout) | None => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "mock timeout"))
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }
}
