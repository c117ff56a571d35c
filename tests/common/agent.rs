//! In-memory agent and an engine that serves it over the mock transport.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use easy_snmp::message::{CommunityMessage, Message};
use easy_snmp::transport::{MockResponse, MockTransport};
use easy_snmp::{
    Engine, ErrorStatus, Oid, Pdu, PduType, Result, Runtime, Session, SessionConfig, SnmpSession,
    Value, VarBind, Version,
};

/// What a hook does with a request instead of the store answering it.
pub enum Reply {
    /// Answer with this PDU.
    Pdu(Pdu),
    /// Never answer.
    Drop,
    /// Fail the receive with this transport error.
    Fail(&'static str),
}

type Hook = dyn Fn(&Pdu) -> Option<Reply> + Send + Sync;

/// Answers community requests from a sorted object store.
pub struct MockAgent {
    community: Bytes,
    data: Mutex<BTreeMap<Oid, Value>>,
    requests: Mutex<Vec<Pdu>>,
    hook: Option<Box<Hook>>,
}

impl MockAgent {
    pub fn new(data: impl IntoIterator<Item = (Oid, Value)>) -> Self {
        Self {
            community: Bytes::from_static(b"public"),
            data: Mutex::new(data.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            hook: None,
        }
    }

    /// Intercept requests before the store answers. `None` falls through.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Pdu) -> Option<Reply> + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Every PDU received so far.
    pub fn requests(&self) -> Vec<Pdu> {
        lock(&self.requests).clone()
    }

    pub fn value(&self, oid: &Oid) -> Option<Value> {
        lock(&self.data).get(oid).cloned()
    }

    /// Record `request` and answer it from the store, skipping the hook.
    pub fn serve(&self, version: Version, request: &Pdu) -> Pdu {
        lock(&self.requests).push(request.clone());
        self.answer(version, request)
    }

    pub fn respond(&self, request: &Bytes) -> MockResponse {
        let Ok(Message::Community(msg)) = Message::decode(request.clone()) else {
            return MockResponse::Timeout;
        };
        if msg.community != self.community {
            return MockResponse::Timeout;
        }
        lock(&self.requests).push(msg.pdu.clone());
        let pdu = match self.hook.as_ref().and_then(|hook| hook(&msg.pdu)) {
            Some(Reply::Drop) => return MockResponse::Timeout,
            Some(Reply::Fail(reason)) => return MockResponse::IoError(reason.to_string()),
            Some(Reply::Pdu(pdu)) => pdu,
            None => self.answer(msg.version, &msg.pdu),
        };
        MockResponse::Data(CommunityMessage::new(msg.version, msg.community, pdu).encode())
    }

    fn answer(&self, version: Version, request: &Pdu) -> Pdu {
        let v1 = version == Version::V1;
        let mut data = lock(&self.data);
        match request.pdu_type {
            PduType::Get => {
                let mut out = Vec::new();
                for (i, vb) in request.varbinds.iter().enumerate() {
                    match data.get(&vb.oid) {
                        Some(value) => out.push(VarBind::new(vb.oid.clone(), value.clone())),
                        None if v1 => return no_such_name(request, i),
                        None => out.push(VarBind::new(vb.oid.clone(), missing(&data, &vb.oid))),
                    }
                }
                Pdu::response_to(request, out)
            }
            PduType::GetNext => {
                let mut out = Vec::new();
                for (i, vb) in request.varbinds.iter().enumerate() {
                    match next(&data, &vb.oid) {
                        Some(found) => out.push(found),
                        None if v1 => return no_such_name(request, i),
                        None => out.push(VarBind::new(vb.oid.clone(), Value::EndOfMibView)),
                    }
                }
                Pdu::response_to(request, out)
            }
            PduType::GetBulk => {
                let non_repeaters = (request.error_status.max(0) as usize).min(request.varbinds.len());
                let max_repetitions = request.error_index.max(0) as usize;
                let mut out = Vec::new();
                for vb in &request.varbinds[..non_repeaters] {
                    out.push(next_or_end(&data, &vb.oid));
                }
                let mut cursors: Vec<Oid> = request.varbinds[non_repeaters..]
                    .iter()
                    .map(|vb| vb.oid.clone())
                    .collect();
                for _ in 0..max_repetitions {
                    if cursors.is_empty() {
                        break;
                    }
                    for cursor in cursors.iter_mut() {
                        let vb = next_or_end(&data, cursor);
                        *cursor = vb.oid.clone();
                        out.push(vb);
                    }
                }
                Pdu::response_to(request, out)
            }
            PduType::Set => {
                for (i, vb) in request.varbinds.iter().enumerate() {
                    let status = match data.get(&vb.oid) {
                        None if v1 => Some(ErrorStatus::NoSuchName),
                        None => Some(ErrorStatus::NotWritable),
                        Some(current)
                            if std::mem::discriminant(current) != std::mem::discriminant(&vb.value) =>
                        {
                            Some(ErrorStatus::WrongType)
                        }
                        Some(_) => None,
                    };
                    if let Some(status) = status {
                        return Pdu::error_response(request, status, i as i32 + 1);
                    }
                }
                for vb in &request.varbinds {
                    data.insert(vb.oid.clone(), vb.value.clone());
                }
                Pdu::response_to(request, request.varbinds.clone())
            }
            PduType::Response | PduType::Report => {
                Pdu::error_response(request, ErrorStatus::GenErr, 0)
            }
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn no_such_name(request: &Pdu, position: usize) -> Pdu {
    Pdu::error_response(request, ErrorStatus::NoSuchName, position as i32 + 1)
}

/// v2c exception for a GET of an absent object.
fn missing(data: &BTreeMap<Oid, Value>, oid: &Oid) -> Value {
    let parent = Oid::from_slice(&oid.arcs()[..oid.len().saturating_sub(1)]);
    if data.keys().any(|k| k.starts_with(&parent)) {
        Value::NoSuchInstance
    } else {
        Value::NoSuchObject
    }
}

fn next(data: &BTreeMap<Oid, Value>, oid: &Oid) -> Option<VarBind> {
    data.range((Bound::Excluded(oid.clone()), Bound::Unbounded))
        .next()
        .map(|(k, v)| VarBind::new(k.clone(), v.clone()))
}

fn next_or_end(data: &BTreeMap<Oid, Value>, oid: &Oid) -> VarBind {
    next(data, oid).unwrap_or_else(|| VarBind::new(oid.clone(), Value::EndOfMibView))
}

type Responder = dyn Fn(&Bytes) -> MockResponse + Send + Sync;

/// Engine whose sessions talk to an in-memory agent.
pub struct MockEngine {
    responder: Arc<Responder>,
    opened: AtomicUsize,
}

impl MockEngine {
    pub fn new(agent: Arc<MockAgent>) -> Self {
        Self::serving(move |req| agent.respond(req))
    }

    /// Engine whose transports hand every datagram to `responder`.
    pub fn serving<F>(responder: F) -> Self
    where
        F: Fn(&Bytes) -> MockResponse + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            opened: AtomicUsize::new(0),
        }
    }

    /// Sessions opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Engine for MockEngine {
    fn open(&self, app: &str, config: &SessionConfig) -> Result<Box<dyn SnmpSession>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let responder = self.responder.clone();
        let transport = MockTransport::with_responder("127.0.0.1:161".parse().unwrap(), move |req| {
            responder(req)
        });
        Ok(Box::new(Session::new(app, config.clone(), transport)?))
    }
}

/// A runtime over a fresh agent holding `data`.
pub fn mock_runtime(
    data: impl IntoIterator<Item = (Oid, Value)>,
) -> (Runtime, Arc<MockAgent>, Arc<MockEngine>) {
    with_agent(MockAgent::new(data))
}

/// A runtime over `agent`.
pub fn with_agent(agent: MockAgent) -> (Runtime, Arc<MockAgent>, Arc<MockEngine>) {
    super::init_tracing();
    let agent = Arc::new(agent);
    let engine = Arc::new(MockEngine::new(agent.clone()));
    (Runtime::new(engine.clone()), agent, engine)
}
