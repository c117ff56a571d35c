//! USM agent for v3 sessions over the mock transport.
//!
//! Answers engine discovery with an unknownEngineIDs report, then checks the
//! user, the HMAC and the boot count of every request before decrypting it
//! and answering from a [`MockAgent`] store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use easy_snmp::ber::Decoder;
use easy_snmp::message::{
    Message, MsgFlags, MsgGlobalData, ScopedPdu, SecurityLevel, V3Message, V3MessageData,
};
use easy_snmp::transport::MockResponse;
use easy_snmp::v3::auth::{authenticate_message, verify_message};
use easy_snmp::v3::{LocalizedKey, PrivKey, UsmReport, UsmSecurityParams};
use easy_snmp::{AuthProtocol, Oid, Pdu, PduType, PrivProtocol, Runtime, Value, VarBind, Version};

use super::agent::{MockAgent, MockEngine};

pub const USM_ENGINE_ID: &[u8] = b"\x80\x00\x1f\x88\x80mockagent";
pub const USM_USER: &str = "admin";
pub const USM_AUTH_PASS: &str = "authpass123";
pub const USM_PRIV_PASS: &str = "privpass123";
pub const USM_BOOTS: u32 = 3;
const USM_TIME: u32 = 12_345;

/// usmStats report binding: 1.3.6.1.6.3.15.1.1.<counter>.0
fn usm_stats(counter: u32) -> Oid {
    Oid::new([1, 3, 6, 1, 6, 3, 15, 1, 1, counter, 0])
}

/// One authPriv user (SHA, AES) in front of an object store.
pub struct UsmAgent {
    store: MockAgent,
    username: Bytes,
    auth_key: LocalizedKey,
    priv_key: PrivKey,
    stale_discovery: AtomicBool,
    received: AtomicUsize,
    reports: Mutex<Vec<UsmReport>>,
}

impl UsmAgent {
    pub fn new(data: impl IntoIterator<Item = (Oid, Value)>) -> Self {
        Self {
            store: MockAgent::new(data),
            username: Bytes::from_static(USM_USER.as_bytes()),
            auth_key: LocalizedKey::from_password(
                AuthProtocol::Sha1,
                USM_AUTH_PASS.as_bytes(),
                USM_ENGINE_ID,
            ),
            priv_key: PrivKey::from_password(
                AuthProtocol::Sha1,
                PrivProtocol::Aes128,
                USM_PRIV_PASS.as_bytes(),
                USM_ENGINE_ID,
            ),
            stale_discovery: AtomicBool::new(false),
            received: AtomicUsize::new(0),
            reports: Mutex::new(Vec::new()),
        }
    }

    /// Advertise an out-of-date boot count on the next discovery, as an
    /// agent that rebooted right after answering it would.
    pub fn with_stale_discovery(self) -> Self {
        self.stale_discovery.store(true, Ordering::SeqCst);
        self
    }

    /// Datagrams received, discovery included.
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    /// Reports sent so far, in order.
    pub fn reports(&self) -> Vec<UsmReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// PDUs that passed USM checks and reached the store.
    pub fn requests(&self) -> Vec<Pdu> {
        self.store.requests()
    }

    pub fn respond(&self, raw: &Bytes) -> MockResponse {
        self.received.fetch_add(1, Ordering::SeqCst);
        let Ok(Message::V3(msg)) = Message::decode(raw.clone()) else {
            return MockResponse::Timeout;
        };
        let Ok(params) = UsmSecurityParams::decode(msg.security_params.clone()) else {
            return MockResponse::Timeout;
        };
        let msg_id = msg.global.msg_id;

        if params.engine_id.is_empty() {
            let boots = if self.stale_discovery.swap(false, Ordering::SeqCst) {
                USM_BOOTS - 1
            } else {
                USM_BOOTS
            };
            return self.report(msg_id, UsmReport::UnknownEngineId, boots, SecurityLevel::NoAuthNoPriv);
        }
        if params.username != self.username {
            return self.report(msg_id, UsmReport::UnknownUserName, USM_BOOTS, SecurityLevel::NoAuthNoPriv);
        }
        let verified = UsmSecurityParams::auth_params_location(raw)
            .is_some_and(|(offset, len)| verify_message(&self.auth_key, raw, offset, len).is_ok());
        if !verified {
            return self.report(msg_id, UsmReport::WrongDigest, USM_BOOTS, SecurityLevel::NoAuthNoPriv);
        }
        if params.engine_boots != USM_BOOTS {
            return self.report(msg_id, UsmReport::NotInTimeWindow, USM_BOOTS, SecurityLevel::AuthNoPriv);
        }

        let V3MessageData::Encrypted(ciphertext) = msg.data else {
            return self.report(msg_id, UsmReport::UnsupportedSecLevel, USM_BOOTS, SecurityLevel::NoAuthNoPriv);
        };
        let scoped = self
            .priv_key
            .decrypt(&ciphertext, params.engine_boots, params.engine_time, &params.priv_params)
            .and_then(|plaintext| ScopedPdu::decode(&mut Decoder::new(plaintext)));
        let Ok(scoped) = scoped else {
            return self.report(msg_id, UsmReport::DecryptionError, USM_BOOTS, SecurityLevel::NoAuthNoPriv);
        };

        let response = self.store.serve(Version::V3, &scoped.pdu);
        MockResponse::Data(self.seal(msg_id, USM_BOOTS, SecurityLevel::AuthPriv, response))
    }

    fn report(&self, msg_id: i32, report: UsmReport, boots: u32, level: SecurityLevel) -> MockResponse {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report);
        let counter = match report {
            UsmReport::UnsupportedSecLevel => 1,
            UsmReport::NotInTimeWindow => 2,
            UsmReport::UnknownUserName => 3,
            UsmReport::UnknownEngineId => 4,
            UsmReport::WrongDigest => 5,
            UsmReport::DecryptionError => 6,
        };
        let pdu = Pdu {
            pdu_type: PduType::Report,
            request_id: msg_id,
            error_status: 0,
            error_index: 0,
            varbinds: vec![VarBind::new(usm_stats(counter), Value::Counter32(1))],
        };
        MockResponse::Data(self.seal(msg_id, boots, level, pdu))
    }

    /// Encode, encrypt and sign an outgoing message at `level`.
    fn seal(&self, msg_id: i32, boots: u32, level: SecurityLevel, pdu: Pdu) -> Bytes {
        let engine_id = Bytes::from_static(USM_ENGINE_ID);
        let scoped = ScopedPdu {
            context_engine_id: engine_id.clone(),
            context_name: Bytes::new(),
            pdu,
        };
        let (data, priv_params) = if level.requires_priv() {
            let (ciphertext, salt) = self
                .priv_key
                .encrypt(&scoped.to_bytes(), boots, USM_TIME)
                .unwrap();
            (V3MessageData::Encrypted(ciphertext), salt)
        } else {
            (V3MessageData::Plaintext(scoped), Bytes::new())
        };
        let auth_params = if level.requires_auth() {
            Bytes::from(vec![0u8; AuthProtocol::Sha1.mac_len()])
        } else {
            Bytes::new()
        };
        let params = UsmSecurityParams {
            engine_id,
            engine_boots: boots,
            engine_time: USM_TIME,
            username: self.username.clone(),
            auth_params,
            priv_params,
        };
        let msg = V3Message {
            global: MsgGlobalData {
                msg_id,
                msg_max_size: 65507,
                msg_flags: MsgFlags::new(level, false),
            },
            security_params: params.encode(),
            data,
        }
        .encode();
        if !level.requires_auth() {
            return msg;
        }
        let (offset, len) = UsmSecurityParams::auth_params_location(&msg).unwrap();
        authenticate_message(&self.auth_key, msg, offset, len).unwrap()
    }
}

/// A runtime whose sessions reach `agent`.
pub fn usm_runtime(agent: UsmAgent) -> (Runtime, Arc<UsmAgent>, Arc<MockEngine>) {
    super::init_tracing();
    let agent = Arc::new(agent);
    let responder = agent.clone();
    let engine = Arc::new(MockEngine::serving(move |req| responder.respond(req)));
    (Runtime::new(engine.clone()), agent, engine)
}

/// Tokens for an authPriv call as `user`, followed by `rest`.
pub fn v3(user: &str, rest: &[&str]) -> Vec<String> {
    let mut out = super::tokens(&[
        "-v", "3", "-l", "authPriv", "-u", user, "-a", "SHA", "-A", USM_AUTH_PASS, "-x", "AES",
        "-X", USM_PRIV_PASS, "-r", "0", "-t", "1",
    ]);
    out.extend(rest.iter().map(|s| s.to_string()));
    out
}
