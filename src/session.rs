//! Synchronous request/response sessions.
//!
//! A [`Session`] owns one transport and a current-thread tokio runtime, so a
//! call blocks only the thread that makes it. Each [`SnmpSession::send`] is one
//! full exchange: request-id correlation, per-attempt timeout, retries and, on
//! v3, engine discovery and USM processing.

use std::io;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Instant;

use bytes::Bytes;
use tracing::{Span, instrument};

use crate::ber::Decoder;
use crate::error::internal::{AuthErrorKind, CryptoErrorKind, auth_error, crypto_error};
use crate::error::{Error, Result};
use crate::message::{
    CommunityMessage, Message, MsgFlags, MsgGlobalData, ScopedPdu, SecurityLevel, V3Message,
    V3MessageData,
};
use crate::options::{SecurityConfig, SessionConfig};
use crate::pdu::{Pdu, PduType};
use crate::transport::Transport;
use crate::v3::auth::{authenticate_message, verify_message};
use crate::v3::{AuthProtocol, LocalizedKey, PrivKey, PrivProtocol, UsmReport, UsmSecurityParams};
use crate::version::Version;

/// msgMaxSize advertised in v3 requests.
const MSG_MAX_SIZE: i32 = 65507;

/// USM minimum passphrase length (RFC 3414 section 11.2).
const MIN_PASSPHRASE_LEN: usize = 8;

static NEXT_REQUEST_ID: AtomicI32 = AtomicI32::new(1);

/// Request and message ids are positive and never zero.
fn next_request_id() -> i32 {
    loop {
        let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed) & i32::MAX;
        if id != 0 {
            return id;
        }
    }
}

/// One open session to an agent.
pub trait SnmpSession: Send {
    /// Send `pdu` and wait for the matching response.
    ///
    /// The request id is assigned here. Error-status responses are returned
    /// as `Ok`; interpreting them is up to the caller.
    fn send(&mut self, pdu: Pdu) -> Result<Pdu>;

    /// The host token the session was opened with.
    fn peer(&self) -> &str;

    fn version(&self) -> Version;
}

/// Session over any [`Transport`].
pub struct Session<T: Transport> {
    runtime: tokio::runtime::Runtime,
    inner: Exchange<T>,
}

impl<T: Transport> Session<T> {
    /// Build a session with its own current-thread runtime.
    pub fn new(app: &str, config: SessionConfig, transport: T) -> Result<Self> {
        let runtime = current_thread_runtime()
            .map_err(|e| Error::session_failure(app, &config.peer, &e.to_string()))?;
        Self::with_runtime(runtime, app, config, transport)
    }

    /// Build a session on a runtime the transport was created in.
    pub fn with_runtime(
        runtime: tokio::runtime::Runtime,
        app: &str,
        config: SessionConfig,
        transport: T,
    ) -> Result<Self> {
        let usm = match config.version {
            Version::V3 => Some(Usm::new(config.security.clone())?),
            _ => None,
        };
        Ok(Self {
            runtime,
            inner: Exchange {
                app: app.to_string(),
                config,
                transport,
                usm,
            },
        })
    }
}

impl<T: Transport> SnmpSession for Session<T> {
    fn send(&mut self, pdu: Pdu) -> Result<Pdu> {
        self.runtime.block_on(self.inner.request(pdu))
    }

    fn peer(&self) -> &str {
        &self.inner.config.peer
    }

    fn version(&self) -> Version {
        self.inner.config.version
    }
}

pub(crate) fn current_thread_runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
}

struct Exchange<T: Transport> {
    app: String,
    config: SessionConfig,
    transport: T,
    usm: Option<Usm>,
}

impl<T: Transport> Exchange<T> {
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            snmp.target = %self.config.peer,
            snmp.pdu_type = %pdu.pdu_type,
            snmp.varbind_count = pdu.varbinds.len(),
            snmp.request_id = tracing::field::Empty,
            snmp.attempt = tracing::field::Empty,
        )
    )]
    async fn request(&mut self, pdu: Pdu) -> Result<Pdu> {
        if self.config.version == Version::V1 && pdu.is_v2_only() {
            return Err(self.failure("Cannot send V2 PDU on V1 session"));
        }
        let response = match self.config.version {
            Version::V3 => self.request_v3(pdu).await?,
            _ => self.request_community(pdu).await?,
        };
        tracing::debug!(
            target: "easy_snmp::session",
            {
                snmp.error_status = response.error_status,
                snmp.error_index = response.error_index,
                snmp.varbind_count = response.varbinds.len(),
            },
            "received response"
        );
        Ok(response)
    }

    fn failure(&self, reason: &str) -> Error {
        Error::session_failure(&self.app, &self.config.peer, reason)
    }

    /// Send `data` up to `retries + 1` times, returning the first reply
    /// `accept` takes.
    async fn retry<R>(&self, data: &[u8], mut accept: impl FnMut(Bytes) -> Option<R>) -> Result<R> {
        let attempts = self.config.retries.saturating_add(1);
        for attempt in 0..attempts {
            Span::current().record("snmp.attempt", attempt);
            if attempt > 0 {
                tracing::debug!(target: "easy_snmp::session", "retrying request");
            }
            match self.attempt(data, &mut accept).await {
                Ok(Some(reply)) => return Ok(reply),
                Ok(None) => continue,
                Err(e) => {
                    return Err(Error::transport(&self.app, &self.config.peer, &e.to_string()));
                }
            }
        }
        tracing::debug!(target: "easy_snmp::session", { snmp.target = %self.config.peer, attempts }, "no response");
        Err(Error::Timeout {
            target: self.config.peer.clone(),
        })
    }

    /// One send and wait. `Ok(None)` means the attempt timed out.
    async fn attempt<R>(
        &self,
        data: &[u8],
        accept: &mut impl FnMut(Bytes) -> Option<R>,
    ) -> io::Result<Option<R>> {
        tracing::trace!(target: "easy_snmp::session", { snmp.bytes = data.len() }, "sending request");
        self.transport.send(data).await?;
        let wait = async {
            loop {
                let reply = self.transport.recv().await?;
                if let Some(r) = accept(reply) {
                    return Ok::<_, io::Error>(r);
                }
            }
        };
        match tokio::time::timeout(self.config.timeout, wait).await {
            Ok(Ok(reply)) => Ok(Some(reply)),
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Ok(Err(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }

    async fn request_community(&mut self, mut pdu: Pdu) -> Result<Pdu> {
        let request_id = next_request_id();
        Span::current().record("snmp.request_id", request_id);
        pdu.request_id = request_id;
        let version = self.config.version;
        let data = CommunityMessage::new(version, self.config.community.clone(), pdu).encode();

        self.retry(&data, |raw| match Message::decode(raw) {
            Ok(Message::Community(msg))
                if msg.version == version
                    && msg.pdu.request_id == request_id
                    && msg.pdu.pdu_type == PduType::Response =>
            {
                Some(msg.pdu)
            }
            Ok(_) => {
                tracing::trace!(target: "easy_snmp::session", { request_id }, "dropping unrelated message");
                None
            }
            Err(e) => {
                tracing::debug!(target: "easy_snmp::session", { error = %e }, "dropping undecodable message");
                None
            }
        })
        .await
    }

    async fn request_v3(&mut self, mut pdu: Pdu) -> Result<Pdu> {
        if self.usm.as_ref().is_some_and(|u| u.engine.is_none()) {
            self.discover().await?;
        }
        let mut resynced = false;
        let mut rediscovered = false;
        loop {
            let msg_id = next_request_id();
            Span::current().record("snmp.request_id", msg_id);
            pdu.request_id = msg_id;
            let data = self.usm()?.encode(&pdu, msg_id)?;
            let (raw, msg) = self.retry(&data, |raw| accept_v3(raw, msg_id)).await?;
            let scoped = self.usm_mut()?.open(raw, msg)?;

            if scoped.pdu.pdu_type != PduType::Report {
                if scoped.pdu.request_id != msg_id {
                    return Err(self.failure("Received a response with a mismatched request ID"));
                }
                return Ok(scoped.pdu);
            }

            match UsmReport::from_pdu(&scoped.pdu) {
                Some(UsmReport::NotInTimeWindow) if !resynced => {
                    tracing::debug!(target: "easy_snmp::session", "not in time window, resynchronised");
                    resynced = true;
                }
                Some(UsmReport::UnknownEngineId) if !rediscovered => {
                    tracing::debug!(target: "easy_snmp::session", "unknown engine ID, rediscovering");
                    rediscovered = true;
                    self.discover().await?;
                }
                Some(report) => return Err(self.failure(report.message())),
                None => return Err(self.failure("Received an unexpected report")),
            }
        }
    }

    async fn discover(&mut self) -> Result<()> {
        let msg_id = next_request_id();
        let mut request = Pdu::get(&[]);
        request.request_id = msg_id;
        let data = V3Message {
            global: MsgGlobalData {
                msg_id,
                msg_max_size: MSG_MAX_SIZE,
                msg_flags: MsgFlags::new(SecurityLevel::NoAuthNoPriv, true),
            },
            security_params: UsmSecurityParams::default().encode(),
            data: V3MessageData::Plaintext(ScopedPdu {
                context_engine_id: Bytes::new(),
                context_name: Bytes::new(),
                pdu: request,
            }),
        }
        .encode();

        tracing::debug!(target: "easy_snmp::session", { snmp.target = %self.config.peer }, "discovering engine");
        let (_, reply) = self.retry(&data, |raw| accept_v3(raw, msg_id)).await?;
        let params = UsmSecurityParams::decode(reply.security_params)?;
        if params.engine_id.is_empty() {
            return Err(self.failure("Unable to determine the engine ID"));
        }
        tracing::debug!(
            target: "easy_snmp::session",
            {
                snmp.engine_boots = params.engine_boots,
                snmp.engine_time = params.engine_time,
                snmp.engine_id_len = params.engine_id.len(),
            },
            "discovered engine"
        );
        self.usm_mut()?
            .set_engine(params.engine_id, params.engine_boots, params.engine_time);
        Ok(())
    }

    fn usm(&self) -> Result<&Usm> {
        self.usm
            .as_ref()
            .ok_or_else(|| Error::generic("USM state missing on a v3 session"))
    }

    fn usm_mut(&mut self) -> Result<&mut Usm> {
        self.usm
            .as_mut()
            .ok_or_else(|| Error::generic("USM state missing on a v3 session"))
    }
}

fn accept_v3(raw: Bytes, msg_id: i32) -> Option<(Bytes, V3Message)> {
    match Message::decode(raw.clone()) {
        Ok(Message::V3(msg)) if msg.global.msg_id == msg_id => Some((raw, msg)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(target: "easy_snmp::session", { error = %e }, "dropping undecodable message");
            None
        }
    }
}

/// Authoritative engine clock as last seen.
#[derive(Debug, Clone)]
struct EngineClock {
    engine_id: Bytes,
    boots: u32,
    time: u32,
    synced_at: Instant,
}

impl EngineClock {
    fn now(&self) -> u32 {
        let elapsed = self.synced_at.elapsed().as_secs().min(i32::MAX as u64) as u32;
        self.time.saturating_add(elapsed).min(i32::MAX as u32)
    }
}

/// Per-session USM state: engine clock and localized keys.
struct Usm {
    security: SecurityConfig,
    engine: Option<EngineClock>,
    auth_key: Option<LocalizedKey>,
    priv_key: Option<PrivKey>,
}

impl Usm {
    fn new(security: SecurityConfig) -> Result<Self> {
        if security.level.requires_auth() {
            check_passphrase(&security.auth_passphrase)?;
        }
        if security.level.requires_priv() {
            check_passphrase(&security.privacy_passphrase)?;
        }
        let preset = security.security_engine_id.clone();
        let (boots, time) = security.boots_time.unwrap_or((0, 0));
        let mut usm = Self {
            security,
            engine: None,
            auth_key: None,
            priv_key: None,
        };
        if let Some(engine_id) = preset {
            usm.set_engine(engine_id, boots, time);
        }
        Ok(usm)
    }

    fn auth_protocol(&self) -> AuthProtocol {
        self.security.auth_protocol.unwrap_or(AuthProtocol::Md5)
    }

    fn set_engine(&mut self, engine_id: Bytes, boots: u32, time: u32) {
        let level = self.security.level;
        let auth = self.auth_protocol();
        self.auth_key = level.requires_auth().then(|| {
            LocalizedKey::from_password(auth, self.security.auth_passphrase.as_bytes(), &engine_id)
        });
        self.priv_key = level.requires_priv().then(|| {
            PrivKey::from_password(
                auth,
                self.security.privacy_protocol.unwrap_or(PrivProtocol::Des),
                self.security.privacy_passphrase.as_bytes(),
                &engine_id,
            )
        });
        self.engine = Some(EngineClock {
            engine_id,
            boots,
            time,
            synced_at: Instant::now(),
        });
    }

    fn encode(&self, pdu: &Pdu, msg_id: i32) -> Result<Bytes> {
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| Error::generic("Unable to determine the engine ID"))?;
        let level = self.security.level;
        let scoped = ScopedPdu {
            context_engine_id: self
                .security
                .context_engine_id
                .clone()
                .unwrap_or_else(|| engine.engine_id.clone()),
            context_name: self.security.context.clone(),
            pdu: pdu.clone(),
        };
        let boots = engine.boots;
        let time = engine.now();

        let (data, priv_params) = match &self.priv_key {
            Some(key) if level.requires_priv() => {
                let (ciphertext, params) = key.encrypt(&scoped.to_bytes(), boots, time)?;
                (V3MessageData::Encrypted(ciphertext), params)
            }
            _ => (V3MessageData::Plaintext(scoped), Bytes::new()),
        };
        let auth_params = if level.requires_auth() {
            Bytes::from(vec![0u8; self.auth_protocol().mac_len()])
        } else {
            Bytes::new()
        };
        let params = UsmSecurityParams {
            engine_id: engine.engine_id.clone(),
            engine_boots: boots,
            engine_time: time,
            username: Bytes::from(self.security.username.clone()),
            auth_params,
            priv_params,
        };
        let msg = V3Message {
            global: MsgGlobalData {
                msg_id,
                msg_max_size: MSG_MAX_SIZE,
                msg_flags: MsgFlags::new(level, true),
            },
            security_params: params.encode(),
            data,
        }
        .encode();

        match &self.auth_key {
            Some(key) if level.requires_auth() => {
                let (offset, len) = UsmSecurityParams::auth_params_location(&msg)
                    .ok_or_else(|| auth_error(AuthErrorKind::AuthParamsNotFound))?;
                authenticate_message(key, msg, offset, len)
            }
            _ => Ok(msg),
        }
    }

    /// Verify, decrypt and track the engine clock of an incoming message.
    fn open(&mut self, raw: Bytes, msg: V3Message) -> Result<ScopedPdu> {
        let params = UsmSecurityParams::decode(msg.security_params)?;
        if msg.global.msg_flags.security_level.requires_auth() {
            let key = self
                .auth_key
                .as_ref()
                .ok_or_else(|| auth_error(AuthErrorKind::NoAuthKey))?;
            let (offset, len) = UsmSecurityParams::auth_params_location(&raw)
                .ok_or_else(|| auth_error(AuthErrorKind::AuthParamsNotFound))?;
            verify_message(key, &raw, offset, len)?;
        }

        let scoped = match msg.data {
            V3MessageData::Plaintext(scoped) => scoped,
            V3MessageData::Encrypted(ciphertext) => {
                let key = self
                    .priv_key
                    .as_ref()
                    .ok_or_else(|| crypto_error(CryptoErrorKind::InvalidKeyLength))?;
                let plaintext = key.decrypt(
                    &ciphertext,
                    params.engine_boots,
                    params.engine_time,
                    &params.priv_params,
                )?;
                ScopedPdu::decode(&mut Decoder::new(plaintext))?
            }
        };

        if let Some(engine) = &mut self.engine
            && engine.engine_id == params.engine_id
        {
            engine.boots = params.engine_boots;
            engine.time = params.engine_time;
            engine.synced_at = Instant::now();
        }
        Ok(scoped)
    }
}

fn check_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(Error::generic(format!(
            "Error: passphrase chosen is below the length requirements of the USM (min={}).",
            MIN_PASSPHRASE_LEN
        )));
    }
    Ok(())
}
