//! Session parameters and their translation to tokens.
//!
//! [`SessionParameters`] is the typed form of everything a session needs.
//! [`SessionParameters::to_args`] turns it into the token list every
//! operation accepts, so a parameter set and a hand-written token list go
//! through the same parser.
//!
//! # Example
//!
//! ```rust
//! use easy_snmp::{SessionParameters, Version};
//!
//! let params = SessionParameters::new("localhost")
//!     .version(Version::V2c)
//!     .max_repeaters(25);
//! assert_eq!(
//!     params.to_args().unwrap(),
//!     ["-c", "public", "-r", "3", "-Cr25", "-t", "1", "-v", "2c", "localhost"]
//! );
//! ```

use crate::error::{Error, ParseStage, Result};
use crate::format::FormatOptions;
use crate::message::SecurityLevel;
use crate::result::SnmpResult;
use crate::runtime::Runtime;
use crate::v3::{AuthProtocol, PrivProtocol};
use crate::version::Version;

const AMBIGUOUS_PORT: &str = "Error: Provide either 'hostname' with port included (e.g., localhost:1234, \
     [2001:db8::]:161, etc) or 'hostname' and 'port_number' separately, not both.";

/// Normalized configuration for one session.
///
/// Empty strings and `None` mean "not set"; unset fields emit no tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParameters {
    /// Host, optionally with `:port`, a bracketed IPv6 literal or a
    /// `udp:`/`udp6:` prefix.
    pub hostname: String,
    /// Port, when not already part of `hostname`.
    pub port: Option<u16>,
    pub version: Version,
    pub community: String,
    pub auth_protocol: Option<AuthProtocol>,
    pub auth_passphrase: String,
    /// Hex, e.g. `800000020109840301`.
    pub security_engine_id: String,
    pub context_engine_id: String,
    pub security_level: Option<SecurityLevel>,
    pub context: String,
    pub security_username: String,
    pub privacy_protocol: Option<PrivProtocol>,
    pub privacy_passphrase: String,
    /// Destination engine boots and time.
    pub boots_time: Option<(u32, u32)>,
    pub retries: Option<u32>,
    /// Seconds.
    pub timeout: Option<f64>,
    pub load_mibs: String,
    pub mib_directories: String,
    pub format: FormatOptions,
    /// GETBULK max-repetitions (`-Cr<N>`).
    pub max_repeaters: Option<u32>,
}

impl Default for SessionParameters {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: None,
            version: Version::V3,
            community: "public".to_string(),
            auth_protocol: None,
            auth_passphrase: String::new(),
            security_engine_id: String::new(),
            context_engine_id: String::new(),
            security_level: None,
            context: String::new(),
            security_username: String::new(),
            privacy_protocol: None,
            privacy_passphrase: String::new(),
            boots_time: None,
            retries: Some(3),
            timeout: Some(1.0),
            load_mibs: String::new(),
            mib_directories: String::new(),
            format: FormatOptions::default(),
            max_repeaters: None,
        }
    }
}

impl SessionParameters {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the community; an empty string emits no `-c`.
    pub fn community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    /// Authentication protocol and passphrase (`-a`, `-A`).
    pub fn auth(mut self, protocol: AuthProtocol, passphrase: impl Into<String>) -> Self {
        self.auth_protocol = Some(protocol);
        self.auth_passphrase = passphrase.into();
        self
    }

    /// Privacy protocol and passphrase (`-x`, `-X`).
    pub fn privacy(mut self, protocol: PrivProtocol, passphrase: impl Into<String>) -> Self {
        self.privacy_protocol = Some(protocol);
        self.privacy_passphrase = passphrase.into();
        self
    }

    pub fn security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = Some(level);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.security_username = username.into();
        self
    }

    pub fn security_engine_id(mut self, hex: impl Into<String>) -> Self {
        self.security_engine_id = hex.into();
        self
    }

    pub fn context_engine_id(mut self, hex: impl Into<String>) -> Self {
        self.context_engine_id = hex.into();
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn boots_time(mut self, boots: u32, time: u32) -> Self {
        self.boots_time = Some((boots, time));
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Per-attempt timeout in seconds.
    pub fn timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn load_mibs(mut self, mibs: impl Into<String>) -> Self {
        self.load_mibs = mibs.into();
        self
    }

    pub fn mib_directories(mut self, dirs: impl Into<String>) -> Self {
        self.mib_directories = dirs.into();
        self
    }

    pub fn format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn max_repeaters(mut self, n: u32) -> Self {
        self.max_repeaters = Some(n);
        self
    }

    /// Translate to the token list, host last.
    ///
    /// Flags come in a fixed order regardless of how the parameters were
    /// set. Fails when the hostname carries a port and `port` is set too.
    pub fn to_args(&self) -> Result<Vec<String>> {
        let mut args = Vec::with_capacity(24);
        push_flag(&mut args, "-A", self.auth_passphrase.clone());
        push_flag(&mut args, "-a", display(self.auth_protocol));
        push_flag(&mut args, "-Z", display(self.boots_time.map(|(b, t)| format!("{},{}", b, t))));
        push_flag(&mut args, "-c", self.community.clone());
        push_flag(&mut args, "-n", self.context.clone());
        push_flag(&mut args, "-E", self.context_engine_id.clone());
        push_flag(&mut args, "-m", self.load_mibs.clone());
        push_flag(&mut args, "-M", self.mib_directories.clone());
        push_flag(&mut args, "-X", self.privacy_passphrase.clone());
        push_flag(&mut args, "-x", display(self.privacy_protocol));
        push_flag(&mut args, "-r", display(self.retries));
        push_flag(&mut args, "-e", self.security_engine_id.clone());
        push_flag(&mut args, "-l", display(self.security_level));
        push_flag(&mut args, "-u", self.security_username.clone());
        if let Some(n) = self.max_repeaters {
            // attached, not a separate token
            args.push(format!("-Cr{}", n));
        }
        push_flag(&mut args, "-t", display(self.timeout));
        push_flag(&mut args, "-v", self.version.as_arg().to_string());
        push_flag(&mut args, "-O", self.format.letters());

        args.push(self.host_address()?);
        Ok(args)
    }

    /// `to_args` followed by the operands.
    pub fn args_with<S: AsRef<str>>(&self, operands: &[S]) -> Result<Vec<String>> {
        let mut args = self.to_args()?;
        args.extend(operands.iter().map(|s| s.as_ref().to_string()));
        Ok(args)
    }

    /// The final host token, `<host>[:<port>]`.
    pub fn host_address(&self) -> Result<String> {
        if self.hostname.is_empty() {
            return Ok(String::new());
        }
        let (host, embedded) = split_host_port(&self.hostname);
        match (embedded, self.port) {
            (Some(_), Some(_)) => Err(Error::parse(ParseStage::General, AMBIGUOUS_PORT)),
            (Some(port), None) => Ok(format!("{}:{}", host, port)),
            (None, Some(port)) => Ok(format!("{}:{}", host, port)),
            (None, None) => Ok(host.to_string()),
        }
    }

    pub fn get<S: AsRef<str>>(&self, oids: &[S]) -> Result<Vec<SnmpResult>> {
        Runtime::global().get(&self.args_with(oids)?)
    }

    pub fn get_next<S: AsRef<str>>(&self, oids: &[S]) -> Result<Vec<SnmpResult>> {
        Runtime::global().get_next(&self.args_with(oids)?)
    }

    pub fn get_bulk<S: AsRef<str>>(&self, oids: &[S]) -> Result<Vec<SnmpResult>> {
        Runtime::global().get_bulk(&self.args_with(oids)?)
    }

    /// Walk `root`, or the default subtree when `root` is empty.
    pub fn walk(&self, root: &str) -> Result<Vec<SnmpResult>> {
        let operands: &[&str] = if root.is_empty() { &[] } else { &[root] };
        Runtime::global().walk(&self.args_with(operands)?)
    }

    pub fn bulk_walk<S: AsRef<str>>(&self, roots: &[S]) -> Result<Vec<SnmpResult>> {
        Runtime::global().bulk_walk(&self.args_with(roots)?)
    }

    /// `triples` are `oid, type, value` repeated.
    pub fn set<S: AsRef<str>>(&self, triples: &[S]) -> Result<Vec<SnmpResult>> {
        Runtime::global().set(&self.args_with(triples)?)
    }
}

fn push_flag(args: &mut Vec<String>, name: &str, value: String) {
    if !value.is_empty() {
        args.push(name.to_string());
        args.push(value);
    }
}

fn display<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Split a port off a host string.
///
/// - `udp6:[addr]:port` splits after the bracket; the prefix stays
/// - `[addr]:port` splits into `[addr]` and `port`
/// - two or more colons without brackets is a bare IPv6 address, unsplit
/// - otherwise everything after the first colon is the port
pub(crate) fn split_host_port(hostname: &str) -> (&str, Option<&str>) {
    if let (Some(open), Some(close)) = (hostname.find('['), hostname.find(']'))
        && open < close
    {
        let host = if hostname.contains("udp6") {
            &hostname[..=close]
        } else {
            &hostname[open..=close]
        };
        return match hostname[close + 1..].find(':') {
            Some(i) => {
                let colon = close + 1 + i;
                (&hostname[..colon], Some(&hostname[colon + 1..]))
            }
            None => (host, None),
        };
    }
    if hostname.matches(':').count() >= 2 {
        return (hostname, None);
    }
    match hostname.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (hostname, None),
    }
}
