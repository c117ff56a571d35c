//! Token grammar.
//!
//! Every operation takes the same net-snmp style token list:
//! `[flags...] host [operands...]`. [`Invocation::parse`] turns it into a
//! [`SessionConfig`], output options, the raw `-C` values and the operands.
//! Each operation then interprets its own `-C` letters with one of the flag
//! structs below. All of this is call-scoped; nothing is shared between
//! concurrent calls.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;

use crate::error::{Error, ParseStage, Result};
use crate::format::FormatOptions;
use crate::message::SecurityLevel;
use crate::util::{parse_c_long, parse_hex};
use crate::v3::{AuthProtocol, PrivProtocol};
use crate::version::Version;

/// Retries when `-r` is absent.
pub const DEFAULT_RETRIES: u32 = 5;
/// Per-attempt timeout when `-t` is absent.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    allow_negative_numbers = true
)]
struct Tokens {
    #[arg(short = 'h', action = clap::ArgAction::Help)]
    _help: Option<bool>,
    #[arg(short = 'v')]
    version: Option<String>,
    #[arg(short = 'c')]
    community: Option<String>,
    #[arg(short = 'a')]
    auth_protocol: Option<String>,
    #[arg(short = 'A', allow_hyphen_values = true)]
    auth_passphrase: Option<String>,
    #[arg(short = 'e')]
    security_engine_id: Option<String>,
    #[arg(short = 'E')]
    context_engine_id: Option<String>,
    #[arg(short = 'l')]
    security_level: Option<String>,
    #[arg(short = 'n')]
    context: Option<String>,
    #[arg(short = 'u')]
    username: Option<String>,
    #[arg(short = 'x')]
    privacy_protocol: Option<String>,
    #[arg(short = 'X', allow_hyphen_values = true)]
    privacy_passphrase: Option<String>,
    #[arg(short = 'Z')]
    boots_time: Option<String>,
    #[arg(short = 'r')]
    retries: Option<String>,
    #[arg(short = 't')]
    timeout: Option<String>,
    #[arg(short = 'm')]
    load_mibs: Option<String>,
    #[arg(short = 'M')]
    mib_directories: Option<String>,
    #[arg(short = 'O', action = clap::ArgAction::Append)]
    output: Vec<String>,
    #[arg(short = 'C', action = clap::ArgAction::Append, allow_hyphen_values = true)]
    app: Vec<String>,
    /// Host followed by operands.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    positional: Vec<String>,
}

/// v3 security settings.
#[derive(Clone, Default)]
pub struct SecurityConfig {
    pub username: String,
    pub level: SecurityLevel,
    pub auth_protocol: Option<AuthProtocol>,
    pub auth_passphrase: String,
    pub privacy_protocol: Option<PrivProtocol>,
    pub privacy_passphrase: String,
    /// Skips discovery when set.
    pub security_engine_id: Option<Bytes>,
    /// Defaults to the security engine ID.
    pub context_engine_id: Option<Bytes>,
    pub context: Bytes,
    /// Seeds the engine clock when set.
    pub boots_time: Option<(u32, u32)>,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("username", &self.username)
            .field("level", &self.level)
            .field("auth_protocol", &self.auth_protocol)
            .field("privacy_protocol", &self.privacy_protocol)
            .field("security_engine_id", &self.security_engine_id)
            .field("context_engine_id", &self.context_engine_id)
            .field("context", &self.context)
            .field("boots_time", &self.boots_time)
            .finish_non_exhaustive()
    }
}

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host token as given, e.g. `localhost:161` or `udp6:[::1]`.
    pub peer: String,
    pub version: Version,
    pub community: Bytes,
    pub retries: u32,
    pub timeout: Duration,
    pub security: SecurityConfig,
}

impl SessionConfig {
    pub fn new(peer: impl Into<String>, version: Version) -> Self {
        Self {
            peer: peer.into(),
            version,
            community: Bytes::from_static(b"public"),
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            security: SecurityConfig::default(),
        }
    }
}

/// A parsed token list.
#[derive(Debug)]
pub struct Invocation {
    pub config: SessionConfig,
    pub format: FormatOptions,
    /// Raw `-C` values, letters only (`-Cr25` gives `r25`).
    pub app_flags: Vec<String>,
    pub operands: Vec<String>,
}

impl Invocation {
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let tokens = fold_end_oid(tokens);
        let parsed = Tokens::try_parse_from(&tokens).map_err(|e| {
            let stage = match e.kind() {
                ClapErrorKind::DisplayHelp => ParseStage::Help,
                _ => ParseStage::Usage,
            };
            Error::parse(stage, e.to_string())
        })?;

        let mut positional = parsed.positional.into_iter();
        let peer = positional
            .next()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::parse(ParseStage::General, "No hostname specified.\n"))?;

        let version = match &parsed.version {
            Some(v) => v.parse()?,
            None => Version::V3,
        };

        let mut config = SessionConfig::new(peer, version);
        if let Some(c) = parsed.community {
            config.community = Bytes::from(c);
        }
        if let Some(r) = &parsed.retries {
            config.retries = match parse_c_long(r) {
                Some((n, "")) => u32::try_from(n)
                    .map_err(|_| usage(format!("Invalid retries value: {}", r)))?,
                _ => return Err(usage(format!("Invalid retries value: {}", r))),
            };
        }
        if let Some(t) = &parsed.timeout {
            config.timeout = t
                .parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or_else(|| usage(format!("Invalid timeout value: {}", t)))?;
        }

        let security = &mut config.security;
        security.username = parsed.username.unwrap_or_default();
        if let Some(level) = &parsed.security_level {
            security.level = level.parse()?;
        }
        if let Some(a) = &parsed.auth_protocol {
            security.auth_protocol = Some(a.parse()?);
        }
        security.auth_passphrase = parsed.auth_passphrase.unwrap_or_default();
        if let Some(x) = &parsed.privacy_protocol {
            security.privacy_protocol = Some(x.parse()?);
        }
        security.privacy_passphrase = parsed.privacy_passphrase.unwrap_or_default();
        if let Some(e) = &parsed.security_engine_id {
            security.security_engine_id = Some(engine_id(e, 'e')?);
        }
        if let Some(e) = &parsed.context_engine_id {
            security.context_engine_id = Some(engine_id(e, 'E')?);
        }
        security.context = Bytes::from(parsed.context.unwrap_or_default());
        if let Some(z) = &parsed.boots_time {
            security.boots_time = Some(boots_time(z)?);
        }

        if parsed.load_mibs.is_some() || parsed.mib_directories.is_some() {
            tracing::debug!(target: "easy_snmp::options", "ignoring -m/-M, the MIB is built in");
        }

        let mut format = FormatOptions::default();
        for letters in &parsed.output {
            format.apply(letters)?;
        }

        Ok(Self {
            config,
            format,
            app_flags: parsed.app,
            operands: positional.collect(),
        })
    }
}

fn usage(message: String) -> Error {
    Error::parse(ParseStage::Usage, message)
}

/// `-CE` takes the end OID from the next token; glue them so the grammar
/// sees a single `-C` value.
fn fold_end_oid<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter().map(AsRef::as_ref);
    while let Some(token) = iter.next() {
        if token.starts_with("-C") && token.ends_with('E') {
            if let Some(end) = iter.next() {
                out.push(format!("{}{}", token, end));
                continue;
            }
        }
        out.push(token.to_string());
    }
    out
}

fn engine_id(hex: &str, flag: char) -> Result<Bytes> {
    match parse_hex(hex) {
        Some(bytes) if !bytes.is_empty() && bytes.len() <= 32 => Ok(Bytes::from(bytes)),
        _ => Err(usage(format!("Bad engine ID value after -{} flag.", flag))),
    }
}

fn boots_time(value: &str) -> Result<(u32, u32)> {
    let parse = |s: &str| s.trim().parse::<u32>().ok();
    value
        .split_once(',')
        .and_then(|(b, t)| Some((parse(b)?, parse(t)?)))
        .ok_or_else(|| usage("Need engine boots value after -Z flag.".to_string()))
}

fn unknown_flag(c: char) -> Error {
    Error::parse(ParseStage::Usage, format!("Unknown flag passed to -C: {}\n", c))
}

/// Number attached to a `-C` letter, e.g. the `25` in `r25`.
fn attached_number<'a>(rest: &'a str, letter: char) -> Result<(i64, &'a str)> {
    parse_c_long(rest).ok_or_else(|| usage(format!("No number given after -C{}\n", letter)))
}

/// GET and GETNEXT `-C` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetFlags {
    /// `f`: do not retry after dropping the failed variable.
    pub no_fix: bool,
}

impl GetFlags {
    pub fn parse(values: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        for value in values {
            for c in value.chars() {
                match c {
                    'f' => flags.no_fix = !flags.no_fix,
                    other => return Err(unknown_flag(other)),
                }
            }
        }
        Ok(flags)
    }
}

/// GETBULK `-C` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkGetFlags {
    pub non_repeaters: i32,
    pub max_repetitions: i32,
}

impl Default for BulkGetFlags {
    fn default() -> Self {
        Self {
            non_repeaters: 0,
            max_repetitions: 10,
        }
    }
}

impl BulkGetFlags {
    pub fn parse(values: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        for value in values {
            let mut rest = value.as_str();
            while let Some(c) = rest.chars().next() {
                rest = &rest[c.len_utf8()..];
                match c {
                    'n' | 'r' => {
                        let (n, tail) = attached_number(rest, c)?;
                        let n = n.clamp(0, i32::MAX as i64) as i32;
                        if c == 'n' {
                            flags.non_repeaters = n;
                        } else {
                            flags.max_repetitions = n;
                        }
                        rest = tail;
                    }
                    other => return Err(unknown_flag(other)),
                }
            }
        }
        Ok(flags)
    }
}

/// Walk `-C` flags. Each letter toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkFlags {
    /// `i`: include the root's own value, fetched with a GET first.
    pub include_requested: bool,
    /// `I`: never fall back to a GET of the root.
    pub dont_get_requested: bool,
    /// `p`: report the number of variables found.
    pub print_statistics: bool,
    /// `c`: do not require increasing OIDs.
    pub dont_check: bool,
    /// `t`: time the whole walk.
    pub time_results: bool,
    /// `T`: time each request.
    pub time_each_request: bool,
    /// `E <oid>`: stop before this OID.
    pub end_oid: Option<String>,
}

impl WalkFlags {
    pub fn parse(values: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        for value in values {
            let mut chars = value.char_indices();
            while let Some((i, c)) = chars.next() {
                match c {
                    'i' => flags.include_requested = !flags.include_requested,
                    'I' => flags.dont_get_requested = !flags.dont_get_requested,
                    'p' => flags.print_statistics = !flags.print_statistics,
                    'c' => flags.dont_check = !flags.dont_check,
                    't' => flags.time_results = !flags.time_results,
                    'T' => flags.time_each_request = !flags.time_each_request,
                    'E' => {
                        let end = &value[i + 1..];
                        if end.is_empty() {
                            return Err(usage("No end OID given after -CE\n".to_string()));
                        }
                        flags.end_oid = Some(end.to_string());
                        break;
                    }
                    other => return Err(unknown_flag(other)),
                }
            }
        }
        Ok(flags)
    }
}

/// Bulk walk `-C` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkWalkFlags {
    pub dont_check: bool,
    pub include_requested: bool,
    pub print_statistics: bool,
    pub non_repeaters: i32,
    pub max_repetitions: i32,
}

impl Default for BulkWalkFlags {
    fn default() -> Self {
        Self {
            dont_check: false,
            include_requested: false,
            print_statistics: false,
            non_repeaters: 0,
            max_repetitions: 10,
        }
    }
}

impl BulkWalkFlags {
    pub fn parse(values: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        for value in values {
            let mut rest = value.as_str();
            while let Some(c) = rest.chars().next() {
                rest = &rest[c.len_utf8()..];
                match c {
                    'c' => flags.dont_check = !flags.dont_check,
                    'i' => flags.include_requested = !flags.include_requested,
                    'p' => flags.print_statistics = !flags.print_statistics,
                    'n' | 'r' => {
                        let (n, tail) = attached_number(rest, c)?;
                        let n = n.clamp(0, i32::MAX as i64) as i32;
                        if c == 'n' {
                            flags.non_repeaters = n;
                        } else {
                            flags.max_repetitions = n;
                        }
                        rest = tail;
                    }
                    other => return Err(unknown_flag(other)),
                }
            }
        }
        Ok(flags)
    }
}

/// SET `-C` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetFlags {
    /// `q`: do not return the values the agent echoed.
    pub quiet: bool,
}

impl SetFlags {
    pub fn parse(values: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        for value in values {
            for c in value.chars() {
                match c {
                    'q' => flags.quiet = !flags.quiet,
                    other => return Err(unknown_flag(other)),
                }
            }
        }
        Ok(flags)
    }
}
