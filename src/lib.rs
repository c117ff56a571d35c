#![allow(clippy::result_large_err)]

//! # easy-snmp
//!
//! Blocking SNMP v1/v2c/v3 operations that return structured results.
//!
//! Every operation takes the same flat token list a net-snmp command line
//! would (`-v 2c -c public host OID...`), runs the exchange to completion and
//! returns one [`SnmpResult`] per variable binding, with the value converted
//! to a native type where the SNMP type allows it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), easy_snmp::Error> {
//!     let results = easy_snmp::get(&["-v", "2c", "-c", "public", "localhost", "sysDescr.0"])?;
//!     for r in &results {
//!         println!("{r}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Typed parameters
//!
//! ```rust,no_run
//! use easy_snmp::{AuthProtocol, PrivProtocol, SecurityLevel, SessionParameters, Version};
//!
//! # fn main() -> Result<(), easy_snmp::Error> {
//! let session = SessionParameters::new("192.0.2.1")
//!     .version(Version::V3)
//!     .security_level(SecurityLevel::AuthPriv)
//!     .username("admin")
//!     .auth(AuthProtocol::Sha256, "authpass123")
//!     .privacy(PrivProtocol::Aes128, "privpass123");
//! let interfaces = session.bulk_walk(&["ifTable"])?;
//! println!("{} rows", interfaces.len());
//! # Ok(())
//! # }
//! ```
//!
//! Calls may run concurrently from any number of threads. Engine setup and
//! MIB access are shared process-wide through [`Runtime`]; each call opens
//! and closes its own session.

pub mod ber;
pub mod engine;
pub mod error;
pub mod format;
pub mod message;
pub mod mib;
pub mod oid;
pub mod ops;
pub mod options;
pub mod params;
pub mod pdu;
pub mod result;
pub mod runtime;
pub mod session;
pub mod transport;
pub mod v3;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use engine::{Engine, UdpEngine};
pub use error::{DecodeErrorKind, Error, ErrorKind, ErrorStatus, ParseStage, Result};
pub use format::FormatOptions;
pub use message::SecurityLevel;
pub use mib::Mib;
pub use oid::Oid;
pub use options::{Invocation, SecurityConfig, SessionConfig};
pub use params::SessionParameters;
pub use pdu::{Pdu, PduType};
pub use result::{ConvertedValue, SnmpResult, parse_result, parse_results};
pub use runtime::Runtime;
pub use session::{Session, SnmpSession};
pub use transport::{MockTransport, Transport, UdpTransport};
pub use v3::{AuthProtocol, PrivProtocol};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;

/// GET each operand.
pub fn get<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SnmpResult>> {
    Runtime::global().get(tokens)
}

/// GETNEXT each operand.
pub fn get_next<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SnmpResult>> {
    Runtime::global().get_next(tokens)
}

/// One GETBULK over the operands (`-Cn`, `-Cr`).
pub fn get_bulk<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SnmpResult>> {
    Runtime::global().get_bulk(tokens)
}

/// Walk the subtree under the operand (default mib-2) with GETNEXT.
pub fn walk<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SnmpResult>> {
    Runtime::global().walk(tokens)
}

/// Walk the subtree under the operand with GETBULK.
pub fn bulk_walk<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SnmpResult>> {
    Runtime::global().bulk_walk(tokens)
}

/// SET `OID TYPE VALUE` triples in one request.
pub fn set<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SnmpResult>> {
    Runtime::global().set(tokens)
}
