//! SET.
//!
//! Operands come in `OID TYPE VALUE` triples. Every triple is checked and
//! every value encoded before the session is opened, so a bad assignment
//! never reaches the agent.

use std::net::{Ipv4Addr, ToSocketAddrs};

use bytes::Bytes;
use tracing::instrument;

use super::{Call, MAX_REQUEST_OIDS};
use crate::error::{Error, Result};
use crate::mib::{Mib, Syntax};
use crate::oid::Oid;
use crate::options::SetFlags;
use crate::pdu::Pdu;
use crate::result::SnmpResult;
use crate::runtime::Runtime;
use crate::util::{parse_c_long, parse_hex, parse_hex_octets};
use crate::value::{OpaqueValue, Value};
use crate::varbind::VarBind;

/// Type letters accepted after an object name.
const TYPE_LETTERS: &str = "=iu3cCtaosxdbnIUFD";

/// Highest BITS position plus one: a value must fit in one UDP datagram.
const MAX_BITS: u32 = 8 * 65507;

/// One `OID TYPE VALUE` triple as written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment<'a> {
    name: &'a str,
    kind: char,
    value: &'a str,
}

#[instrument(level = "debug", skip_all, fields(snmp.op = "snmpset"))]
pub(crate) fn set<S: AsRef<str>>(runtime: &Runtime, tokens: &[S]) -> Result<Vec<SnmpResult>> {
    let mut call = Call::start(runtime, "snmpset", tokens)?;
    let flags = SetFlags::parse(call.app_flags())?;

    let assignments = split_triples(call.operands())?;
    let varbinds = assignments
        .iter()
        .map(|a| {
            let oid = call.resolve(a.name)?;
            let object = call.with_mib(|mib| ObjectInfo::lookup(mib, &oid));
            // hostname lookups for `a` run outside the MIB lock
            let value = encode_value(a, &oid, object, |text| {
                call.with_mib(|mib| mib.resolve(text))
            })?;
            Ok(VarBind::new(oid, value))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut session = call.open()?;
    let response = session.send(Pdu::set(varbinds))?;
    drop(session);

    if response.error_status != 0 {
        return Err(call.packet_error(&response));
    }
    if !flags.quiet {
        call.print(&response.varbinds);
    }
    Ok(call.finish())
}

fn split_triples(operands: &[String]) -> Result<Vec<Assignment<'_>>> {
    if operands.is_empty() {
        return Err(Error::generic("Missing object name\n"));
    }
    if operands.len() > 3 * MAX_REQUEST_OIDS {
        return Err(Error::generic(format!(
            "Too many assignments specified. Only {} allowed in one request.\n",
            MAX_REQUEST_OIDS
        )));
    }

    let mut out = Vec::with_capacity(operands.len() / 3);
    let mut rest = operands;
    while let Some((name, tail)) = rest.split_first() {
        let Some((kind, tail)) = tail.split_first() else {
            return Err(Error::generic(format!("{name}: Needs type and value\n")));
        };
        let letter = kind.chars().next().unwrap_or('\0');
        if !TYPE_LETTERS.contains(letter) {
            return Err(Error::generic(format!("{name}: Bad object type: {letter}\n")));
        }
        let Some((value, tail)) = tail.split_first() else {
            return Err(Error::generic(format!("{name}: Needs value\n")));
        };
        out.push(Assignment {
            name,
            kind: letter,
            value,
        });
        rest = tail;
    }
    Ok(out)
}

/// Type letter implied by the object's MIB syntax, for `=`.
fn letter_for(syntax: Syntax) -> Option<char> {
    Some(match syntax {
        Syntax::Integer => 'i',
        Syntax::OctetString | Syntax::DisplayString => 's',
        Syntax::PhysAddress => 'x',
        Syntax::ObjectIdentifier => 'o',
        Syntax::IpAddress => 'a',
        Syntax::Counter32 => 'c',
        Syntax::Gauge32 => 'u',
        Syntax::TimeTicks => 't',
        Syntax::Counter64 => 'C',
        Syntax::Opaque | Syntax::None => return None,
    })
}

/// What encoding needs from the MIB about the object being set.
#[derive(Debug, Clone, Copy, Default)]
struct ObjectInfo {
    syntax: Option<Syntax>,
    enums: &'static [(i32, &'static str)],
}

impl ObjectInfo {
    fn lookup(mib: &Mib, oid: &Oid) -> Self {
        mib.object_type(oid)
            .map(|entry| Self {
                syntax: Some(entry.syntax),
                enums: entry.enums,
            })
            .unwrap_or_default()
    }

    fn enum_value(&self, label: &str) -> Option<i32> {
        self.enums
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(v, _)| *v)
    }
}

fn encode_value(
    assignment: &Assignment<'_>,
    oid: &Oid,
    object: ObjectInfo,
    resolve: impl FnOnce(&str) -> Option<Oid>,
) -> Result<Value> {
    let Assignment { name, value: text, .. } = *assignment;
    let bad = || Error::generic(format!("{name}: Bad value notation ({text})\n"));

    let kind = match assignment.kind {
        '=' => object.syntax.and_then(letter_for).ok_or_else(|| {
            Error::UndeterminedType {
                type_name: name.to_string(),
            }
        })?,
        other => other,
    };

    let value = match kind {
        'i' => match whole_number(text) {
            Some(n) => Value::Integer(i32::try_from(n).map_err(|_| bad())?),
            None => object
                .enum_value(text)
                .map(Value::Integer)
                .ok_or_else(bad)?,
        },
        'u' | '3' => Value::Gauge32(unsigned32(text).ok_or_else(bad)?),
        'c' => Value::Counter32(unsigned32(text).ok_or_else(bad)?),
        't' => Value::TimeTicks(unsigned32(text).ok_or_else(bad)?),
        'C' => Value::Counter64(unsigned64(text).ok_or_else(bad)?),
        'a' => Value::IpAddress(ipv4(text).ok_or_else(bad)?.octets()),
        'o' => Value::ObjectIdentifier(resolve(text).ok_or_else(bad)?),
        's' => Value::OctetString(Bytes::copy_from_slice(text.as_bytes())),
        'x' => {
            let octets = parse_hex(text)
                .or_else(|| parse_hex_octets(text).ok())
                .ok_or_else(bad)?;
            Value::OctetString(octets.into())
        }
        'd' => Value::OctetString(decimal_octets(text).ok_or_else(bad)?.into()),
        'b' => Value::OctetString(bits(text, object.enums).ok_or_else(bad)?.into()),
        'n' => Value::Null,
        'I' => OpaqueValue::Int64(whole_number(text).ok_or_else(bad)?).to_value(),
        'U' => OpaqueValue::UInt64(unsigned64(text).ok_or_else(bad)?).to_value(),
        'F' => OpaqueValue::Float(text.trim().parse().map_err(|_| bad())?).to_value(),
        'D' => OpaqueValue::Double(text.trim().parse().map_err(|_| bad())?).to_value(),
        _ => return Err(bad()),
    };
    tracing::trace!(target: "easy_snmp::set", { snmp.oid = %oid, kind = %kind }, "encoded assignment");
    Ok(value)
}

/// A C-style integer literal with nothing after it.
fn whole_number(text: &str) -> Option<i64> {
    match parse_c_long(text)? {
        (n, rest) if rest.trim().is_empty() => Some(n),
        _ => None,
    }
}

fn unsigned32(text: &str) -> Option<u32> {
    whole_number(text).and_then(|n| u32::try_from(n).ok())
}

fn unsigned64(text: &str) -> Option<u64> {
    // past i64::MAX the C-style parser saturates
    text.trim()
        .parse::<u64>()
        .ok()
        .or_else(|| whole_number(text).and_then(|n| u64::try_from(n).ok()))
}

fn ipv4(text: &str) -> Option<Ipv4Addr> {
    if let Ok(addr) = text.parse() {
        return Some(addr);
    }
    (text, 0)
        .to_socket_addrs()
        .ok()?
        .find_map(|addr| match addr.ip() {
            std::net::IpAddr::V4(v4) => Some(v4),
            std::net::IpAddr::V6(_) => None,
        })
}

/// `1.2.3` or `1 2 3`: one decimal number per octet.
fn decimal_octets(text: &str) -> Option<Vec<u8>> {
    text.split(|c: char| c == '.' || c.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>().ok())
        .collect()
}

/// BITS: bit numbers or enum labels separated by spaces or commas. Bit 0 is
/// the high bit of the first octet.
fn bits(text: &str, labels: &[(i32, &str)]) -> Option<Vec<u8>> {
    let mut octets = Vec::new();
    for part in text
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
    {
        let bit = match part.parse::<u32>() {
            Ok(n) => n,
            Err(_) => labels
                .iter()
                .find(|(_, label)| *label == part)
                .and_then(|(n, _)| u32::try_from(*n).ok())?,
        };
        if bit >= MAX_BITS {
            return None;
        }
        let byte = (bit / 8) as usize;
        if octets.len() <= byte {
            octets.resize(byte + 1, 0);
        }
        octets[byte] |= 0x80 >> (bit % 8);
    }
    Some(octets)
}
