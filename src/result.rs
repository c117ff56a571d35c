//! Structured results and the post-processor that builds them.
//!
//! Every operation prints each returned varbind as a net-snmp style line and
//! turns that line into an [`SnmpResult`] with [`parse_result`]. The typed
//! [`ConvertedValue`] is derived from `(type, value)` and never stored
//! independently.

use std::fmt;

use crate::error::{Error, Result};
use crate::util::parse_hex_octets;

/// Typed form of a result value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConvertedValue {
    /// INTEGER, Integer32.
    Int(i32),
    /// Gauge32, Counter32, TimeTicks.
    UInt32(u32),
    /// Counter64.
    UInt64(u64),
    /// Float, Double, and Opaque floats.
    Float(f64),
    /// Hex-STRING and OCTETSTR.
    Bytes(Vec<u8>),
    /// A textual type with nothing to convert; carries the value text.
    NotConvertible(String),
    /// The type name is not one we know.
    UnknownType,
    /// A numeric type whose text did not parse.
    ConversionError(String),
}

impl ConvertedValue {
    /// Convert `value` according to `type_name` (case-insensitive).
    pub fn from_type_and_value(type_name: &str, value: &str) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "integer" | "integer32" => {
                convert_numeric(type_name, value, |s| s.parse::<i32>().map(Self::Int))
            }
            "gauge32" | "counter32" | "timeticks" | "unsigned32" | "uinteger" => {
                convert_numeric(type_name, value, |s| s.parse::<u32>().map(Self::UInt32))
            }
            "counter64" => convert_numeric(type_name, value, |s| s.parse::<u64>().map(Self::UInt64)),
            "float" | "double" => match value.trim().parse::<f64>() {
                Ok(f) => Self::Float(f),
                Err(e) => Self::ConversionError(format!("{} Conversion Error: {}", type_name, e)),
            },
            "hex-string" => match parse_hex_octets(value) {
                Ok(bytes) => Self::Bytes(bytes),
                Err(part) => Self::ConversionError(format!(
                    "{} Conversion Error: Malformed hex part '{}'",
                    type_name, part
                )),
            },
            "octetstr" => Self::Bytes(value.as_bytes().to_vec()),
            "opaque" => opaque_float(value)
                .map(Self::Float)
                .unwrap_or_else(|| Self::NotConvertible(value.to_string())),
            "string" | "oid" | "objid" | "objidentity" | "ipaddress" | "network address"
            | "bitstring" | "nsapaddress" | "traptype" | "notiftype" | "objgroup"
            | "notifgroup" | "modid" | "agentcap" | "modcomp" | "null" | "other" => {
                Self::NotConvertible(value.to_string())
            }
            _ => Self::UnknownType,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Value text of a non-numeric type.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::NotConvertible(v) => Some(v),
            _ => None,
        }
    }

    /// Reason a numeric conversion failed.
    pub fn conversion_error(&self) -> Option<&str> {
        match self {
            Self::ConversionError(msg) => Some(msg),
            _ => None,
        }
    }
}

impl fmt::Display for ConvertedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:.6}", v),
            Self::Bytes(bytes) => {
                write!(f, "bytes[{}]: ", bytes.len())?;
                let shown = &bytes[..bytes.len().min(32)];
                for (i, b) in shown.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                if bytes.len() > 32 {
                    f.write_str("...")?;
                }
                Ok(())
            }
            Self::NotConvertible(text) => f.write_str(text),
            Self::UnknownType => f.write_str("Unknown Type Conversion"),
            Self::ConversionError(msg) => f.write_str(msg),
        }
    }
}

/// The number inside `label(n)`, else a leading integer, else the text.
fn extract_number(value: &str) -> &str {
    let mut rest = value;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 && after[digits..].starts_with(')') {
            return &after[..digits];
        }
        rest = after;
    }

    let trimmed = value.trim_start();
    let sign = usize::from(trimmed.starts_with('-'));
    let digits = trimmed[sign..].len()
        - trimmed[sign..]
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .len();
    if digits > 0 {
        &trimmed[..sign + digits]
    } else {
        value
    }
}

fn convert_numeric<E: fmt::Display>(
    type_name: &str,
    value: &str,
    parse: impl FnOnce(&str) -> std::result::Result<ConvertedValue, E>,
) -> ConvertedValue {
    if value.is_empty() {
        return ConvertedValue::ConversionError(format!(
            "{} Conversion Error: Empty value for numeric type",
            type_name
        ));
    }
    parse(extract_number(value)).unwrap_or_else(|e| {
        ConvertedValue::ConversionError(format!("{} Conversion Error: {}", type_name, e))
    })
}

/// `Float: 1.5` / `Double: 1.5` as printed inside an Opaque.
fn opaque_float(value: &str) -> Option<f64> {
    let (kind, number) = value.split_once(':')?;
    match kind.trim() {
        "Float" | "Double" => number.trim().parse().ok(),
        _ => None,
    }
}

/// One returned variable binding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SnmpResult {
    /// Object name without the instance index.
    pub oid: String,
    /// Instance index, possibly multi-arc (`10.0.0.1`).
    pub index: String,
    /// Type tag as printed, e.g. `STRING`, `INTEGER`, `NOSUCHOBJECT`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub snmp_type: String,
    /// Value text.
    pub value: String,
    converted_value: ConvertedValue,
}

impl SnmpResult {
    pub fn new(
        oid: impl Into<String>,
        index: impl Into<String>,
        snmp_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut result = Self {
            oid: oid.into(),
            index: index.into(),
            snmp_type: snmp_type.into(),
            value: value.into(),
            converted_value: ConvertedValue::UnknownType,
        };
        result.update_converted_value();
        result
    }

    pub fn converted_value(&self) -> &ConvertedValue {
        &self.converted_value
    }

    /// The converted value, or [`Error::UndeterminedType`] when the type is
    /// not one that can be classified.
    pub fn try_converted_value(&self) -> Result<&ConvertedValue> {
        match self.converted_value {
            ConvertedValue::UnknownType => Err(Error::UndeterminedType {
                type_name: self.snmp_type.clone(),
            }),
            _ => Ok(&self.converted_value),
        }
    }

    /// Recompute the converted value after `snmp_type` or `value` changed.
    pub fn update_converted_value(&mut self) {
        self.converted_value = ConvertedValue::from_type_and_value(&self.snmp_type, &self.value);
    }
}

impl fmt::Display for SnmpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "oid: {}, index: {}, type: {}, value: {}, converted_value: {}",
            self.oid, self.index, self.snmp_type, self.value, self.converted_value
        )
    }
}

/// Split `MODULE::name.index` into name and index.
fn split_index(name: &str) -> (&str, &str) {
    const RFC1213: &str = "RFC1213-MIB::";
    if let Some(rest) = name.strip_prefix(RFC1213)
        && let Some((object, index)) = rest.split_once('.')
        && !object.is_empty()
        && object.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        && !index.is_empty()
        && index.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return (&name[..RFC1213.len() + object.len()], index);
    }
    match name.rsplit_once('.') {
        Some((object, index)) if !object.is_empty() && !index.is_empty() => (object, index),
        _ => (name, ""),
    }
}

/// Parse one printed varbind line.
///
/// Never fails: text that does not follow `<name> = <TYPE>: <value>` lands in
/// whichever fields it reaches.
pub fn parse_result(line: &str) -> SnmpResult {
    let (name, rest) = line.split_once('=').unwrap_or((line, ""));
    let (oid, index) = split_index(name.trim());

    let (mut snmp_type, value) = match rest.split_once(':') {
        Some((t, v)) => (t.trim_start().to_string(), v),
        None => (String::new(), rest.trim_start()),
    };
    let value = value.strip_prefix(' ').unwrap_or(value).trim_end();
    let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    };

    if value.contains("No Such Object") {
        snmp_type = "NOSUCHOBJECT".to_string();
    } else if value.contains("No Such Instance") {
        snmp_type = "NOSUCHINSTANCE".to_string();
    } else if value.starts_with("No more variables left in this MIB View") {
        snmp_type = "ENDOFMIBVIEW".to_string();
    } else if oid.contains("sysUpTime") && snmp_type != "Timeticks" {
        // -Ot prints uptime as a bare number
        snmp_type = "Timeticks".to_string();
    }

    SnmpResult::new(oid, index, snmp_type, value)
}

/// Parse every line; an empty input gives an empty list.
pub fn parse_results<I, S>(lines: I) -> Vec<SnmpResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().map(|l| parse_result(l.as_ref())).collect()
}
