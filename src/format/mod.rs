//! Variable printer.
//!
//! Renders a varbind as the one-line text net-snmp tools print,
//! `<name> = <TYPE>: <value>`, which the result post-processor then parses.
//! Callers must hold the MIB critical section (see
//! [`Runtime::with_mib`](crate::Runtime::with_mib)) while formatting.

use std::fmt::Write as _;

use crate::error::{Error, ParseStage, Result};
use crate::mib::{Mib, MibEntry, OidStyle, Syntax};
use crate::oid::Oid;
use crate::value::{OpaqueValue, Value};
use crate::varbind::VarBind;

/// Sentinel printed for `noSuchObject`.
pub const NO_SUCH_OBJECT: &str = "No Such Object available on this agent at this OID";
/// Sentinel printed for `noSuchInstance`.
pub const NO_SUCH_INSTANCE: &str = "No Such Instance currently exists at this OID";
/// Sentinel printed for `endOfMibView`.
pub const END_OF_MIB_VIEW: &str =
    "No more variables left in this MIB View (It is past the end of the MIB tree)";

/// `-O` output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// `e`: print enumerated INTEGERs as numbers.
    pub numeric_enums: bool,
    /// `f`: print OIDs as full label paths.
    pub full_oids: bool,
    /// `n`: print OIDs numerically.
    pub numeric_oids: bool,
    /// `t`: print TimeTicks as a bare number.
    pub numeric_timeticks: bool,
}

impl FormatOptions {
    /// Apply the letters of one `-O` argument.
    pub fn apply(&mut self, letters: &str) -> Result<()> {
        for c in letters.chars() {
            match c {
                'e' => self.numeric_enums = true,
                'f' => self.full_oids = true,
                'n' => self.numeric_oids = true,
                't' => self.numeric_timeticks = true,
                other => {
                    return Err(Error::parse(
                        ParseStage::Usage,
                        format!("Unknown output option passed to -O: {}\n", other),
                    ));
                }
            }
        }
        Ok(())
    }

    /// The flag letters that are set, in `e f n t` order.
    pub fn letters(&self) -> String {
        [
            (self.numeric_enums, 'e'),
            (self.full_oids, 'f'),
            (self.numeric_oids, 'n'),
            (self.numeric_timeticks, 't'),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, c)| *c)
        .collect()
    }

    pub fn oid_style(&self) -> OidStyle {
        if self.numeric_oids {
            OidStyle::Numeric
        } else if self.full_oids {
            OidStyle::Full
        } else {
            OidStyle::Module
        }
    }
}

/// Formats varbinds against a MIB.
#[derive(Clone, Copy)]
pub struct Printer<'a> {
    mib: &'a Mib,
    options: FormatOptions,
}

impl<'a> Printer<'a> {
    pub fn new(mib: &'a Mib, options: FormatOptions) -> Self {
        Self { mib, options }
    }

    pub fn oid(&self, oid: &Oid) -> String {
        self.mib.format_oid(oid, self.options.oid_style())
    }

    /// `<name> = <TYPE>: <value>`
    pub fn varbind(&self, vb: &VarBind) -> String {
        let mut line = self.oid(&vb.oid);
        line.push_str(" = ");
        let object = self.mib.object_type(&vb.oid);
        self.write_value(&mut line, &vb.value, object);
        line
    }

    fn write_value(&self, out: &mut String, value: &Value, object: Option<&MibEntry>) {
        let syntax = object.map_or(Syntax::None, |o| o.syntax);
        // writing into a String cannot fail
        let _ = match value {
            Value::Integer(v) => match object.and_then(|o| o.enum_label(*v)) {
                Some(label) if !self.options.numeric_enums => {
                    write!(out, "INTEGER: {}({})", label, v)
                }
                _ => write!(out, "INTEGER: {}", v),
            },
            Value::OctetString(data) => {
                match syntax {
                    Syntax::PhysAddress => {
                        out.push_str("STRING: ");
                        let parts: Vec<String> = data.iter().map(|b| format!("{:x}", b)).collect();
                        out.push_str(&parts.join(":"));
                    }
                    Syntax::DisplayString if is_printable(data) => {
                        out.push_str("STRING: ");
                        out.push_str(&String::from_utf8_lossy(data));
                    }
                    _ if is_printable(data) => {
                        out.push_str("STRING: \"");
                        out.push_str(&String::from_utf8_lossy(data));
                        out.push('"');
                    }
                    _ => {
                        out.push_str("Hex-STRING: ");
                        push_hex(out, data);
                    }
                }
                Ok(())
            }
            Value::Null => write!(out, "NULL"),
            Value::ObjectIdentifier(oid) => write!(out, "OID: {}", self.oid(oid)),
            Value::IpAddress([a, b, c, d]) => write!(out, "IpAddress: {}.{}.{}.{}", a, b, c, d),
            Value::Counter32(v) => write!(out, "Counter32: {}", v),
            Value::Gauge32(v) => write!(out, "Gauge32: {}", v),
            Value::TimeTicks(v) if self.options.numeric_timeticks => write!(out, "{}", v),
            Value::TimeTicks(v) => write!(out, "Timeticks: ({}) {}", v, uptime_string(*v)),
            Value::Counter64(v) => write!(out, "Counter64: {}", v),
            Value::Opaque(data) => match value.opaque() {
                Some(OpaqueValue::Float(f)) => write!(out, "Opaque: Float: {:.6}", f),
                Some(OpaqueValue::Double(d)) => write!(out, "Opaque: Double: {:.6}", d),
                Some(OpaqueValue::Int64(i)) => write!(out, "Opaque: Int64: {}", i),
                Some(OpaqueValue::UInt64(u)) => write!(out, "Opaque: UInt64: {}", u),
                Some(OpaqueValue::Counter64(u)) => write!(out, "Opaque: Counter64: {}", u),
                None => {
                    out.push_str("OPAQUE: ");
                    push_hex(out, data);
                    Ok(())
                }
            },
            Value::NoSuchObject => write!(out, "{}", NO_SUCH_OBJECT),
            Value::NoSuchInstance => write!(out, "{}", NO_SUCH_INSTANCE),
            Value::EndOfMibView => write!(out, "{}", END_OF_MIB_VIEW),
            Value::Unknown { tag, data } => {
                let _ = write!(out, "Wrong Type (0x{:02X}): ", tag);
                push_hex(out, data);
                Ok(())
            }
        };
    }
}

/// Printable text: valid UTF-8 without control characters other than
/// whitespace.
fn is_printable(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.chars().all(|c| !c.is_control() || c.is_ascii_whitespace()),
        Err(_) => false,
    }
}

/// Octets as `00 1A 2B ` (upper case, each followed by a space).
fn push_hex(out: &mut String, bytes: &[u8]) {
    for b in bytes {
        let _ = write!(out, "{:02X} ", b);
    }
}

/// Hundredths of a second as `1 day, 10:17:36.78`.
pub fn uptime_string(centiseconds: u32) -> String {
    let total_seconds = centiseconds / 100;
    let cs = centiseconds % 100;

    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    match days {
        0 => format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, cs),
        1 => format!("1 day, {}:{:02}:{:02}.{:02}", hours, minutes, seconds, cs),
        n => format!("{} days, {}:{:02}:{:02}.{:02}", n, hours, minutes, seconds, cs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use bytes::Bytes;

    fn line(value: Value, oid: Oid, options: FormatOptions) -> String {
        let mib = Mib::builtin();
        Printer::new(&mib, options).varbind(&VarBind::new(oid, value))
    }

    #[test]
    fn test_uptime_string() {
        assert_eq!(uptime_string(123), "0:00:01.23");
        assert_eq!(uptime_string(12345678), "1 day, 10:17:36.78");
        assert_eq!(uptime_string(2 * 8640000 + 360000), "2 days, 1:00:00.00");
    }

    #[test]
    fn test_display_string_unquoted() {
        assert_eq!(
            line(
                Value::OctetString(Bytes::from_static(b"Linux box")),
                oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
                FormatOptions::default()
            ),
            "SNMPv2-MIB::sysDescr.0 = STRING: Linux box"
        );
    }

    #[test]
    fn test_unknown_string_quoted_and_binary_hex() {
        let o = oid!(1, 3, 6, 1, 4, 1, 99999, 1);
        assert_eq!(
            line(Value::OctetString(Bytes::from_static(b"abc")), o.clone(), FormatOptions::default()),
            "SNMPv2-SMI::enterprises.99999.1 = STRING: \"abc\""
        );
        assert_eq!(
            line(Value::OctetString(Bytes::from_static(&[0, 0x1a, 0xff])), o, FormatOptions::default()),
            "SNMPv2-SMI::enterprises.99999.1 = Hex-STRING: 00 1A FF "
        );
    }

    #[test]
    fn test_phys_address() {
        assert_eq!(
            line(
                Value::OctetString(Bytes::from_static(&[0, 0x0c, 0x29, 0xab, 0x01, 0x10])),
                oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, 2),
                FormatOptions::default()
            ),
            "IF-MIB::ifPhysAddress.2 = STRING: 0:c:29:ab:1:10"
        );
    }

    #[test]
    fn test_enum_labels() {
        let o = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 1);
        assert_eq!(
            line(Value::Integer(1), o.clone(), FormatOptions::default()),
            "IF-MIB::ifAdminStatus.1 = INTEGER: up(1)"
        );
        let numeric = FormatOptions {
            numeric_enums: true,
            ..Default::default()
        };
        assert_eq!(
            line(Value::Integer(1), o, numeric),
            "IF-MIB::ifAdminStatus.1 = INTEGER: 1"
        );
    }

    #[test]
    fn test_timeticks_styles() {
        let o = oid!(1, 3, 6, 1, 2, 1, 1, 3, 0);
        assert_eq!(
            line(Value::TimeTicks(123), o.clone(), FormatOptions::default()),
            "DISMAN-EVENT-MIB::sysUpTimeInstance = Timeticks: (123) 0:00:01.23"
        );
        let numeric = FormatOptions {
            numeric_timeticks: true,
            numeric_oids: true,
            ..Default::default()
        };
        assert_eq!(line(Value::TimeTicks(123), o, numeric), ".1.3.6.1.2.1.1.3.0 = 123");
    }

    #[test]
    fn test_exceptions_and_opaque() {
        let o = oid!(1, 3, 6, 1, 2, 1, 1, 99, 0);
        assert_eq!(
            line(Value::NoSuchObject, o.clone(), FormatOptions::default()),
            format!("SNMPv2-MIB::system.99.0 = {}", NO_SUCH_OBJECT)
        );
        assert_eq!(
            line(OpaqueValue::Float(1.5).to_value(), o, FormatOptions::default()),
            "SNMPv2-MIB::system.99.0 = Opaque: Float: 1.500000"
        );
    }

    #[test]
    fn test_options_letters() {
        let mut opts = FormatOptions::default();
        opts.apply("tn").unwrap();
        opts.apply("e").unwrap();
        assert_eq!(opts.letters(), "ent");
        assert_eq!(opts.oid_style(), OidStyle::Numeric);
        assert!(opts.apply("z").is_err());
    }
}
