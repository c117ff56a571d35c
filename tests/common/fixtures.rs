//! Common test fixtures and constants.

use bytes::Bytes;
use easy_snmp::{Oid, Value, oid};

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}
pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

/// Number of objects under `system` in [`agent_data`].
pub const SYSTEM_OBJECTS: usize = 7;
/// Number of objects under `ifTable` in [`agent_data`].
pub const IF_TABLE_OBJECTS: usize = 10;

fn text(s: &'static str) -> Value {
    Value::OctetString(Bytes::from_static(s.as_bytes()))
}

/// A small agent: the system group, ifNumber and a two-row ifTable.
pub fn agent_data() -> Vec<(Oid, Value)> {
    let mut data = vec![
        (sys_descr(), text("Linux agent 6.1.0")),
        (
            sys_object_id(),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
        ),
        (sys_uptime(), Value::TimeTicks(123_456)),
        (sys_contact(), text("ops@example.net")),
        (sys_name(), text("agent")),
        (sys_location(), text("rack 4")),
        (sys_services(), Value::Integer(72)),
        (oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2)),
    ];
    let rows: [(u32, &'static str, i32, i32, u32); 2] =
        [(1, "lo", 24, 1, 1000), (2, "eth0", 6, 2, 2000)];
    for (index, descr, if_type, admin, octets) in rows {
        let column = |c: u32| oid!(1, 3, 6, 1, 2, 1, 2, 2, 1).child(c).child(index);
        data.push((column(1), Value::Integer(index as i32)));
        data.push((column(2), text(descr)));
        data.push((column(3), Value::Integer(if_type)));
        data.push((column(7), Value::Integer(admin)));
        data.push((column(10), Value::Counter32(octets)));
    }
    data
}

/// Tokens selecting SNMPv2c with a fast timeout and no retries.
pub fn v2c(extra: &[&str]) -> Vec<String> {
    session_tokens("2c", extra)
}

/// Tokens selecting SNMPv1 with a fast timeout and no retries.
pub fn v1(extra: &[&str]) -> Vec<String> {
    session_tokens("1", extra)
}

fn session_tokens(version: &str, extra: &[&str]) -> Vec<String> {
    let mut out = tokens(&["-v", version, "-c", "public", "-r", "0", "-t", "0.05"]);
    out.extend(tokens(extra));
    out
}

pub fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
