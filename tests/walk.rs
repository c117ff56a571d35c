//! GETNEXT walks against the in-memory agent.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};

use common::*;
use easy_snmp::{ErrorKind, ErrorStatus, Pdu, PduType, VarBind};

#[test]
fn test_walk_system_subtree() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.walk(&v2c(&["agent", "system"])).unwrap();

    assert_eq!(results.len(), SYSTEM_OBJECTS);
    assert_eq!(results[0].oid, "SNMPv2-MIB::sysDescr");
    assert_eq!(results[6].oid, "SNMPv2-MIB::sysServices");
    assert!(results.iter().all(|r| r.oid.starts_with("SNMPv2-MIB::sys")));
    // one request per object plus the one that leaves the subtree
    assert_eq!(agent.requests().len(), SYSTEM_OBJECTS + 1);
    assert!(agent.requests().iter().all(|p| p.pdu_type == PduType::GetNext));
}

#[test]
fn test_walk_defaults_to_mib2() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let results = runtime.walk(&v1(&["agent"])).unwrap();
    // v1 ends with noSuchName past the last object
    assert_eq!(results.len(), SYSTEM_OBJECTS + 1 + IF_TABLE_OBJECTS);
    assert_eq!(results.last().unwrap().oid, "IF-MIB::ifInOctets");
    assert_eq!(results.last().unwrap().index, "2");
}

#[test]
fn test_walk_prints_end_of_mib_view() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let results = runtime.walk(&v2c(&["agent", "ifTable"])).unwrap();
    assert_eq!(results.len(), IF_TABLE_OBJECTS + 1);
    assert_eq!(results.last().unwrap().snmp_type, "ENDOFMIBVIEW");
}

#[test]
fn test_walk_leaf_falls_back_to_get() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.walk(&v2c(&["agent", "sysName.0"])).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].oid, "SNMPv2-MIB::sysName");
    assert_eq!(results[0].value, "agent");
    let requests = agent.requests();
    assert_eq!(requests.last().unwrap().pdu_type, PduType::Get);
}

#[test]
fn test_walk_leaf_without_fallback() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.walk(&v2c(&["-CI", "agent", "sysName.0"])).unwrap();
    assert!(results.is_empty());
    assert!(agent.requests().iter().all(|p| p.pdu_type == PduType::GetNext));
}

#[test]
fn test_walk_include_requested() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.walk(&v2c(&["-Ci", "agent", "sysName.0"])).unwrap();
    // the root GET counts, so no fallback GET follows
    assert_eq!(results.len(), 1);
    let gets = agent
        .requests()
        .iter()
        .filter(|p| p.pdu_type == PduType::Get)
        .count();
    assert_eq!(gets, 1);
}

#[test]
fn test_walk_explicit_end() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let results = runtime
        .walk(&v2c(&["-CE", "sysLocation.0", "agent", "system"]))
        .unwrap();
    let names: Vec<_> = results.iter().map(|r| r.oid.as_str()).collect();
    assert_eq!(
        names,
        [
            "SNMPv2-MIB::sysDescr",
            "SNMPv2-MIB::sysObjectID",
            "SNMPv2-MIB::sysUpTime",
            "SNMPv2-MIB::sysContact",
            "SNMPv2-MIB::sysName",
        ]
    );
}

#[test]
fn test_walk_attached_end_oid() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let results = runtime
        .walk(&v2c(&["-CEsysUpTime.0", "agent", "system"]))
        .unwrap();
    assert_eq!(results.len(), 2);
}

fn rewinding_agent() -> MockAgent {
    // answers sysContact.0 with sysDescr.0 once
    let fired = AtomicBool::new(false);
    MockAgent::new(agent_data()).with_hook(move |pdu| {
        if pdu.pdu_type == PduType::GetNext
            && pdu.varbinds[0].oid == sys_contact()
            && !fired.swap(true, Ordering::SeqCst)
        {
            let vb = VarBind::new(sys_descr(), easy_snmp::Value::Integer(0));
            return Some(Reply::Pdu(Pdu::response_to(pdu, vec![vb])));
        }
        None
    })
}

#[test]
fn test_walk_rejects_non_increasing() {
    let (runtime, _agent, _) = with_agent(rewinding_agent());
    let err = runtime.walk(&v2c(&["agent", "system"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert_eq!(
        err.to_string(),
        "Error: OID not increasing: SNMPv2-MIB::sysContact.0 >= SNMPv2-MIB::sysDescr.0\n"
    );
    assert_eq!(runtime.reference_count(), 0);
}

#[test]
fn test_walk_dont_check_follows_agent() {
    let (runtime, _agent, _) = with_agent(rewinding_agent());
    let results = runtime.walk(&v2c(&["-Cc", "agent", "system"])).unwrap();
    // four objects, the rewind, then the rest of the group again
    assert_eq!(results.len(), 4 + SYSTEM_OBJECTS);
}

#[test]
fn test_walk_packet_error() {
    let agent = MockAgent::new(agent_data()).with_hook(|pdu| {
        (pdu.pdu_type == PduType::GetNext && pdu.varbinds[0].oid == sys_name())
            .then(|| Reply::Pdu(Pdu::error_response(pdu, ErrorStatus::GenErr, 1)))
    });
    let (runtime, _agent, _) = with_agent(agent);
    let err = runtime.walk(&v2c(&["agent", "system"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Packet);
    assert!(err.to_string().contains("Failed object: SNMPv2-MIB::sysName.0"));
}

#[test]
fn test_walk_error_without_index_stops() {
    let agent = MockAgent::new(agent_data()).with_hook(|pdu| {
        (pdu.pdu_type == PduType::GetNext && pdu.varbinds[0].oid == sys_name())
            .then(|| Reply::Pdu(Pdu::error_response(pdu, ErrorStatus::GenErr, 0)))
    });
    let (runtime, _agent, _) = with_agent(agent);
    let results = runtime.walk(&v2c(&["agent", "system"])).unwrap();
    assert_eq!(results.len(), 5);
}

#[test]
fn test_walk_unknown_root_before_io() {
    let (runtime, _agent, engine) = mock_runtime(agent_data());
    let err = runtime.walk(&v2c(&["agent", "notAnObject"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownObjectId);
    let err = runtime
        .walk(&v2c(&["-CE", "notAnObject", "agent", "system"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownObjectId);
    assert_eq!(engine.opened(), 0);
}

#[test]
fn test_walk_statistics_and_timing_flags() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let results = runtime
        .walk(&v2c(&["-Cp", "-Ct", "-CT", "agent", "system"]))
        .unwrap();
    assert_eq!(results.len(), SYSTEM_OBJECTS);
}

#[test]
fn test_walk_statistics_count_only_walked_objects() {
    let (runtime, _agent, _) = mock_runtime(agent_data());

    let (results, logs) = capture_logs(|| {
        runtime.walk(&v2c(&["-Cp", "-Ci", "agent", "system"])).unwrap()
    });
    assert_eq!(results.len(), SYSTEM_OBJECTS + 1);
    assert!(logs.contains(&format!("Variables found: {}", SYSTEM_OBJECTS)), "{logs}");

    let (results, logs) = capture_logs(|| {
        runtime.walk(&v2c(&["-Cp", "agent", "sysName.0"])).unwrap()
    });
    // the fallback GET is not part of the walk
    assert_eq!(results.len(), 1);
    assert!(logs.contains("Variables found: 0"), "{logs}");
}

#[test]
fn test_walk_timeout_mid_walk() {
    let agent = MockAgent::new(agent_data()).with_hook(|pdu| {
        (pdu.varbinds[0].oid == sys_uptime()).then_some(Reply::Drop)
    });
    let (runtime, _agent, _) = with_agent(agent);
    let err = runtime.walk(&v2c(&["agent", "system"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(runtime.reference_count(), 0);
}
