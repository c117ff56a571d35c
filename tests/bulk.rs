//! GETBULK and bulk walks against the in-memory agent.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};

use common::*;
use easy_snmp::{ErrorKind, ErrorStatus, Pdu, PduType, Value, VarBind};

#[test]
fn test_get_bulk_repeaters_and_non_repeaters() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime
        .get_bulk(&v2c(&["-Cn1", "-Cr3", "agent", "sysDescr.0", "ifDescr"]))
        .unwrap();

    let rendered: Vec<_> = results
        .iter()
        .map(|r| format!("{}.{}", r.oid, r.index))
        .collect();
    assert_eq!(
        rendered,
        [
            "SNMPv2-MIB::sysObjectID.0",
            "IF-MIB::ifDescr.1",
            "IF-MIB::ifDescr.2",
            "IF-MIB::ifType.1",
        ]
    );
    let request = &agent.requests()[0];
    assert_eq!(request.pdu_type, PduType::GetBulk);
    assert_eq!(request.error_status, 1);
    assert_eq!(request.error_index, 3);
}

#[test]
fn test_get_bulk_default_repetitions() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.get_bulk(&v2c(&["agent", "system"])).unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(agent.requests()[0].error_index, 10);
}

#[test]
fn test_get_bulk_too_few_operands_is_empty() {
    let (runtime, agent, engine) = mock_runtime(agent_data());
    let results = runtime
        .get_bulk(&v2c(&["-Cn3", "agent", "sysDescr.0"]))
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(engine.opened(), 0);
    assert!(agent.requests().is_empty());
}

#[test]
fn test_get_bulk_on_v1_refused() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let err = runtime.get_bulk(&v1(&["agent", "system"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Packet);
    assert_eq!(err.to_string(), "snmpbulkget: Cannot send V2 PDU on V1 session");
    assert!(agent.requests().is_empty());
}

#[test]
fn test_get_bulk_missing_number() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let err = runtime.get_bulk(&v2c(&["-Cr", "agent", "system"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_get_bulk_error_status() {
    let agent = MockAgent::new(agent_data()).with_hook(|pdu| {
        let status = if pdu.varbinds[0].oid == sys_name() {
            ErrorStatus::NoSuchName
        } else {
            ErrorStatus::TooBig
        };
        Some(Reply::Pdu(Pdu::error_response(pdu, status, 1)))
    });
    let (runtime, _agent, _) = with_agent(agent);

    let results = runtime.get_bulk(&v2c(&["agent", "sysName.0"])).unwrap();
    assert!(results.is_empty());

    let err = runtime.get_bulk(&v2c(&["agent", "sysDescr.0"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Packet);
    assert!(err.to_string().contains("Failed object: SNMPv2-MIB::sysDescr.0"));
}

#[test]
fn test_bulk_walk_stops_at_subtree_edge() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.bulk_walk(&v2c(&["agent", "system"])).unwrap();
    assert_eq!(results.len(), SYSTEM_OBJECTS);
    // ten repetitions cover the group and cross its edge in one request
    assert_eq!(agent.requests().len(), 1);
}

#[test]
fn test_bulk_walk_small_batches() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime
        .bulk_walk(&v2c(&["-Cr2", "agent", "ifTable"]))
        .unwrap();
    assert_eq!(results.len(), IF_TABLE_OBJECTS + 1);
    assert_eq!(results.last().unwrap().snmp_type, "ENDOFMIBVIEW");

    let requests = agent.requests();
    assert_eq!(requests.len(), 6);
    // each batch resumes after the last object of the previous one
    assert_eq!(requests[1].varbinds[0].oid.to_string(), "1.3.6.1.2.1.2.2.1.1.2");
}

#[test]
fn test_bulk_walk_leaf_falls_back_to_get() {
    let (runtime, agent, _) = mock_runtime(agent_data());
    let results = runtime.bulk_walk(&v2c(&["agent", "sysName.0"])).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value, "agent");
    assert_eq!(agent.requests().last().unwrap().pdu_type, PduType::Get);
}

#[test]
fn test_bulk_walk_include_requested() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let results = runtime.bulk_walk(&v2c(&["-Ci", "agent", "sysName.0"])).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_bulk_walk_statistics_count_only_walked_objects() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let (results, logs) = capture_logs(|| {
        runtime.bulk_walk(&v2c(&["-Cp", "-Ci", "agent", "system"])).unwrap()
    });
    assert_eq!(results.len(), SYSTEM_OBJECTS + 1);
    assert!(logs.contains(&format!("Variables found: {}", SYSTEM_OBJECTS)), "{logs}");
}

#[test]
fn test_bulk_walk_discards_rest_of_batch() {
    // an out-of-subtree object in the middle of a batch ends the walk
    let agent = MockAgent::new(agent_data()).with_hook(|pdu| {
        (pdu.pdu_type == PduType::GetBulk).then(|| {
            let vbs = vec![
                VarBind::new(sys_descr(), Value::Integer(1)),
                VarBind::new(easy_snmp::oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2)),
                VarBind::new(sys_name(), Value::Integer(3)),
            ];
            Reply::Pdu(Pdu::response_to(pdu, vbs))
        })
    });
    let (runtime, _agent, _) = with_agent(agent);
    let results = runtime.bulk_walk(&v2c(&["agent", "system"])).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].oid, "SNMPv2-MIB::sysDescr");
}

#[test]
fn test_bulk_walk_rejects_non_increasing() {
    let fired = AtomicBool::new(false);
    let agent = MockAgent::new(agent_data()).with_hook(move |pdu| {
        if pdu.varbinds[0].oid == sys_contact() && !fired.swap(true, Ordering::SeqCst) {
            let vb = VarBind::new(sys_descr(), Value::Integer(0));
            return Some(Reply::Pdu(Pdu::response_to(pdu, vec![vb])));
        }
        None
    });
    let (runtime, _agent, _) = with_agent(agent);
    let err = runtime
        .bulk_walk(&v2c(&["-Cr4", "agent", "system"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.to_string().starts_with("Error: OID not increasing:"));
}

#[test]
fn test_bulk_walk_on_v1_refused() {
    let (runtime, _agent, _) = mock_runtime(agent_data());
    let err = runtime.bulk_walk(&v1(&["agent", "system"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Packet);
    assert_eq!(err.to_string(), "snmpbulkwalk: Cannot send V2 PDU on V1 session");
}
