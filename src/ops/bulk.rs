//! GETBULK and the GETBULK-driven walk.

use tracing::instrument;

use super::Call;
use super::walk::default_root;
use crate::error::{Error, ErrorStatus, Result};
use crate::options::{BulkGetFlags, BulkWalkFlags};
use crate::pdu::Pdu;
use crate::result::SnmpResult;
use crate::runtime::Runtime;

#[instrument(level = "debug", skip_all, fields(snmp.op = "snmpbulkget"))]
pub(crate) fn get_bulk<S: AsRef<str>>(runtime: &Runtime, tokens: &[S]) -> Result<Vec<SnmpResult>> {
    let mut call = Call::start(runtime, "snmpbulkget", tokens)?;
    let flags = BulkGetFlags::parse(call.app_flags())?;

    let wanted = usize::try_from(flags.non_repeaters).unwrap_or(0);
    if call.operands().len() < wanted {
        tracing::debug!(
            target: "easy_snmp::bulk",
            "need more objects than {}",
            flags.non_repeaters
        );
        return Ok(call.finish());
    }
    let oids = call.resolve_all(call.operands())?;

    let mut session = call.open()?;
    let response = session.send(Pdu::get_bulk(
        &oids,
        flags.non_repeaters,
        flags.max_repetitions,
    ))?;
    drop(session);

    if response.error_status == 0 {
        call.print(&response.varbinds);
    } else if response.status() != ErrorStatus::NoSuchName && response.error_index != 0 {
        return Err(call.packet_error(&response));
    } else {
        tracing::debug!(target: "easy_snmp::bulk", { snmp.error_status = %response.status() }, "bulk request refused");
    }
    Ok(call.finish())
}

#[instrument(level = "debug", skip_all, fields(snmp.op = "snmpbulkwalk"))]
pub(crate) fn bulk_walk<S: AsRef<str>>(runtime: &Runtime, tokens: &[S]) -> Result<Vec<SnmpResult>> {
    let mut call = Call::start(runtime, "snmpbulkwalk", tokens)?;
    let flags = BulkWalkFlags::parse(call.app_flags())?;

    let root = match call.operands().first() {
        Some(name) => call.resolve(name)?,
        None => default_root(),
    };

    let mut session = call.open()?;
    if flags.include_requested {
        call.get_and_print(session.as_mut(), &root);
    }

    let mut cursor = root.clone();
    let mut found = 0usize;
    'walk: loop {
        let response = session.send(Pdu::get_bulk(
            std::slice::from_ref(&cursor),
            flags.non_repeaters,
            flags.max_repetitions,
        ))?;

        if response.error_status != 0 {
            if response.status() != ErrorStatus::NoSuchName && response.error_index != 0 {
                return Err(call.packet_error(&response));
            }
            tracing::debug!(target: "easy_snmp::bulk", { snmp.error_status = %response.status() }, "walk ended by error status");
            break;
        }
        if response.varbinds.is_empty() {
            break;
        }

        for vb in &response.varbinds {
            // the rest of the batch lies beyond the subtree too
            if !vb.oid.starts_with(&root) {
                break 'walk;
            }
            call.print(std::slice::from_ref(vb));
            found += 1;
            if vb.value.is_exception() {
                break 'walk;
            }
            if !flags.dont_check && cursor >= vb.oid {
                return Err(Error::generic(format!(
                    "Error: OID not increasing: {} >= {}\n",
                    call.oid_text(&cursor),
                    call.oid_text(&vb.oid)
                )));
            }
            cursor = vb.oid.clone();
        }
    }

    if call.printed() == 0 {
        call.get_and_print(session.as_mut(), &root);
    }
    drop(session);

    if flags.print_statistics {
        tracing::info!(target: "easy_snmp::bulk", { found }, "Variables found: {}", found);
    }
    Ok(call.finish())
}
