//! GETNEXT subtree walk.

use std::time::Instant;

use tracing::instrument;

use super::Call;
use crate::error::{Error, ErrorStatus, Result};
use crate::oid;
use crate::oid::Oid;
use crate::options::WalkFlags;
use crate::pdu::Pdu;
use crate::result::SnmpResult;
use crate::runtime::Runtime;

/// Where a walk starts when no operand is given: mib-2.
pub(crate) fn default_root() -> Oid {
    oid!(1, 3, 6, 1, 2, 1)
}

#[instrument(level = "debug", skip_all, fields(snmp.op = "snmpwalk"))]
pub(crate) fn walk<S: AsRef<str>>(runtime: &Runtime, tokens: &[S]) -> Result<Vec<SnmpResult>> {
    let mut call = Call::start(runtime, "snmpwalk", tokens)?;
    let flags = WalkFlags::parse(call.app_flags())?;

    let root = match call.operands().first() {
        Some(name) => call.resolve(name)?,
        None => default_root(),
    };
    let end = match &flags.end_oid {
        Some(name) => Some(call.resolve(name)?),
        None => root.subtree_end(),
    };

    let mut session = call.open()?;
    if flags.include_requested {
        call.get_and_print(session.as_mut(), &root);
    }

    let started = Instant::now();
    let mut cursor = root.clone();
    let mut found = 0usize;

    'walk: loop {
        let sent = Instant::now();
        let response = session.send(Pdu::get_next(std::slice::from_ref(&cursor)))?;
        if flags.time_each_request {
            tracing::info!(
                target: "easy_snmp::walk",
                { elapsed_s = sent.elapsed().as_secs_f64() },
                "request time"
            );
        }

        if response.error_status != 0 {
            if response.status() != ErrorStatus::NoSuchName && response.error_index != 0 {
                return Err(call.packet_error(&response));
            }
            tracing::debug!(target: "easy_snmp::walk", { snmp.error_status = %response.status() }, "walk ended by error status");
            break;
        }
        if response.varbinds.is_empty() {
            break;
        }

        for vb in &response.varbinds {
            if end.as_ref().is_some_and(|end| vb.oid >= *end) {
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

    if flags.time_results {
        tracing::info!(
            target: "easy_snmp::walk",
            { elapsed_s = started.elapsed().as_secs_f64() },
            "Total traversal time"
        );
    }
    if call.printed() == 0 && !flags.dont_get_requested {
        call.get_and_print(session.as_mut(), &root);
    }
    drop(session);

    if flags.print_statistics {
        tracing::info!(target: "easy_snmp::walk", { found }, "Variables found: {}", found);
    }
    Ok(call.finish())
}
