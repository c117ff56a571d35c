//! GET and GETNEXT.

use tracing::instrument;

use super::{Call, MAX_REQUEST_OIDS};
use crate::error::{Error, Result};
use crate::options::GetFlags;
use crate::pdu::{Pdu, PduType};
use crate::result::SnmpResult;
use crate::runtime::Runtime;

pub(crate) fn get<S: AsRef<str>>(runtime: &Runtime, tokens: &[S]) -> Result<Vec<SnmpResult>> {
    request(runtime, tokens, "snmpget", PduType::Get)
}

pub(crate) fn get_next<S: AsRef<str>>(runtime: &Runtime, tokens: &[S]) -> Result<Vec<SnmpResult>> {
    request(runtime, tokens, "snmpgetnext", PduType::GetNext)
}

#[instrument(level = "debug", skip_all, fields(snmp.op = app))]
fn request<S: AsRef<str>>(
    runtime: &Runtime,
    tokens: &[S],
    app: &'static str,
    pdu_type: PduType,
) -> Result<Vec<SnmpResult>> {
    let mut call = Call::start(runtime, app, tokens)?;
    let flags = GetFlags::parse(call.app_flags())?;

    match call.operands().len() {
        0 => return Err(Error::generic("Missing object name\n")),
        n if n > MAX_REQUEST_OIDS => {
            return Err(Error::generic(format!(
                "Too many object identifiers specified. Only {} allowed in one request.\n",
                MAX_REQUEST_OIDS
            )));
        }
        _ => {}
    }

    let oids = call.resolve_all(call.operands())?;
    let mut session = call.open()?;
    let mut pdu = match pdu_type {
        PduType::GetNext => Pdu::get_next(&oids),
        _ => Pdu::get(&oids),
    };

    // each fix drops one varbind, so this ends
    loop {
        let response = session.send(pdu)?;
        if response.error_status == 0 {
            call.print(&response.varbinds);
            break;
        }
        let err = call.packet_error(&response);
        if !flags.no_fix
            && let Some(fixed) = response.fix(pdu_type)
        {
            tracing::debug!(
                target: "easy_snmp::ops",
                { snmp.error_status = %response.status(), snmp.error_index = response.error_index },
                "dropping failed variable and resending"
            );
            pdu = fixed;
            continue;
        }
        return Err(err);
    }

    drop(session);
    Ok(call.finish())
}
