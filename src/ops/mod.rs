//! Request drivers.
//!
//! Every operation follows the same shape: hold the runtime for the whole
//! call, parse the tokens, open a session, exchange PDUs, print each returned
//! varbind and hand the lines to the result post-processor. The session and
//! the runtime reference are released on every exit path by drop order.

pub mod bulk;
pub mod get;
pub mod set;
pub mod walk;

use crate::error::{Error, Result};
use crate::format::Printer;
use crate::mib::Mib;
use crate::oid::Oid;
use crate::options::Invocation;
use crate::pdu::Pdu;
use crate::result::{SnmpResult, parse_results};
use crate::runtime::{Runtime, RuntimeGuard};
use crate::session::SnmpSession;
use crate::varbind::VarBind;

/// Most operands accepted in one GET or GETNEXT request.
pub const MAX_REQUEST_OIDS: usize = 128;

/// State shared by one driver call.
pub(crate) struct Call<'r> {
    guard: RuntimeGuard<'r>,
    app: &'static str,
    pub(crate) invocation: Invocation,
    lines: Vec<String>,
}

impl<'r> Call<'r> {
    /// Enter the runtime and parse the tokens.
    pub(crate) fn start<S: AsRef<str>>(
        runtime: &'r Runtime,
        app: &'static str,
        tokens: &[S],
    ) -> Result<Self> {
        let guard = runtime.guard(app);
        let invocation = Invocation::parse(tokens)?;
        tracing::debug!(
            target: "easy_snmp::ops",
            { app, snmp.target = %invocation.config.peer, snmp.version = %invocation.config.version },
            "starting request"
        );
        Ok(Self {
            guard,
            app,
            invocation,
            lines: Vec::new(),
        })
    }

    fn runtime(&self) -> &Runtime {
        self.guard.runtime()
    }

    pub(crate) fn app(&self) -> &'static str {
        self.app
    }

    pub(crate) fn operands(&self) -> &[String] {
        &self.invocation.operands
    }

    pub(crate) fn app_flags(&self) -> &[String] {
        &self.invocation.app_flags
    }

    pub(crate) fn open(&self) -> Result<Box<dyn SnmpSession>> {
        self.runtime()
            .engine()
            .open(self.app, &self.invocation.config)
    }

    /// Resolve one operand inside the MIB critical section.
    pub(crate) fn resolve(&self, name: &str) -> Result<Oid> {
        self.runtime()
            .with_mib(|mib| mib.resolve(name))
            .ok_or_else(|| Error::unknown_oid(name))
    }

    pub(crate) fn with_mib<R>(&self, f: impl FnOnce(&Mib) -> R) -> R {
        self.runtime().with_mib(f)
    }

    pub(crate) fn resolve_all(&self, names: &[String]) -> Result<Vec<Oid>> {
        names.iter().map(|name| self.resolve(name)).collect()
    }

    /// Format an OID the way results print it.
    pub(crate) fn oid_text(&self, oid: &Oid) -> String {
        let format = self.invocation.format;
        self.runtime()
            .with_mib(|mib| Printer::new(mib, format).oid(oid))
    }

    /// Queue formatted lines for `varbinds`.
    pub(crate) fn print(&mut self, varbinds: &[VarBind]) {
        let format = self.invocation.format;
        let lines = self.guard.runtime().with_mib(|mib| {
            let printer = Printer::new(mib, format);
            varbinds.iter().map(|vb| printer.varbind(vb)).collect::<Vec<_>>()
        });
        self.lines.extend(lines);
    }

    pub(crate) fn printed(&self) -> usize {
        self.lines.len()
    }

    /// Packet error for an error-status response.
    pub(crate) fn packet_error(&self, response: &Pdu) -> Error {
        let failed = (response.error_index != 0).then(|| {
            response
                .failed_varbind()
                .map(|vb| self.oid_text(&vb.oid))
                .unwrap_or_default()
        });
        Error::packet(response.status(), failed)
    }

    /// GET `oid` and print whatever comes back. Failures are only logged: this
    /// backs the walks' include-root and single-instance fallbacks.
    pub(crate) fn get_and_print(&mut self, session: &mut dyn SnmpSession, oid: &Oid) {
        match session.send(Pdu::get(std::slice::from_ref(oid))) {
            Ok(response) if response.error_status == 0 => self.print(&response.varbinds),
            Ok(response) => {
                tracing::debug!(target: "easy_snmp::ops", { snmp.error_status = %response.status() }, "root GET failed");
            }
            Err(e) => {
                tracing::debug!(target: "easy_snmp::ops", { error = %e }, "root GET failed");
            }
        }
    }

    /// Post-process everything printed.
    pub(crate) fn finish(self) -> Vec<SnmpResult> {
        tracing::debug!(target: "easy_snmp::ops", { app = self.app, count = self.lines.len() }, "request complete");
        parse_results(&self.lines)
    }
}
