//! Built-in MIB: OID name resolution and formatting.
//!
//! There is no MIB compiler. A fixed table of well-known definitions covers
//! the names tools reach for, and any OID outside it still works numerically.

mod table;

use std::collections::HashMap;

use crate::oid::{MAX_OID_LEN, Oid};

/// SMI syntax of a MIB object, as far as printing and `=` in SET care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Not an object type (a node, group or table).
    None,
    Integer,
    OctetString,
    /// Printable text (DISPLAY-HINT "255a").
    DisplayString,
    /// MAC address (DISPLAY-HINT "1x:").
    PhysAddress,
    ObjectIdentifier,
    IpAddress,
    Counter32,
    Gauge32,
    TimeTicks,
    Counter64,
    Opaque,
}

/// One MIB definition.
#[derive(Debug)]
pub struct MibEntry {
    pub module: &'static str,
    pub name: &'static str,
    pub oid: &'static [u32],
    pub syntax: Syntax,
    /// Named numbers for enumerated INTEGERs.
    pub enums: &'static [(i32, &'static str)],
}

impl MibEntry {
    /// `label` for an enumerated value.
    pub fn enum_label(&self, value: i32) -> Option<&'static str> {
        self.enums
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| *label)
    }

    /// Number for an enum label.
    pub fn enum_value(&self, label: &str) -> Option<i32> {
        self.enums
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(v, _)| *v)
    }
}

/// How OIDs are rendered (`-O` flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OidStyle {
    /// `SNMPv2-MIB::sysDescr.0`
    #[default]
    Module,
    /// `.iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0` (`-Of`)
    Full,
    /// `.1.3.6.1.2.1.1.1.0` (`-On`)
    Numeric,
}

/// The MIB tree.
pub struct Mib {
    entries: &'static [MibEntry],
    by_oid: HashMap<&'static [u32], usize>,
    by_name: HashMap<&'static str, Vec<usize>>,
}

impl Mib {
    /// Index the built-in definitions.
    pub fn builtin() -> Self {
        let entries = table::ENTRIES;
        let mut by_oid = HashMap::with_capacity(entries.len());
        let mut by_name: HashMap<&'static str, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_oid.insert(entry.oid, i);
            by_name.entry(entry.name).or_default().push(i);
        }
        tracing::debug!(target: "easy_snmp::mib", { definitions = entries.len() }, "MIB loaded");
        Self {
            entries,
            by_oid,
            by_name,
        }
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The definition at exactly this OID.
    pub fn entry(&self, oid: &[u32]) -> Option<&MibEntry> {
        self.by_oid.get(oid).map(|&i| &self.entries[i])
    }

    /// The deepest definition that is a prefix of `oid`, with the rest of
    /// the arcs.
    pub fn lookup<'a>(&self, oid: &'a [u32]) -> Option<(&MibEntry, &'a [u32])> {
        (1..=oid.len())
            .rev()
            .find_map(|n| self.entry(&oid[..n]).map(|e| (e, &oid[n..])))
    }

    /// The object type an instance OID belongs to, if it has a syntax.
    pub fn object_type(&self, oid: &Oid) -> Option<&MibEntry> {
        self.lookup(oid.arcs())
            .map(|(entry, _)| entry)
            .filter(|entry| entry.syntax != Syntax::None)
    }

    /// Resolve an operand to an OID.
    ///
    /// Accepts numeric OIDs (`.1.3.6.1.2.1.1.1.0`), label paths
    /// (`.iso.org.dod.internet...`, `iso.3.6.1...`), `MODULE::name[.suffix]`
    /// and bare `name[.suffix]`.
    pub fn resolve(&self, input: &str) -> Option<Oid> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some((module, rest)) = input.split_once("::") {
            let mut parts = rest.split('.');
            let name = parts.next()?;
            let entry = self
                .by_name
                .get(name)?
                .iter()
                .map(|&i| &self.entries[i])
                .find(|e| e.module == module)?;
            return self.descend(entry.oid.to_vec(), parts);
        }

        let path = input.strip_prefix('.').unwrap_or(input);
        if let Some(oid) = Oid::parse(path) {
            return Some(oid);
        }

        let mut parts = path.split('.');
        let first = parts.next()?;
        let start = if let Ok(arc) = first.parse::<u32>() {
            vec![arc]
        } else {
            let candidates = self.by_name.get(first)?;
            // a leading dot means the path starts at the root
            let entry = candidates
                .iter()
                .map(|&i| &self.entries[i])
                .find(|e| !input.starts_with('.') || e.oid.len() == 1)?;
            entry.oid.to_vec()
        };
        self.descend(start, parts)
    }

    fn descend<'a>(
        &self,
        mut arcs: Vec<u32>,
        parts: impl Iterator<Item = &'a str>,
    ) -> Option<Oid> {
        for part in parts {
            if part.is_empty() {
                return None;
            }
            if let Ok(arc) = part.parse::<u32>() {
                arcs.push(arc);
                continue;
            }
            let child = self.by_name.get(part)?.iter().find_map(|&i| {
                let e = &self.entries[i];
                (e.oid.len() == arcs.len() + 1 && e.oid.starts_with(&arcs)).then_some(e)
            })?;
            arcs.push(child.oid[arcs.len()]);
        }
        (arcs.len() <= MAX_OID_LEN).then(|| Oid::new(arcs))
    }

    /// Render an OID.
    pub fn format_oid(&self, oid: &Oid, style: OidStyle) -> String {
        let arcs = oid.arcs();
        match style {
            OidStyle::Numeric => numeric(arcs),
            OidStyle::Full => {
                let mut out = String::new();
                for n in 1..=arcs.len() {
                    out.push('.');
                    match self.entry(&arcs[..n]) {
                        Some(entry) => out.push_str(entry.name),
                        None => out.push_str(&arcs[n - 1].to_string()),
                    }
                }
                out
            }
            OidStyle::Module => match self.lookup(arcs) {
                Some((entry, suffix)) => {
                    let mut out = format!("{}::{}", entry.module, entry.name);
                    for arc in suffix {
                        out.push('.');
                        out.push_str(&arc.to_string());
                    }
                    out
                }
                None => numeric(arcs),
            },
        }
    }
}

impl std::fmt::Debug for Mib {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mib").field("definitions", &self.len()).finish()
    }
}

fn numeric(arcs: &[u32]) -> String {
    let mut out = String::with_capacity(arcs.len() * 3);
    for arc in arcs {
        out.push('.');
        out.push_str(&arc.to_string());
    }
    out
}
