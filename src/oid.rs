//! Object Identifier (OID) type.
//!
//! Arcs live in a `SmallVec<[u32; 16]>`, so typical MIB-2 OIDs never touch
//! the heap. Ordering is lexicographic over the arcs, which is the order
//! agents walk in.

use smallvec::SmallVec;
use std::fmt;

/// Most sub-identifiers an OID may carry (RFC 2578 section 3.5).
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// The empty OID.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from any sequence of arcs.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Build from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse dotted numeric notation, with or without a leading dot.
    ///
    /// Returns `None` for anything that is not purely numeric, for empty
    /// components in the middle, and for more than [`MAX_OID_LEN`] arcs.
    ///
    /// ```
    /// use easy_snmp::oid::Oid;
    ///
    /// assert_eq!(Oid::parse(".1.3.6.1").unwrap().arcs(), &[1, 3, 6, 1]);
    /// assert!(Oid::parse("1..3").is_none());
    /// assert!(Oid::parse("sysDescr.0").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return None;
        }
        let mut arcs = SmallVec::new();
        for part in body.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            arcs.push(part.parse::<u32>().ok()?);
        }
        if arcs.len() > MAX_OID_LEN {
            return None;
        }
        Some(Self { arcs })
    }

    /// The arcs.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Whether there are no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Whether `prefix` is a (non-strict) prefix of this OID.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.starts_with(&prefix.arcs)
    }

    /// This OID with one more arc appended.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Append the arcs of `suffix`.
    pub fn extend(&mut self, suffix: &[u32]) {
        self.arcs.extend_from_slice(suffix);
    }

    /// The smallest OID that sorts after the whole subtree rooted here:
    /// the last arc incremented. `None` for the empty OID or a saturated arc.
    ///
    /// ```
    /// use easy_snmp::oid;
    ///
    /// assert_eq!(oid!(1, 3, 6, 1, 2, 1).subtree_end(), Some(oid!(1, 3, 6, 1, 2, 2)));
    /// ```
    pub fn subtree_end(&self) -> Option<Oid> {
        let mut arcs = self.arcs.clone();
        let last = arcs.last_mut()?;
        *last = last.checked_add(1)?;
        Some(Oid { arcs })
    }

    /// BER content octets (X.690 8.19).
    ///
    /// The first two arcs share one sub-identifier. A lone first arc is
    /// encoded as if the second were zero.
    pub fn to_ber(&self) -> SmallVec<[u8; 64]> {
        let mut out = SmallVec::new();
        let Some(&first) = self.arcs.first() else {
            return out;
        };
        let second = self.arcs.get(1).copied().unwrap_or(0);
        push_subidentifier(&mut out, first.saturating_mul(40).saturating_add(second));
        for &arc in self.arcs.iter().skip(2) {
            push_subidentifier(&mut out, arc);
        }
        out
    }

    /// Decode BER content octets. `None` on truncation, overflow, or more
    /// than [`MAX_OID_LEN`] arcs.
    pub fn from_ber(data: &[u8]) -> Option<Self> {
        let mut arcs: SmallVec<[u32; 16]> = SmallVec::new();
        let mut rest = data;
        while !rest.is_empty() {
            let (value, used) = read_subidentifier(rest)?;
            rest = &rest[used..];
            if arcs.is_empty() {
                let (a, b) = match value {
                    0..=39 => (0, value),
                    40..=79 => (1, value - 40),
                    _ => (2, value - 80),
                };
                arcs.push(a);
                arcs.push(b);
            } else {
                arcs.push(value);
            }
            if arcs.len() > MAX_OID_LEN {
                return None;
            }
        }
        Some(Self { arcs })
    }
}

fn push_subidentifier(out: &mut SmallVec<[u8; 64]>, value: u32) {
    let groups = (32 - value.leading_zeros()).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        out.push(byte);
    }
}

fn read_subidentifier(data: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return None;
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

/// Build an [`Oid`] from literal arcs.
///
/// ```
/// use easy_snmp::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Oid::parse("1.3.6.1.2.1.1.1.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
        assert_eq!(Oid::parse(".1.3").unwrap(), oid!(1, 3));
        assert!(Oid::parse("").is_none());
        assert!(Oid::parse(".").is_none());
        assert!(Oid::parse("1.3.").is_none());
        assert!(Oid::parse("1.-3").is_none());
        assert!(Oid::parse("1.99999999999").is_none());
    }

    #[test]
    fn test_parse_rejects_over_long() {
        let long = vec!["1"; MAX_OID_LEN + 1].join(".");
        assert!(Oid::parse(&long).is_none());
        let max = vec!["1"; MAX_OID_LEN].join(".");
        assert_eq!(Oid::parse(&max).unwrap().len(), MAX_OID_LEN);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(oid!(1, 3, 6, 1, 2) < oid!(1, 3, 6, 1, 2, 0));
        assert!(oid!(1, 3, 6, 1, 2, 9) < oid!(1, 3, 6, 1, 10));
        assert!(oid!(1, 3, 6, 1, 2, 1) < oid!(1, 3, 6, 1, 2, 2));
    }

    #[test]
    fn test_subtree_end() {
        let root = oid!(1, 3, 6, 1, 2, 1, 2);
        let end = root.subtree_end().unwrap();
        assert!(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 99) < end);
        assert!(oid!(1, 3, 6, 1, 2, 1, 3) >= end);
        assert!(Oid::empty().subtree_end().is_none());
        assert!(oid!(1, u32::MAX).subtree_end().is_none());
    }

    #[test]
    fn test_ber_encoding() {
        assert_eq!(oid!(1, 3, 6, 1).to_ber().as_slice(), &[0x2B, 0x06, 0x01]);
        // 2.999.3 packs 1079 as two base-128 groups
        assert_eq!(oid!(2, 999, 3).to_ber().as_slice(), &[0x88, 0x37, 0x03]);
        assert_eq!(
            Oid::from_ber(&[0x2B, 0x06, 0x01, 0x04, 0x01, 0x8F, 0x65]).unwrap(),
            oid!(1, 3, 6, 1, 4, 1, 2021)
        );
    }

    #[test]
    fn test_ber_rejects_truncation() {
        assert!(Oid::from_ber(&[0x2B, 0x86]).is_none());
        assert!(Oid::from_ber(&[0x2B, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0).to_string(), "1.3.6.1.2.1.1.3.0");
        assert_eq!(Oid::empty().to_string(), "");
    }
}
