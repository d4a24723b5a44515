//! Description of the value type `BitPrefix`.

use std::{
    fmt::{Debug, Display, Formatter},
    net::Ipv4Addr,
    str::FromStr,
};

use ipnet::{AddrParseError, Ipv4Net};

/// Number of bits of an address.
pub const ADDR_BITS: u8 = 32;

/// An IPv4 prefix: a 32-bit key together with the number of leading bits that are significant.
///
/// The bits beyond `prefix_len` are always zero. Every constructor masks them, so two prefixes
/// covering the same range always compare equal. Prefixes are ordered by their numeric address
/// first, and by their length second.
///
/// The same type is used for the suffix stored on each edge of the [`ForwardingTrie`]. In that
/// case, the key is aligned to the most significant bit, i.e., the first bit of the edge is the
/// first bit of the key.
///
/// [`ForwardingTrie`]: crate::ForwardingTrie
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BitPrefix {
    bits: u32,
    len: u8,
}

/// A destination subnet of the route table.
pub type Subnet = BitPrefix;

impl BitPrefix {
    /// Create a new prefix, clearing all bits that are not part of the prefix.
    ///
    /// # Panics
    /// Panics if `len` is larger than 32.
    ///
    /// ```
    /// # use ip_router::BitPrefix;
    /// let p = BitPrefix::new(0x0a01_0203, 8);
    /// assert_eq!(p.bits(), 0x0a00_0000);
    /// assert_eq!(p.to_string(), "10.0.0.0/8");
    /// ```
    pub fn new(bits: u32, len: u8) -> Self {
        assert!(len <= ADDR_BITS, "prefix length {len} is larger than {ADDR_BITS}");
        Self {
            bits: bits & mask_from_prefix_len(len),
            len,
        }
    }

    /// Create a prefix that covers exactly one address.
    pub fn host(addr: u32) -> Self {
        Self {
            bits: addr,
            len: ADDR_BITS,
        }
    }

    /// Create the prefix that matches everything.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The (masked) representation of the prefix.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Prefix length
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// The network address of the prefix.
    pub fn addr(&self) -> Ipv4Addr {
        self.bits.into()
    }

    /// Check if `self` contains `other` in its prefix range. This function also returns `true` if
    /// `self` is identical to `other`.
    pub fn contains(&self, other: &Self) -> bool {
        self.len <= other.len && other.bits & mask_from_prefix_len(self.len) == self.bits
    }

    /// Check if a specific bit is set (counted from the left, where 0 is the first bit from the
    /// left). Bits that are not part of the prefix are never set.
    pub fn is_bit_set(&self, bit: u8) -> bool {
        bit < self.len && self.bits & (0x8000_0000 >> bit) != 0
    }

    /// The longest prefix that contains both `self` and `other`.
    pub fn longest_common_prefix(&self, other: &Self) -> Self {
        self.truncate(common_prefix_len(self, other))
    }

    /// Keep only the first `len` bits.
    pub(crate) fn truncate(&self, len: u8) -> Self {
        debug_assert!(len <= self.len);
        Self::new(self.bits, len)
    }

    /// Drop the first `n` bits, moving the remaining ones to the front.
    pub(crate) fn suffix(&self, n: u8) -> Self {
        debug_assert!(n <= self.len);
        Self {
            bits: self.bits.checked_shl(n as u32).unwrap_or(0),
            len: self.len - n,
        }
    }

    /// Append `other` behind the bits of `self`.
    pub(crate) fn concat(&self, other: &Self) -> Self {
        let len = self.len + other.len;
        assert!(len <= ADDR_BITS, "concatenated prefix length {len} is larger than {ADDR_BITS}");
        Self {
            bits: self.bits | other.bits.checked_shr(self.len as u32).unwrap_or(0),
            len,
        }
    }
}

/// Get the number of leading bits that `a` and `b` have in common. The result is never larger
/// than the shorter of the two prefix lengths, and bits past that length never count as a match.
///
/// ```
/// # use ip_router::{common_prefix_len, BitPrefix};
/// let a = BitPrefix::new(0x0102_0304, 24);
/// let b = BitPrefix::new(0x0103_0304, 24);
/// assert_eq!(common_prefix_len(&a, &b), 15);
/// assert_eq!(common_prefix_len(&a, &BitPrefix::zero()), 0);
/// ```
pub fn common_prefix_len(a: &BitPrefix, b: &BitPrefix) -> u8 {
    let len = a.len.min(b.len);
    let diff = (a.bits ^ b.bits) & mask_from_prefix_len(len);
    (diff.leading_zeros() as u8).min(len)
}

pub(crate) fn mask_from_prefix_len(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (ADDR_BITS - len)
    }
}

impl From<Ipv4Net> for BitPrefix {
    fn from(net: Ipv4Net) -> Self {
        Self::new(net.addr().into(), net.prefix_len())
    }
}

impl From<Ipv4Addr> for BitPrefix {
    fn from(addr: Ipv4Addr) -> Self {
        Self::host(addr.into())
    }
}

impl FromStr for BitPrefix {
    type Err = AddrParseError;

    /// Parse `a.b.c.d/len`. Host bits are allowed and get cleared.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Net>().map(Self::from)
    }
}

impl Display for BitPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr(), self.len)
    }
}

impl Debug for BitPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
