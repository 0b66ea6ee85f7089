//! Byte pattern tables for the query component.
//!
//! The predefined table constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

/// A table specifying a set of ASCII bytes.
///
/// Non-ASCII bytes are never members of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table(u64, u64);

impl Table {
    /// Creates a table that contains exactly the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(cur.is_ascii(), "cannot add non-ASCII byte to table");
            table |= 1u128 << *cur;
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Combines two tables into one.
    ///
    /// Returns a new table that contains all the bytes contained
    /// by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Subtracts from this table.
    ///
    /// Returns a new table that contains all the bytes contained
    /// by `self` but not by `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether the table is a subset of another.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & other.0 == self.0 && self.1 & other.1 == self.1
    }

    /// Checks whether the given byte is contained in the table.
    #[inline]
    #[must_use]
    pub const fn allows(self, x: u8) -> bool {
        let table = if x < 64 {
            self.0
        } else if x < 128 {
            self.1
        } else {
            0
        };
        table & 1u64.wrapping_shl(x as u32) != 0
    }

    /// Returns the number of bytes contained in the table.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones() + self.1.count_ones()
    }

    /// Checks whether the table is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0 && self.1 == 0
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: Table = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: Table = new(b"0123456789");

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`
///
/// Lowercase letters are accepted as well when decoding.
pub const HEXDIG: Table = DIGIT.or(new(b"ABCDEFabcdef"));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(new(b"-._~"));

/// Bytes that may appear unencoded in escaped text: `unreserved / "+"`.
///
/// `"%"` is not part of this table since it only appears as the
/// first byte of a percent-encoded octet.
pub const ESCAPED: Table = UNRESERVED.or(new(b"+"));

/// Checks whether a byte must be percent-encoded.
///
/// Returns `false` only for the 66 bytes of [`UNRESERVED`].
/// Space is not special-cased here: callers encode it as `+`.
#[inline]
#[must_use]
pub const fn should_escape(x: u8) -> bool {
    !UNRESERVED.allows(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_partition() {
        assert_eq!(UNRESERVED.len(), 66);
        let kept = (0..=255u8).filter(|&x| !should_escape(x)).count();
        assert_eq!(kept, 66);

        for x in b"-._~09AZaz".iter().copied() {
            assert!(!should_escape(x), "{x:#04x}");
        }
        for x in b" +%&=?/#!*'()".iter().copied() {
            assert!(should_escape(x), "{x:#04x}");
        }
        assert!((0x80..=0xff).all(should_escape));
        assert!(should_escape(0));
    }

    #[test]
    fn table_ops() {
        assert!(DIGIT.is_subset(HEXDIG));
        assert!(UNRESERVED.is_subset(ESCAPED));
        assert!(!ESCAPED.is_subset(UNRESERVED));
        assert_eq!(ESCAPED.sub(UNRESERVED), new(b"+"));
        assert!(ALPHA.sub(ALPHA).is_empty());
        assert_eq!(HEXDIG.len(), 22);
    }
}
