//! Percent-encoding utilities.
//!
//! Escaped text consists of the [unreserved] bytes, `'+'` standing for a space,
//! and percent-encoded octets `"%XX"` standing for any other byte.
//!
//! The functions in this module follow a two-pass protocol: the `*_len`
//! functions compute the exact output length of an operation without writing
//! anything, and the `*_to` functions write into a caller-supplied buffer of
//! any capacity, always returning the length they *would* have written.
//!
//! [unreserved]: table::UNRESERVED

mod estring;
pub mod table;

pub use estring::EString;
pub use table::{should_escape, Table};

use crate::error::{Error, ErrorKind};
use core::{cmp::Ordering, hash, iter::FusedIterator};
use ref_cast::{ref_cast_custom, RefCastCustom};

use alloc::{
    borrow::{Cow, ToOwned},
    string::String,
    vec::Vec,
};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Returns the uppercase hexadecimal digit for the low 4 bits of `n`.
///
/// Higher bits are ignored, so `nibble_to_hex(0x1a)` is `b'A'`.
///
/// # Examples
///
/// ```
/// use pct_args::pct_enc::nibble_to_hex;
///
/// assert_eq!(nibble_to_hex(9), b'9');
/// assert_eq!(nibble_to_hex(12), b'C');
/// assert_eq!(nibble_to_hex(0xf3), b'3');
/// ```
#[inline]
#[must_use]
pub const fn nibble_to_hex(n: u8) -> u8 {
    HEX_DIGITS[(n & 0xf) as usize]
}

/// Returns the value of a hexadecimal digit, or `None` if `c` is not in `[0-9A-Fa-f]`.
#[inline]
#[must_use]
pub const fn hex_to_nibble(c: u8) -> Option<u8> {
    match OCTET_TABLE_LO[c as usize] {
        0xff => None,
        n => Some(n),
    }
}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    OCTET_TABLE_LO[hi as usize] | OCTET_TABLE_LO[lo as usize] != 0xff
}

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// Returns the length of `s` once escaped.
///
/// Spaces and unreserved bytes count 1, every other byte counts 3.
#[must_use]
pub fn escaped_len(s: &[u8]) -> usize {
    s.iter()
        .map(|&x| if x == b' ' || !should_escape(x) { 1 } else { 3 })
        .sum()
}

/// Returns the length of the longest prefix of `s` that can be unescaped.
///
/// The prefix ends before the first `'%'` that is not followed by
/// two hexadecimal digits, including a `'%'` truncated by the end of `s`.
#[must_use]
pub fn unescapable_len(s: &[u8]) -> usize {
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            if i + 2 >= s.len() || !is_hexdig_pair(s[i + 1], s[i + 2]) {
                break;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    i
}

/// Returns the length of `s` once unescaped.
///
/// Only the [unescapable prefix](unescapable_len) of `s` is taken into account.
#[must_use]
pub fn unescaped_len(s: &[u8]) -> usize {
    let s = &s[..unescapable_len(s)];
    let (mut i, mut r) = (0, 0);
    while i < s.len() {
        i += if s[i] == b'%' { 3 } else { 1 };
        r += 1;
    }
    r
}

/// A bounded writer that counts every byte pushed to it.
struct Sink<'a> {
    out: &'a mut [u8],
    len: usize,
}

impl<'a> Sink<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        Self { out, len: 0 }
    }

    #[inline]
    fn push(&mut self, x: u8) {
        if let Some(slot) = self.out.get_mut(self.len) {
            *slot = x;
        }
        self.len += 1;
    }

    /// Appends a nul terminator if there is room for it, returning the
    /// length written (or required), terminator excluded.
    fn finish(self) -> usize {
        if let Some(slot) = self.out.get_mut(self.len) {
            *slot = 0;
        }
        self.len
    }
}

/// Escapes `s` into `out`, returning the length of the escaped text.
///
/// At most `out.len()` bytes are written. The returned length does not depend
/// on the capacity of `out`, so an empty buffer can be used to query the
/// required length first. When `out` has room for one more byte after
/// the escaped text, a nul terminator is written there.
///
/// A space is written as `'+'`, an unreserved byte as itself, and
/// any other byte as a percent-encoded octet with uppercase digits.
///
/// # Examples
///
/// ```
/// use pct_args::pct_enc::escape_to;
///
/// let len = escape_to(b"a b&c", &mut []);
/// assert_eq!(len, 7);
///
/// let mut buf = [0; 8];
/// assert_eq!(escape_to(b"a b&c", &mut buf), 7);
/// assert_eq!(&buf, b"a+b%26c\0");
/// ```
pub fn escape_to(s: &[u8], out: &mut [u8]) -> usize {
    let mut sink = Sink::new(out);
    for &x in s {
        if x == b' ' {
            sink.push(b'+');
        } else if should_escape(x) {
            sink.push(b'%');
            sink.push(nibble_to_hex(x >> 4));
            sink.push(nibble_to_hex(x));
        } else {
            sink.push(x);
        }
    }
    sink.finish()
}

/// Unescapes `s` into `out`, returning the length of the unescaped bytes.
///
/// The capacity contract is the same as [`escape_to`]'s.
///
/// Only the [unescapable prefix](unescapable_len) of `s` is decoded and the
/// rest is ignored. A `'+'` is decoded as a space, a percent-encoded octet as
/// the byte it denotes, and any other byte as itself.
pub fn unescape_to(s: &[u8], out: &mut [u8]) -> usize {
    let s = &s[..unescapable_len(s)];
    let mut sink = Sink::new(out);
    let mut i = 0;
    while i < s.len() {
        match s[i] {
            b'%' => {
                sink.push(decode_octet(s[i + 1], s[i + 2]));
                i += 3;
            }
            b'+' => {
                sink.push(b' ');
                i += 1;
            }
            x => {
                sink.push(x);
                i += 1;
            }
        }
    }
    sink.finish()
}

/// Checks that `s` is entirely unescapable, returning the index
/// of the first invalid percent-encoded octet otherwise.
pub(crate) fn validate_escapes(s: &[u8]) -> Result<(), Error> {
    let i = unescapable_len(s);
    if i < s.len() {
        Err(Error::new(i, ErrorKind::InvalidOctet))
    } else {
        Ok(())
    }
}

/// Escaped string slices.
///
/// The underlying bytes of an `EStr` slice are drawn only from the [unreserved]
/// bytes, `'+'`, and percent-encoded octets. The owned counterpart of `EStr`
/// is [`EString`].
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison,
/// so `"%7e"` and `"~"` are not equal.
///
/// [unreserved]: table::UNRESERVED
///
/// # Examples
///
/// ```
/// use pct_args::pct_enc::EStr;
///
/// let s = EStr::new("caf%C3%A9+au+lait").unwrap();
/// assert_eq!(s.decode().to_string_lossy(), "café au lait");
///
/// assert!(EStr::new("a=b").is_none());
/// assert!(EStr::new("50%").is_none());
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr {
    inner: str,
}

impl EStr {
    /// Converts a string slice to an `EStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to an `EStr` slice, returning `None` if the
    /// string is not escaped text.
    #[must_use]
    pub fn new(s: &str) -> Option<&Self> {
        Self::validate(s).ok()
    }

    /// Converts a string slice to an `EStr` slice.
    ///
    /// # Panics
    ///
    /// Panics if the string is not escaped text.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly escaped string"),
        }
    }

    /// Converts a string slice to an `EStr` slice, reporting where it is
    /// not escaped text.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidOctet`] pointing at the first byte
    /// that is neither allowed unencoded nor the start of a valid octet.
    pub fn validate(s: &str) -> Result<&Self, Error> {
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let x = bytes[i];
            if x == b'%' {
                if i + 2 >= bytes.len() || !is_hexdig_pair(bytes[i + 1], bytes[i + 2]) {
                    return Err(Error::new(i, ErrorKind::InvalidOctet));
                }
                i += 3;
            } else if table::ESCAPED.allows(x) {
                i += 1;
            } else {
                return Err(Error::new(i, ErrorKind::InvalidOctet));
            }
        }
        Ok(Self::new_validated(s))
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the length of the `EStr` slice once decoded.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        unescaped_len(self.inner.as_bytes())
    }

    /// Returns an iterator used to decode the `EStr` slice.
    ///
    /// Unlike the generic percent-decoding of URI components,
    /// `'+'` **is** decoded as a space.
    pub fn decode(&self) -> Decode<'_> {
        Decode {
            source: self.inner.as_bytes(),
        }
    }
}

impl AsRef<str> for EStr {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<[u8]> for EStr {
    fn as_ref(&self) -> &[u8] {
        self.inner.as_bytes()
    }
}

impl PartialEq for EStr {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialEq<str> for EStr {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl PartialEq<EStr> for str {
    fn eq(&self, other: &EStr) -> bool {
        self == &other.inner
    }
}

impl Eq for EStr {}

impl hash::Hash for EStr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for EStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Default for &EStr {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl ToOwned for EStr {
    type Owned = EString;

    fn to_owned(&self) -> EString {
        EString::new_validated(self.inner.to_owned())
    }
}

/// An iterator over the decoded bytes of an [`EStr`] slice.
///
/// This struct is created by [`EStr::decode`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a [u8],
}

impl<'a> Iterator for Decode<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let (x, len) = match *self.source {
            [] => return None,
            [b'%', hi, lo, ..] => (decode_octet(hi, lo), 3),
            [b'+', ..] => (b' ', 1),
            [x, ..] => (x, 1),
        };
        self.source = &self.source[len..];
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.source.len();
        ((len + 2) / 3, Some(len))
    }
}

impl FusedIterator for Decode<'_> {}

impl<'a> Decode<'a> {
    /// Decodes the slice to bytes.
    ///
    /// This method allocates only when the slice contains `'%'` or `'+'`.
    /// Unlike [`unescape`](crate::unescape), it does not report allocation
    /// failure and aborts like [`Vec`] does.
    #[must_use]
    pub fn to_bytes(self) -> Cow<'a, [u8]> {
        if !self.source.iter().any(|&x| x == b'%' || x == b'+') {
            return Cow::Borrowed(self.source);
        }
        let mut buf = Vec::with_capacity(unescaped_len(self.source));
        buf.extend(self);
        Cow::Owned(buf)
    }

    /// Decodes the slice to a string, replacing any invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        match self.to_bytes() {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
            Cow::Owned(bytes) => Cow::Owned(match String::from_utf8(bytes) {
                Ok(s) => s,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conversion() {
        for n in 0..16 {
            let c = nibble_to_hex(n);
            assert!(c.is_ascii_digit() || c.is_ascii_uppercase());
            assert_eq!(hex_to_nibble(c), Some(n));
            assert_eq!(hex_to_nibble(c.to_ascii_lowercase()), Some(n));
        }
        assert_eq!(nibble_to_hex(0x10), b'0');
        assert_eq!(nibble_to_hex(0xff), b'F');
        assert_eq!(hex_to_nibble(b'g'), None);
        assert_eq!(hex_to_nibble(b'G'), None);
        assert_eq!(hex_to_nibble(b'%'), None);
        assert_eq!(hex_to_nibble(0xff), None);
    }

    #[test]
    fn lengths() {
        assert_eq!(escaped_len(b""), 0);
        assert_eq!(escaped_len(b"a b"), 3);
        assert_eq!(escaped_len(b"100%"), 6);
        assert_eq!(escaped_len("é".as_bytes()), 6);

        assert_eq!(unescapable_len(b"ab%2"), 2);
        assert_eq!(unescapable_len(b"ab%"), 2);
        assert_eq!(unescapable_len(b"ab%zz%20"), 2);
        assert_eq!(unescapable_len(b"%20%2f"), 6);

        assert_eq!(unescaped_len(b"ab%2"), 2);
        assert_eq!(unescaped_len(b"a+b%20c"), 5);
        assert_eq!(unescaped_len(b"%"), 0);
    }

    #[test]
    fn capacity_contract() {
        let mut buf = [0xaa; 4];
        assert_eq!(escape_to(b"%%", &mut buf), 6);
        assert_eq!(&buf, b"%25%");

        let mut buf = [0xaa; 7];
        assert_eq!(escape_to(b"%%", &mut buf), 6);
        assert_eq!(&buf, b"%25%25\0");

        let mut buf = [0xaa; 6];
        assert_eq!(escape_to(b"%%", &mut buf), 6);
        assert_eq!(&buf, b"%25%25");

        let mut buf = [0xaa; 3];
        assert_eq!(unescape_to(b"a+%41%4", &mut buf), 3);
        assert_eq!(&buf, b"a A");

        assert_eq!(unescape_to(b"a+%41%4", &mut []), 3);
    }

    #[test]
    fn decode_iter() {
        let s = EStr::new_or_panic("a+%7E%7e");
        assert!(s.decode().eq(*b"a ~~"));
        assert_eq!(s.decoded_len(), 4);
        assert!(matches!(s.decode().to_bytes(), Cow::Owned(_)));

        let s = EStr::new_or_panic("plain-text");
        assert!(matches!(s.decode().to_bytes(), Cow::Borrowed(b"plain-text")));
        assert_eq!(s.decode().to_string_lossy(), "plain-text");

        assert_eq!(EStr::new_or_panic("%FF").decode().to_string_lossy(), "\u{fffd}");
    }

    #[test]
    fn validate() {
        assert_eq!(
            EStr::validate("ab%2").unwrap_err(),
            Error::new(2, ErrorKind::InvalidOctet)
        );
        assert_eq!(
            EStr::validate("a b").unwrap_err(),
            Error::new(1, ErrorKind::InvalidOctet)
        );
        assert!(EStr::validate("").is_ok());
        assert_eq!(EStr::EMPTY, EStr::new_or_panic(""));
        assert_eq!(validate_escapes(b"a=%2G"), Err(Error::new(2, ErrorKind::InvalidOctet)));
        assert_eq!(validate_escapes(b"a=b c"), Ok(()));
    }
}
