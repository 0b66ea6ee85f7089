//! Ordered argument lists.

use crate::{
    error::Error,
    pct_enc::{unescapable_len, unescape_to, unescaped_len, validate_escapes},
    url::{self, Lead, Pair},
};
use alloc::{string::String, vec::Vec};
use core::{iter::FusedIterator, ops::Range, slice};

#[cfg(feature = "serde")]
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

/// The end offsets of a pair in the byte arena.
///
/// The key of a pair starts where the previous pair ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct End {
    key: usize,
    value: Option<usize>,
}

impl End {
    fn pair_end(self) -> usize {
        self.value.unwrap_or(self.key)
    }
}

/// An ordered list of arguments, each a key with an optional value.
///
/// A value is *absent* when the key is not followed by `'='` in the
/// escaped form, which is distinct from an *empty* value (`"k="`).
///
/// All keys and values are stored back to back in one byte buffer,
/// so a parsed list costs two allocations regardless of its length.
///
/// # Examples
///
/// ```
/// use pct_args::Args;
///
/// let args = Args::parse("name=J%C3%B6rg+M&debug&empty=")?;
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get("name"), Some(Some("Jörg M".as_bytes())));
/// assert_eq!(args.get("debug"), Some(None));
/// assert_eq!(args.get("empty"), Some(Some(&b""[..])));
/// assert_eq!(args.get("missing"), None);
///
/// assert_eq!(args.to_form()?, "name=J%C3%B6rg+M&debug&empty=");
/// # Ok::<_, pct_args::Error>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Args {
    buf: Vec<u8>,
    ends: Vec<End>,
}

/// Splits escaped text into raw pairs of key and optional value spans.
///
/// Pairs are separated by `'&'`; the key ends at the first `'='`
/// of a pair, and the value runs to the end of the pair.
#[derive(Clone)]
struct RawPairs<'a> {
    s: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> RawPairs<'a> {
    /// Splits `s`, which holds at least one pair if `after_mark` is set
    /// (the remainder of a query following its `'?'`), even when empty.
    fn new(s: &'a [u8], after_mark: bool) -> Self {
        Self {
            s,
            pos: 0,
            done: s.is_empty() && !after_mark,
        }
    }

    fn position_from(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        self.s[from..]
            .iter()
            .position(|&x| pred(x))
            .map_or(self.s.len(), |i| from + i)
    }
}

impl Iterator for RawPairs<'_> {
    type Item = (Range<usize>, Option<Range<usize>>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let key_end = self.position_from(start, |x| x == b'&' || x == b'=');
        let (value, end) = if self.s.get(key_end) == Some(&b'=') {
            let value_end = self.position_from(key_end + 1, |x| x == b'&');
            (Some(key_end + 1..value_end), value_end)
        } else {
            (None, key_end)
        };

        if end < self.s.len() {
            self.pos = end + 1;
        } else {
            self.done = true;
        }
        Some((start..key_end, value))
    }
}

impl Args {
    /// Creates an empty `Args`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn try_with_capacity(pairs: usize, bytes: usize) -> Result<Self, Error> {
        let mut args = Self::new();
        args.ends
            .try_reserve_exact(pairs)
            .map_err(|_| Error::out_of_memory(pairs * core::mem::size_of::<End>()))?;
        args.buf
            .try_reserve_exact(bytes)
            .map_err(|_| Error::out_of_memory(bytes))?;
        Ok(args)
    }

    /// Parses an escaped argument list such as `"k1=v1&k2&k3="`.
    ///
    /// A single leading `'?'` is skipped, so the output of
    /// [`escape_query`](crate::escape_query) parses back to its input.
    ///
    /// Pairs are separated by `'&'`, and empty pairs are kept as pairs with
    /// an empty key and an absent value. A key is separated from its value by
    /// the first `'='` of the pair. An empty input yields an empty list, while
    /// `"?"` yields a single empty pair.
    ///
    /// Each key and value is unescaped up to its first malformed
    /// percent-encoded octet; whatever follows in that key or value is
    /// dropped. Use [`parse_strict`](Self::parse_strict) to reject such input.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the memory for the list cannot be reserved.
    pub fn parse<S: AsRef<[u8]> + ?Sized>(s: &S) -> Result<Self, Error> {
        Self::parse_with(s.as_ref(), false)
    }

    /// Parses an escaped argument list, rejecting malformed percent-encoded octets.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidOctet`] and the index of the first
    /// malformed octet in `s`, or with [`ErrorKind::OutOfMemory`] if the memory
    /// for the list cannot be reserved.
    ///
    /// [`ErrorKind::InvalidOctet`]: crate::ErrorKind::InvalidOctet
    /// [`ErrorKind::OutOfMemory`]: crate::ErrorKind::OutOfMemory
    pub fn parse_strict<S: AsRef<[u8]> + ?Sized>(s: &S) -> Result<Self, Error> {
        Self::parse_with(s.as_ref(), true)
    }

    fn parse_with(s: &[u8], strict: bool) -> Result<Self, Error> {
        let (lead, s) = match s {
            [b'?', rem @ ..] => (1, rem),
            _ => (0, s),
        };

        let (mut pairs, mut bytes) = (0, 0);
        for (key, value) in RawPairs::new(s, lead > 0) {
            bytes += unescaped_len(&s[key]);
            if let Some(value) = value {
                bytes += unescaped_len(&s[value]);
            }
            pairs += 1;
        }
        tracing::trace!(pairs, bytes, "parsing argument list");

        let mut args = Self::try_with_capacity(pairs, bytes)?;
        let unescape = |buf: &mut Vec<u8>, span: Range<usize>| -> Result<usize, Error> {
            let span_bytes = &s[span.clone()];
            if strict {
                validate_escapes(span_bytes).map_err(|e| e.offset(lead + span.start))?;
            } else {
                let valid = unescapable_len(span_bytes);
                if valid < span_bytes.len() {
                    tracing::debug!(
                        index = lead + span.start + valid,
                        "ignoring malformed percent-encoded suffix"
                    );
                }
            }
            Ok(push_unescaped(buf, span_bytes))
        };

        for (key, value) in RawPairs::new(s, lead > 0) {
            let key = unescape(&mut args.buf, key)?;
            let value = match value {
                Some(value) => Some(unescape(&mut args.buf, value)?),
                None => None,
            };
            args.ends.push(End { key, value });
        }
        debug_assert_eq!(args.buf.len(), bytes);
        Ok(args)
    }

    /// Returns the number of pairs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Checks whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Returns the pair at the given position.
    #[must_use]
    pub fn get_index(&self, i: usize) -> Option<Pair<'_>> {
        let end = *self.ends.get(i)?;
        let start = match i {
            0 => 0,
            _ => self.ends[i - 1].pair_end(),
        };
        Some(split(&self.buf, start, end))
    }

    /// Returns the value of the first pair with the given key.
    ///
    /// Returns `None` if no pair has the key, and `Some(None)`
    /// if the first pair with the key has an absent value.
    #[must_use]
    pub fn get<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<Option<&[u8]>> {
        let key = key.as_ref();
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Checks whether any pair has the given key.
    #[must_use]
    pub fn contains_key<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns an iterator over the pairs in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buf: &self.buf,
            ends: self.ends.iter(),
            start: 0,
        }
    }

    /// Appends a pair onto the end of the list.
    pub fn push<K, V>(&mut self, key: K, value: Option<V>)
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.buf.extend_from_slice(key.as_ref());
        let key = self.buf.len();
        let value = value.map(|value| {
            self.buf.extend_from_slice(value.as_ref());
            self.buf.len()
        });
        self.ends.push(End { key, value });
    }

    /// Removes all pairs from the list.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.ends.clear();
    }

    /// Escapes the list into a query string, such as `"?a=1&b"`.
    ///
    /// An empty list yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the memory for the output cannot be reserved.
    pub fn to_query(&self) -> Result<String, Error> {
        url::assemble(None, None, self.iter(), Lead::Query)
    }

    /// Escapes the list into a form body, such as `"a=1&b"`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the memory for the output cannot be reserved.
    pub fn to_form(&self) -> Result<String, Error> {
        url::assemble(None, None, self.iter(), Lead::Form)
    }

    /// Escapes the list into a URL with the given base and path.
    ///
    /// See [`escape_url`](crate::escape_url) for how the parts are joined.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the memory for the output cannot be reserved.
    pub fn to_url(&self, base: Option<&str>, path: Option<&str>) -> Result<String, Error> {
        url::assemble(base, path, self.iter(), Lead::Query)
    }
}

fn push_unescaped(buf: &mut Vec<u8>, s: &[u8]) -> usize {
    let start = buf.len();
    buf.resize(start + unescaped_len(s), 0);
    unescape_to(s, &mut buf[start..]);
    buf.len()
}

fn split(buf: &[u8], start: usize, end: End) -> Pair<'_> {
    let key = &buf[start..end.key];
    let value = end.value.map(|value| &buf[end.key..value]);
    (key, value)
}

/// An iterator over the pairs of an [`Args`].
///
/// This struct is created by [`Args::iter`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a> {
    buf: &'a [u8],
    ends: slice::Iter<'a, End>,
    start: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Pair<'a>;

    fn next(&mut self) -> Option<Pair<'a>> {
        let end = *self.ends.next()?;
        let pair = split(self.buf, self.start, end);
        self.start = end.pair_end();
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ends.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Args {
    type Item = Pair<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<K, V> Extend<(K, Option<V>)> for Args
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn extend<I: IntoIterator<Item = (K, Option<V>)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Args
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut args = Self::new();
        args.extend(iter);
        args
    }
}

impl<K, V> PartialEq<[(K, Option<V>)]> for Args
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn eq(&self, other: &[(K, Option<V>)]) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|((k1, v1), (k2, v2))| {
                k1 == k2.as_ref() && v1 == v2.as_ref().map(AsRef::as_ref)
            })
    }
}

impl<K, V, const N: usize> PartialEq<[(K, Option<V>); N]> for Args
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn eq(&self, other: &[(K, Option<V>); N]) -> bool {
        *self == other[..]
    }
}

impl<K, V> PartialEq<Vec<(K, Option<V>)>> for Args
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn eq(&self, other: &Vec<(K, Option<V>)>) -> bool {
        *self == other[..]
    }
}

#[cfg(feature = "serde")]
impl Serialize for Args {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let form = self.to_form().map_err(ser::Error::custom)?;
        serializer.serialize_str(&form)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Args {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Args::parse_strict(&s).map_err(|e| {
            de::Error::custom(format_args!("failed to parse {s:?} as argument list: {e}"))
        })
    }
}
