use super::{escape_to, escaped_len, EStr};
use crate::error::Error;
use alloc::{borrow::ToOwned, string::String};
use core::{borrow::Borrow, cmp::Ordering, hash, ops::Deref};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An escaped, growable string.
///
/// The borrowed counterpart of `EString` is [`EStr`].
///
/// # Comparison
///
/// `EString`s are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// Escape key-value pairs by hand (see [`escape_query`] for the usual way):
///
/// ```
/// use pct_args::pct_enc::EString;
///
/// let pairs = [("name", "Zoë"), ("q", "a&b c")];
/// let mut buf = EString::new();
/// let mut query = String::new();
/// for (k, v) in pairs {
///     if !query.is_empty() {
///         query.push('&');
///     }
///     buf.clear();
///     buf.push_escaped(k);
///     query.push_str(buf.as_str());
///     query.push('=');
///     buf.clear();
///     buf.push_escaped(v);
///     query.push_str(buf.as_str());
/// }
///
/// assert_eq!(query, "name=Zo%C3%AB&q=a%26b+c");
/// ```
///
/// [`escape_query`]: crate::escape_query
#[derive(Clone, Default)]
pub struct EString {
    pub(crate) buf: String,
}

impl Deref for EString {
    type Target = EStr;

    fn deref(&self) -> &EStr {
        EStr::new_validated(&self.buf)
    }
}

impl EString {
    pub(crate) fn new_validated(buf: String) -> Self {
        Self { buf }
    }

    /// Creates a new empty `EString`.
    #[must_use]
    pub fn new() -> Self {
        Self::new_validated(String::new())
    }

    /// Creates a new empty `EString` with at least the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new_validated(String::with_capacity(capacity))
    }

    /// Coerces to an `EStr` slice.
    #[must_use]
    pub fn as_estr(&self) -> &EStr {
        self
    }

    /// Returns this `EString`'s capacity, in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Escapes a byte sequence and appends the result onto the end of this `EString`.
    ///
    /// Exactly [`escaped_len(s)`](super::escaped_len) bytes are appended.
    pub fn push_escaped<S: AsRef<[u8]> + ?Sized>(&mut self, s: &S) {
        let s = s.as_ref();
        let len = escaped_len(s);
        self.buf.reserve(len);
        self.fill_escaped(s, len);
    }

    /// Like [`push_escaped`](Self::push_escaped), but returns an error instead
    /// of aborting when the memory for the escaped text cannot be reserved.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::OutOfMemory`] if reservation fails,
    /// in which case this `EString` is left unchanged.
    ///
    /// [`ErrorKind::OutOfMemory`]: crate::ErrorKind::OutOfMemory
    pub fn try_push_escaped<S: AsRef<[u8]> + ?Sized>(&mut self, s: &S) -> Result<(), Error> {
        let s = s.as_ref();
        let len = escaped_len(s);
        self.buf
            .try_reserve_exact(len)
            .map_err(|_| Error::out_of_memory(len))?;
        self.fill_escaped(s, len);
        Ok(())
    }

    fn fill_escaped(&mut self, s: &[u8], len: usize) {
        // SAFETY: `escape_to` only writes ASCII bytes.
        let vec = unsafe { self.buf.as_mut_vec() };
        let start = vec.len();
        vec.resize(start + len, 0);
        let written = escape_to(s, &mut vec[start..]);
        debug_assert_eq!(written, len);
    }

    /// Appends an `EStr` slice onto the end of this `EString`.
    pub fn push_estr(&mut self, s: &EStr) {
        self.buf.push_str(s.as_str());
    }

    /// Truncates this `EString`, removing all contents.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Consumes this `EString` and yields the underlying `String`.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl AsRef<EStr> for EString {
    fn as_ref(&self) -> &EStr {
        self
    }
}

impl AsRef<str> for EString {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

impl AsRef<[u8]> for EString {
    fn as_ref(&self) -> &[u8] {
        self.buf.as_bytes()
    }
}

impl Borrow<EStr> for EString {
    fn borrow(&self) -> &EStr {
        self
    }
}

impl From<&EStr> for EString {
    fn from(s: &EStr) -> Self {
        s.to_owned()
    }
}

impl From<EString> for String {
    fn from(s: EString) -> Self {
        s.buf
    }
}

impl PartialEq for EString {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl PartialEq<EStr> for EString {
    fn eq(&self, other: &EStr) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<EString> for EStr {
    fn eq(&self, other: &EString) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<str> for EString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<EString> for str {
    fn eq(&self, other: &EString) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<&str> for EString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<EString> for &str {
    fn eq(&self, other: &EString) -> bool {
        *self == other.as_str()
    }
}

impl Eq for EString {}

impl hash::Hash for EString {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.buf.hash(state);
    }
}

impl PartialOrd for EString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.buf.cmp(&other.buf)
    }
}

#[cfg(feature = "serde")]
impl Serialize for EStr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl Serialize for EString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for &'de EStr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        EStr::validate(s)
            .map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as escaped text: {e}")))
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for EString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match EStr::validate(&s) {
            Ok(_) => Ok(Self::new_validated(s)),
            Err(e) => Err(de::Error::custom(format_args!(
                "failed to parse {s:?} as escaped text: {e}"
            ))),
        }
    }
}
