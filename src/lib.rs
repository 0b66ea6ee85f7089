#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]

//! A percent-encoding codec for URL query strings and `application/x-www-form-urlencoded`
//! argument lists.
//!
//! Bytes of the [unreserved] set `[-._~0-9A-Za-z]` are kept as is, a space is
//! written as `'+'`, and every other byte is percent-encoded with uppercase
//! hexadecimal digits. Decoding reverses this, so that for any byte sequence `s`:
//!
//! ```
//! # let s = b"any \x00 bytes&=%+";
//! let escaped = pct_args::escape(s)?;
//! assert_eq!(pct_args::unescape(&escaped)?, s);
//! # Ok::<_, pct_args::Error>(())
//! ```
//!
//! Argument lists are ordered pairs of a key and an optional value, where an
//! absent value (`"k"`) is distinct from an empty one (`"k="`):
//!
//! ```
//! use pct_args::{escape_query, escape_url, Args};
//!
//! let pairs = [("q", Some("rust & C")), ("page", Some("2")), ("raw", None)];
//!
//! let url = escape_url(Some("https://example.com"), Some("search"), &pairs)?;
//! assert_eq!(url, "https://example.com/search?q=rust+%26+C&page=2&raw");
//!
//! let query = escape_query(&pairs)?;
//! assert_eq!(query, "?q=rust+%26+C&page=2&raw");
//! assert_eq!(Args::parse(&query)?, pairs);
//! # Ok::<_, pct_args::Error>(())
//! ```
//!
//! Lower-level, allocation-free building blocks are in [`pct_enc`].
//!
//! # Malformed input
//!
//! Decoding is tolerant by default: input is decoded up to its first malformed
//! percent-encoded octet (a `'%'` not followed by two hexadecimal digits) and
//! the rest is silently dropped. The `*_strict` variants report such octets
//! as errors instead.
//!
//! # Feature flags
//!
//! - `std` (default): Enables `std` support. This includes [`Error`] implementations.
//!   The crate is `no_std` with `alloc` otherwise.
//!
//! - `serde`: Enables [`serde`] support for [`EStr`], [`EString`] and [`Args`].
//!   `Args` is (de)serialized as its form encoding, as produced by [`Args::to_form`].
//!
//! [unreserved]: pct_enc::table::UNRESERVED
//! [`Error`]: std::error::Error
//! [`EStr`]: pct_enc::EStr
//! [`EString`]: pct_enc::EString
//! [`serde`]: https://docs.rs/serde

extern crate alloc;

mod args;
mod error;
mod fmt;
pub mod pct_enc;
mod url;

pub use args::{Args, Iter};
pub use error::{Error, ErrorKind};
pub use url::Pair;

use alloc::{string::String, vec::Vec};
use pct_enc::{unescapable_len, unescape_to, unescaped_len, validate_escapes, EString};
use url::Lead;

/// The content type of a form body produced by [`escape_form`].
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Escapes a byte sequence.
///
/// # Errors
///
/// Returns `Err` if the memory for the output cannot be reserved.
///
/// # Examples
///
/// ```
/// assert_eq!(pct_args::escape("a b")?, "a+b");
/// assert_eq!(pct_args::escape("100%")?, "100%25");
/// assert_eq!(pct_args::escape("~user/é")?, "~user%2F%C3%A9");
/// # Ok::<_, pct_args::Error>(())
/// ```
pub fn escape<S: AsRef<[u8]> + ?Sized>(s: &S) -> Result<EString, Error> {
    let mut buf = EString::new();
    buf.try_push_escaped(s)?;
    Ok(buf)
}

fn unescape_with(s: &[u8], strict: bool) -> Result<Vec<u8>, Error> {
    if strict {
        validate_escapes(s)?;
    } else {
        let valid = unescapable_len(s);
        if valid < s.len() {
            tracing::debug!(index = valid, "ignoring malformed percent-encoded suffix");
        }
    }

    let len = unescaped_len(s);
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::out_of_memory(len))?;
    buf.resize(len, 0);
    unescape_to(s, &mut buf);
    Ok(buf)
}

/// Unescapes a byte sequence.
///
/// The input is decoded up to its first malformed percent-encoded octet,
/// and the rest is ignored.
///
/// # Errors
///
/// Returns `Err` if the memory for the output cannot be reserved.
///
/// # Examples
///
/// ```
/// assert_eq!(pct_args::unescape("a+b")?, b"a b");
/// assert_eq!(pct_args::unescape("100%25")?, b"100%");
/// assert_eq!(pct_args::unescape("ab%2")?, b"ab");
/// # Ok::<_, pct_args::Error>(())
/// ```
pub fn unescape<S: AsRef<[u8]> + ?Sized>(s: &S) -> Result<Vec<u8>, Error> {
    unescape_with(s.as_ref(), false)
}

/// Unescapes a byte sequence, rejecting malformed percent-encoded octets.
///
/// # Errors
///
/// Returns `Err` with [`ErrorKind::InvalidOctet`] and the index of the first
/// malformed octet, or with [`ErrorKind::OutOfMemory`] if the memory for the
/// output cannot be reserved.
///
/// # Examples
///
/// ```
/// use pct_args::ErrorKind;
///
/// assert_eq!(pct_args::unescape_strict("a%20b")?, b"a b");
///
/// let e = pct_args::unescape_strict("ab%2").unwrap_err();
/// assert_eq!(e.kind(), ErrorKind::InvalidOctet);
/// assert_eq!(e.index(), 2);
/// # Ok::<_, pct_args::Error>(())
/// ```
pub fn unescape_strict<S: AsRef<[u8]> + ?Sized>(s: &S) -> Result<Vec<u8>, Error> {
    unescape_with(s.as_ref(), true)
}

fn pair<K, V>((key, value): &(K, Option<V>)) -> Pair<'_>
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    (key.as_ref(), value.as_ref().map(AsRef::as_ref))
}

/// Builds a URL from a base, a path, and an argument list.
///
/// The parts are joined as follows:
///
/// 1. `base` is copied verbatim.
/// 2. If `base` is non-empty and does not end with `'/'`, and `path`
///    is given and does not start with `'/'`, a `'/'` is inserted.
/// 3. `path` is copied verbatim.
/// 4. Each pair is preceded by a separator: `'?'` for the first pair,
///    unless `base` or `path` already contains a `'?'`, and `'&'` otherwise.
///    The pair is written as its escaped key, followed by `'='` and its
///    escaped value if the value is present.
///
/// The output is allocated once with its exact length.
///
/// `base` and `path` are string slices, so they must be UTF-8. They are
/// copied without any escaping: a base or path that is not yet a valid
/// URL piece has to be escaped by the caller, for example with [`escape`].
///
/// # Errors
///
/// Returns `Err` if the memory for the output cannot be reserved.
///
/// # Examples
///
/// ```
/// use pct_args::escape_url;
///
/// let args = [("grant_type", Some("refresh_token")), ("scope", Some("a b"))];
/// assert_eq!(
///     escape_url(Some("https://accounts.example.com"), Some("api/token"), &args)?,
///     "https://accounts.example.com/api/token?grant_type=refresh_token&scope=a+b"
/// );
///
/// let args = [("limit", Some("10"))];
/// assert_eq!(
///     escape_url(Some("https://api.example.com/v1/me?market=US"), None, &args)?,
///     "https://api.example.com/v1/me?market=US&limit=10"
/// );
/// # Ok::<_, pct_args::Error>(())
/// ```
pub fn escape_url<K, V>(
    base: Option<&str>,
    path: Option<&str>,
    args: &[(K, Option<V>)],
) -> Result<String, Error>
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    url::assemble(base, path, args.iter().map(pair), Lead::Query)
}

/// Builds a query string from an argument list, such as `"?a=1&b"`.
///
/// This is [`escape_url`] with neither base nor path.
/// An empty list yields an empty string.
///
/// # Errors
///
/// Returns `Err` if the memory for the output cannot be reserved.
pub fn escape_query<K, V>(args: &[(K, Option<V>)]) -> Result<String, Error>
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    escape_url(None, None, args)
}

/// Builds a form body from an argument list, such as `"a=1&b"`.
///
/// This is [`escape_query`] without the leading `'?'`, suitable
/// as a request body of type [`FORM_CONTENT_TYPE`].
///
/// # Errors
///
/// Returns `Err` if the memory for the output cannot be reserved.
///
/// # Examples
///
/// ```
/// let body = pct_args::escape_form(&[("user", Some("a@b.c")), ("remember", None)])?;
/// assert_eq!(body, "user=a%40b.c&remember");
/// # Ok::<_, pct_args::Error>(())
/// ```
pub fn escape_form<K, V>(args: &[(K, Option<V>)]) -> Result<String, Error>
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    url::assemble(None, None, args.iter().map(pair), Lead::Form)
}
