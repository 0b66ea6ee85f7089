//! Assembly of URLs and query strings from argument lists.

use crate::{
    error::Error,
    pct_enc::{escape_to, escaped_len},
};
use alloc::{string::String, vec::Vec};

/// What precedes the first argument pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lead {
    /// `'?'`, or `'&'` if the base or path already contains a `'?'`.
    Query,
    /// Nothing, as in a form body.
    Form,
}

/// A borrowed argument pair of a key and an optional value.
pub type Pair<'a> = (&'a [u8], Option<&'a [u8]>);

fn needs_slash(base: &str, path: Option<&str>) -> bool {
    match path {
        Some(path) => !base.is_empty() && !base.ends_with('/') && !path.starts_with('/'),
        None => false,
    }
}

fn pairs_len<'a>(args: impl Iterator<Item = Pair<'a>>) -> (usize, usize) {
    args.fold((0, 0), |(len, n), (key, value)| {
        let mut len = len + 1 + escaped_len(key);
        if let Some(value) = value {
            len += 1 + escaped_len(value);
        }
        (len, n + 1)
    })
}

/// A preallocated output buffer filled from the front.
struct Cursor {
    buf: Vec<u8>,
    pos: usize,
}

impl Cursor {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_escaped(&mut self, bytes: &[u8]) {
        // Any terminator written past the escaped text is overwritten later.
        self.pos += escape_to(bytes, &mut self.buf[self.pos..]);
    }
}

/// Assembles `base`, `path` and the escaped argument pairs into one string.
///
/// The output is sized exactly in a first pass over `args`,
/// reserved at once, and filled in a second pass.
pub(crate) fn assemble<'a, I>(
    base: Option<&str>,
    path: Option<&str>,
    args: I,
    lead: Lead,
) -> Result<String, Error>
where
    I: Iterator<Item = Pair<'a>> + Clone,
{
    let base = base.unwrap_or_default();
    let slash = needs_slash(base, path);
    let path = path.unwrap_or_default();

    let (args_len, n) = pairs_len(args.clone());
    let mut len = base.len() + usize::from(slash) + path.len() + args_len;
    if lead == Lead::Form && n > 0 {
        len -= 1;
    }
    tracing::trace!(len, pairs = n, "assembling url");

    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::out_of_memory(len))?;
    buf.resize(len, 0);
    let mut cur = Cursor { buf, pos: 0 };

    cur.put(base.as_bytes());
    if slash {
        cur.put(b"/");
    }
    cur.put(path.as_bytes());

    let mut sep = match lead {
        Lead::Query if base.contains('?') || path.contains('?') => Some(b'&'),
        Lead::Query => Some(b'?'),
        Lead::Form => None,
    };
    for (key, value) in args {
        if let Some(sep) = sep {
            cur.put(&[sep]);
        }
        sep = Some(b'&');

        cur.put_escaped(key);
        if let Some(value) = value {
            cur.put(b"=");
            cur.put_escaped(value);
        }
    }
    debug_assert_eq!(cur.pos, len);

    // SAFETY: `base` and `path` are copied from string slices,
    // and everything else written is ASCII.
    Ok(unsafe { String::from_utf8_unchecked(cur.buf) })
}
