use crate::{
    error::{Error, ErrorKind},
    pct_enc::{EStr, EString},
    Args,
};
use alloc::string::String;
use core::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidOctet => {
                write!(f, "invalid percent-encoded octet at index {}", self.index)
            }
            ErrorKind::OutOfMemory => {
                write!(f, "failed to reserve {} bytes of memory", self.index)
            }
        }
    }
}

impl fmt::Debug for EStr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EStr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for EString {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EString {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// Shows keys and values as strings, replacing invalid UTF-8.
impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lossy = |x: &[u8]| String::from_utf8_lossy(x).into_owned();
        f.debug_list()
            .entries(self.iter().map(|(k, v)| (lossy(k), v.map(lossy))))
            .finish()
    }
}
