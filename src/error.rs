/// The kind of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete,
    /// or a byte that is not allowed in escaped text.
    ///
    /// The error index points to the offending byte, usually the percent
    /// character "%" of the octet.
    InvalidOctet,
    /// The memory for the output could not be reserved.
    ///
    /// The error index holds the number of bytes requested.
    OutOfMemory,
}

/// An error occurred when escaping or unescaping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    pub(crate) index: usize,
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub(crate) const fn new(index: usize, kind: ErrorKind) -> Self {
        Self { index, kind }
    }

    pub(crate) fn out_of_memory(requested: usize) -> Self {
        tracing::warn!(requested, "failed to reserve memory");
        Self::new(requested, ErrorKind::OutOfMemory)
    }

    /// Shifts the index of an [`ErrorKind::InvalidOctet`] error by `offset`.
    pub(crate) fn offset(self, offset: usize) -> Self {
        match self.kind {
            ErrorKind::InvalidOctet => Self::new(self.index + offset, self.kind),
            _ => self,
        }
    }

    /// Returns the kind of the error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the index of the offending byte in the input,
    /// or the number of bytes requested for [`ErrorKind::OutOfMemory`].
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
