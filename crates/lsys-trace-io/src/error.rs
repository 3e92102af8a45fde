// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use lsys_core::ValidationError;
use thiserror::Error;

/// Failures while writing or reading persisted traces.
#[derive(Debug, Error)]
pub enum TraceIoError {
    /// Underlying filesystem or stream failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Blob does not start with the `LSTR` magic.
    #[error("bad trace magic")]
    BadMagic,
    /// Blob was written by an unknown format version.
    #[error("unsupported trace version: {0}")]
    UnsupportedVersion(u16),
    /// Header flags or reserved bytes are not zero.
    #[error("trace header {0} must be zero")]
    NonZeroHeader(&'static str),
    /// Payload frame exceeds the size limit.
    #[error("trace payload too large: {0} bytes")]
    FrameTooLarge(usize),
    /// Payload bytes do not hash to the digest stored in the header.
    #[error("trace digest mismatch: header {expected}, payload {computed}")]
    DigestMismatch {
        /// Hex digest stored in the header.
        expected: String,
        /// Hex digest of the payload actually read.
        computed: String,
    },
    /// CBOR encoding failed.
    #[error("encode error: {0}")]
    Encode(String),
    /// CBOR decoding failed.
    #[error("decode error: {0}")]
    Decode(String),
    /// The stored rule table no longer validates.
    #[error("stored rules are invalid: {0}")]
    Rules(#[from] ValidationError),
    /// The stored mode name is unknown.
    #[error("stored mode is invalid: {0}")]
    Mode(#[from] lsys_core::ParseModeError),
    /// A stored trace has no generations.
    #[error("trace has no generations")]
    EmptyTrace,
    /// A generation contains a line break and cannot go into a line listing.
    #[error("generation {0} contains a line break")]
    LineBreak(usize),
    /// A rule listing line has no `-->` separator.
    #[error("rule listing line {line} is malformed: {text:?}")]
    MalformedRuleLine {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// The file stamp could not be formatted.
    #[error("timestamp error: {0}")]
    Stamp(String),
}
