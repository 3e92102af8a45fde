// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Binary trace blob (`.lstrace`).
//!
//! Format (v1):
//! Header (48 bytes):
//! - Magic: "LSTR" (4 bytes)
//! - Version: u16 LE (2 bytes) = 1
//! - Flags: u16 LE (2 bytes) = 0
//! - Digest: BLAKE3 of the payload bytes (32 bytes)
//! - Reserved: [u8; 8] (8 bytes) = 0
//!
//! Payload frame:
//! - Length: u32 LE (4 bytes)
//! - Payload: CBOR map `{ mode, rules: [{ pattern, replacement }], generations: [..] }`
use std::io::{Read, Write};

use lsys_core::{GrammarTrace, ReplacementMode, RuleSet};
use serde::{Deserialize, Serialize};

use crate::TraceIoError;

/// Magic bytes identifying a trace blob: "LSTR".
pub const BLOB_MAGIC: [u8; 4] = *b"LSTR";
/// Current blob format version.
pub const BLOB_VERSION: u16 = 1;
/// File extension used for trace blobs.
pub const BLOB_EXTENSION: &str = "lstrace";
/// Maximum accepted payload length (512 MiB).
pub const MAX_PAYLOAD_LEN: usize = 512 * 1024 * 1024;

#[derive(Serialize)]
struct PayloadRef<'a> {
    mode: &'a str,
    rules: Vec<RuleRef<'a>>,
    generations: Vec<&'a str>,
}

#[derive(Serialize)]
struct RuleRef<'a> {
    pattern: &'a str,
    replacement: &'a str,
}

#[derive(Deserialize)]
struct Payload {
    mode: String,
    rules: Vec<RuleEntry>,
    generations: Vec<String>,
}

#[derive(Deserialize)]
struct RuleEntry {
    pattern: String,
    replacement: String,
}

/// A trace reloaded from a blob together with the rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTrace {
    /// Stored generations.
    pub trace: GrammarTrace,
    /// Rule table recorded alongside the trace.
    pub rules: RuleSet,
    /// BLAKE3 digest of the payload, as stored in the header.
    pub digest: [u8; 32],
}

impl StoredTrace {
    /// Generation `n` (0-based) of the stored trace.
    pub fn generation(&self, n: usize) -> Option<&str> {
        self.trace.generation(n)
    }

    /// Hex rendering of [`StoredTrace::digest`].
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Serialises the payload without framing.
fn encode_payload(trace: &GrammarTrace, rules: &RuleSet) -> Result<Vec<u8>, TraceIoError> {
    let payload = PayloadRef {
        mode: rules.mode().as_str(),
        rules: rules
            .rules()
            .iter()
            .map(|r| RuleRef {
                pattern: r.pattern(),
                replacement: r.replacement(),
            })
            .collect(),
        generations: trace.iter().collect(),
    };
    let mut buf = Vec::new();
    ciborium::into_writer(&payload, &mut buf).map_err(|e| TraceIoError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Writes header and payload frame. Returns the payload digest.
pub fn write_trace<W: Write>(
    w: &mut W,
    trace: &GrammarTrace,
    rules: &RuleSet,
) -> Result<[u8; 32], TraceIoError> {
    let payload = encode_payload(trace, rules)?;
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(TraceIoError::FrameTooLarge(payload.len()));
    }
    let len = u32::try_from(payload.len()).map_err(|_| TraceIoError::FrameTooLarge(payload.len()))?;
    let digest: [u8; 32] = blake3::hash(&payload).into();

    w.write_all(&BLOB_MAGIC)?;
    w.write_all(&BLOB_VERSION.to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?;
    w.write_all(&digest)?;
    w.write_all(&[0u8; 8])?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(&payload)?;
    Ok(digest)
}

fn read_exact_arr<const N: usize, R: Read>(r: &mut R) -> std::io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Reads and verifies a blob, then rebuilds the trace and its rule set.
///
/// The stored rules are re-validated under the stored mode with
/// [`RuleSet::build`].
pub fn read_trace<R: Read>(r: &mut R) -> Result<StoredTrace, TraceIoError> {
    if read_exact_arr::<4, _>(r)? != BLOB_MAGIC {
        return Err(TraceIoError::BadMagic);
    }
    let version = u16::from_le_bytes(read_exact_arr::<2, _>(r)?);
    if version != BLOB_VERSION {
        return Err(TraceIoError::UnsupportedVersion(version));
    }
    if u16::from_le_bytes(read_exact_arr::<2, _>(r)?) != 0 {
        return Err(TraceIoError::NonZeroHeader("flags"));
    }
    let digest = read_exact_arr::<32, _>(r)?;
    if read_exact_arr::<8, _>(r)? != [0u8; 8] {
        return Err(TraceIoError::NonZeroHeader("reserved bytes"));
    }

    let len = u32::from_le_bytes(read_exact_arr::<4, _>(r)?) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(TraceIoError::FrameTooLarge(len));
    }
    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)?;

    let computed: [u8; 32] = blake3::hash(&payload).into();
    if computed != digest {
        return Err(TraceIoError::DigestMismatch {
            expected: hex::encode(digest),
            computed: hex::encode(computed),
        });
    }

    let decoded: Payload =
        ciborium::from_reader(payload.as_slice()).map_err(|e| TraceIoError::Decode(e.to_string()))?;
    let mode: ReplacementMode = decoded.mode.parse()?;
    let rules = RuleSet::from_pairs(
        decoded.rules.into_iter().map(|r| (r.pattern, r.replacement)),
        mode,
    )?;
    let trace = GrammarTrace::from_generations(decoded.generations).ok_or(TraceIoError::EmptyTrace)?;
    tracing::debug!(
        generations = trace.len(),
        digest = %hex::encode(digest),
        "trace blob loaded"
    );
    Ok(StoredTrace {
        trace,
        rules,
        digest,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lsys_core::RewriteEngine;

    fn sample() -> (GrammarTrace, RuleSet) {
        let rules = RuleSet::from_pairs(
            [("111", "2"), ("110", "3"), ("100", "4")],
            ReplacementMode::ContinuousSkip,
        )
        .unwrap();
        let trace = RewriteEngine::run(&rules, "001110110010011110010011110000", 2);
        (trace, rules)
    }

    #[test]
    fn header_layout_is_stable() {
        let (trace, rules) = sample();
        let mut buf = Vec::new();
        let digest = write_trace(&mut buf, &trace, &rules).unwrap();
        assert_eq!(&buf[..4], b"LSTR");
        assert_eq!(&buf[4..6], &1u16.to_le_bytes());
        assert_eq!(&buf[6..8], &[0, 0]);
        assert_eq!(&buf[8..40], &digest);
        assert_eq!(&buf[40..48], &[0u8; 8]);
        let len = u32::from_le_bytes(buf[48..52].try_into().unwrap()) as usize;
        assert_eq!(buf.len(), 52 + len);
    }

    #[test]
    fn reload_restores_trace_and_rules() {
        let (trace, rules) = sample();
        let mut buf = Vec::new();
        write_trace(&mut buf, &trace, &rules).unwrap();
        let stored = read_trace(&mut buf.as_slice()).unwrap();
        assert_eq!(stored.trace, trace);
        assert_eq!(stored.rules, rules);
        assert_eq!(stored.generation(1), Some("00203042442400"));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let (trace, rules) = sample();
        let mut buf = Vec::new();
        write_trace(&mut buf, &trace, &rules).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0x01;
        let err = read_trace(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, TraceIoError::DigestMismatch { .. }));
    }

    #[test]
    fn header_fields_are_checked() {
        let (trace, rules) = sample();
        let mut good = Vec::new();
        write_trace(&mut good, &trace, &rules).unwrap();

        let mut bad_magic = good.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            read_trace(&mut bad_magic.as_slice()),
            Err(TraceIoError::BadMagic)
        ));

        let mut bad_version = good.clone();
        bad_version[4] = 9;
        assert!(matches!(
            read_trace(&mut bad_version.as_slice()),
            Err(TraceIoError::UnsupportedVersion(9))
        ));

        let mut bad_reserved = good;
        bad_reserved[44] = 1;
        assert!(matches!(
            read_trace(&mut bad_reserved.as_slice()),
            Err(TraceIoError::NonZeroHeader(_))
        ));
    }

    #[test]
    fn oversized_frame_is_rejected_before_allocation() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&BLOB_MAGIC);
        buf.extend_from_slice(&BLOB_VERSION.to_le_bytes());
        buf.extend_from_slice(&[0u8; 2 + 32 + 8]);
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            read_trace(&mut buf.as_slice()),
            Err(TraceIoError::FrameTooLarge(_))
        ));
    }

    #[test]
    fn truncated_blob_is_an_io_error() {
        let (trace, rules) = sample();
        let mut buf = Vec::new();
        write_trace(&mut buf, &trace, &rules).unwrap();
        buf.truncate(buf.len() - 3);
        assert!(matches!(
            read_trace(&mut buf.as_slice()),
            Err(TraceIoError::Io(_))
        ));
    }
}
