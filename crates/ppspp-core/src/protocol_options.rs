//! Protocol-Options codec (C4) — the handshake's ordered, order-dependent,
//! cross-referential option record (RFC 7574 §7, spec §3 / §4.3).
//!
//! This is the hard part of the wire format: options are TLV-ish but not
//! independent of each other (the Live Discard Window's width depends on the
//! already-parsed Chunk Addressing Method), and one field (Supported
//! Messages) is a compressed bitmap rather than a plain integer or blob.
//! The decoder is written as an explicit state machine that threads the
//! partially built record to each sub-decoder, per the design note in
//! spec §9, rather than as a table-driven one-shot parse.

use crate::error::CodecError;
use crate::message_type::MessageType;
use crate::primitives::{
    read_fixed, read_length_prefixed_u16, read_u32, read_u64, read_u8, write_fixed,
    write_length_prefixed_u16, write_u32, write_u64, write_u8,
};
use std::collections::BTreeSet;

// ── Closed enumerations ──────────────────────────────────────────────────

/// PPSPP protocol version (RFC 7574 §7.2). Only one value is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Version {
    Rfc7574 = 1,
}

impl Version {
    fn from_u8(value: u8) -> Result<Self, CodecError> {
        match value {
            1 => Ok(Version::Rfc7574),
            other => Err(CodecError::InvalidEnum {
                option: "version",
                value: other,
            }),
        }
    }

    fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Content Integrity Protection Method (RFC 7574 §7.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentIntegrityProtectionMethod {
    NoProtection = 0,
    MerkleHashTree = 1,
    SignAll = 2,
    UnifiedMerkleTree = 3,
}
pub use ContentIntegrityProtectionMethod as CIPM;

impl ContentIntegrityProtectionMethod {
    fn from_u8(value: u8) -> Result<Self, CodecError> {
        match value {
            0 => Ok(Self::NoProtection),
            1 => Ok(Self::MerkleHashTree),
            2 => Ok(Self::SignAll),
            3 => Ok(Self::UnifiedMerkleTree),
            other => Err(CodecError::InvalidEnum {
                option: "content_integrity_protection_method",
                value: other,
            }),
        }
    }

    fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Merkle Hash Tree Function (RFC 7574 §7.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MerkleHashTreeFunction {
    Sha1 = 0,
    Sha224 = 1,
    Sha256 = 2,
    Sha384 = 3,
    Sha512 = 4,
}
pub use MerkleHashTreeFunction as MHTF;

impl MerkleHashTreeFunction {
    fn from_u8(value: u8) -> Result<Self, CodecError> {
        match value {
            0 => Ok(Self::Sha1),
            1 => Ok(Self::Sha224),
            2 => Ok(Self::Sha256),
            3 => Ok(Self::Sha384),
            4 => Ok(Self::Sha512),
            other => Err(CodecError::InvalidEnum {
                option: "merkle_hash_tree_function",
                value: other,
            }),
        }
    }

    fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Live Signature Algorithm — DNSSEC algorithm number (RFC 7574 §7.7).
///
/// REDESIGN FLAG (spec §9 / §13): the `aioppspp` source this spec was
/// distilled from assigns `ecdsap256sha256 = 13` *and* `ecdsap384sha384 =
/// 13`, collapsing RFC 6605's two distinct algorithms onto one tag. RFC 6605
/// assigns them 13 and 14 respectively; this implementation uses 14 for
/// `EcdsaP384Sha384` and does not preserve the clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LiveSignatureAlgorithm {
    RsaMd5 = 1,
    Dh = 2,
    Dsa = 3,
    RsaSha1 = 5,
    DsaNsec3Sha1 = 6,
    RsaSha1Nsec3Sha1 = 7,
    RsaSha256 = 8,
    RsaSha512 = 10,
    EccGost = 12,
    EcdsaP256Sha256 = 13,
    EcdsaP384Sha384 = 14,
    PrivateDns = 253,
    PrivateOid = 254,
}
pub use LiveSignatureAlgorithm as LSA;

impl LiveSignatureAlgorithm {
    fn from_u8(value: u8) -> Result<Self, CodecError> {
        match value {
            1 => Ok(Self::RsaMd5),
            2 => Ok(Self::Dh),
            3 => Ok(Self::Dsa),
            5 => Ok(Self::RsaSha1),
            6 => Ok(Self::DsaNsec3Sha1),
            7 => Ok(Self::RsaSha1Nsec3Sha1),
            8 => Ok(Self::RsaSha256),
            10 => Ok(Self::RsaSha512),
            12 => Ok(Self::EccGost),
            13 => Ok(Self::EcdsaP256Sha256),
            14 => Ok(Self::EcdsaP384Sha384),
            253 => Ok(Self::PrivateDns),
            254 => Ok(Self::PrivateOid),
            other => Err(CodecError::InvalidEnum {
                option: "live_signature_algorithm",
                value: other,
            }),
        }
    }

    fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Chunk Addressing Method (RFC 7574 §7.8). Governs the wire width of the
/// Live Discard Window option (code 7): 4 bytes for the 32-bit methods, 8
/// bytes for the 64-bit ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkAddressingMethod {
    Bins32 = 0,
    Bytes64 = 1,
    Chunks32 = 2,
    Bins64 = 3,
    Chunks64 = 4,
}
pub use ChunkAddressingMethod as CAM;

impl ChunkAddressingMethod {
    fn from_u8(value: u8) -> Result<Self, CodecError> {
        match value {
            0 => Ok(Self::Bins32),
            1 => Ok(Self::Bytes64),
            2 => Ok(Self::Chunks32),
            3 => Ok(Self::Bins64),
            4 => Ok(Self::Chunks64),
            other => Err(CodecError::InvalidEnum {
                option: "chunk_addressing_method",
                value: other,
            }),
        }
    }

    fn as_u8(self) -> u8 {
        self as u8
    }

    /// Wire width in bytes of the Live Discard Window value under this CAM.
    fn live_discard_window_width(self) -> usize {
        match self {
            ChunkAddressingMethod::Bins32 | ChunkAddressingMethod::Chunks32 => 4,
            ChunkAddressingMethod::Bytes64
            | ChunkAddressingMethod::Bins64
            | ChunkAddressingMethod::Chunks64 => 8,
        }
    }
}

// ── Option codes ──────────────────────────────────────────────────────────

const CODE_VERSION: u8 = 0;
const CODE_MINIMUM_VERSION: u8 = 1;
const CODE_SWARM_IDENTIFIER: u8 = 2;
const CODE_CIPM: u8 = 3;
const CODE_MHTF: u8 = 4;
const CODE_LSA: u8 = 5;
const CODE_CAM: u8 = 6;
const CODE_LIVE_DISCARD_WINDOW: u8 = 7;
const CODE_SUPPORTED_MESSAGES: u8 = 8;
const CODE_CHUNK_SIZE: u8 = 9;
const CODE_END_OPTION: u8 = 255;

// ── The record ────────────────────────────────────────────────────────────

/// The handshake's protocol options record (RFC 7574 §7, spec §3).
///
/// Every field is optional. On the wire, present fields are serialized in
/// ascending code order and terminated by the `0xFF` end-option sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolOptions {
    pub version: Option<Version>,
    pub minimum_version: Option<Version>,
    pub swarm_identifier: Option<Vec<u8>>,
    pub content_integrity_protection_method: Option<CIPM>,
    pub merkle_hash_tree_function: Option<MHTF>,
    pub live_signature_algorithm: Option<LSA>,
    pub chunk_addressing_method: Option<CAM>,
    pub live_discard_window: Option<u64>,
    pub supported_messages: Option<BTreeSet<MessageType>>,
    pub chunk_size: Option<u32>,
}

/// Decodes a protocol-options record from the front of `data`.
///
/// Returns the record and the remaining bytes after the `0xFF` terminator.
pub fn decode(data: &[u8]) -> Result<(ProtocolOptions, &[u8]), CodecError> {
    let mut options = ProtocolOptions::default();
    let mut offset = 0;

    loop {
        let (code, next_offset) = read_u8(data, offset)?;
        offset = next_offset;

        if code == CODE_END_OPTION {
            break;
        }

        offset = decode_one(code, data, offset, &mut options).map_err(|err| {
            tracing::debug!(code, %err, "protocol options decode failed");
            err
        })?;
    }

    Ok((options, &data[offset..]))
}

/// Decodes a single option (after its code byte has been consumed),
/// consulting and updating the partially built `options` record.
fn decode_one(
    code: u8,
    data: &[u8],
    offset: usize,
    options: &mut ProtocolOptions,
) -> Result<usize, CodecError> {
    match code {
        CODE_VERSION => {
            ensure_unset(options.version.is_some(), code)?;
            let (value, offset) = read_u8(data, offset)?;
            options.version = Some(Version::from_u8(value)?);
            Ok(offset)
        }
        CODE_MINIMUM_VERSION => {
            ensure_unset(options.minimum_version.is_some(), code)?;
            let (value, offset) = read_u8(data, offset)?;
            options.minimum_version = Some(Version::from_u8(value)?);
            Ok(offset)
        }
        CODE_SWARM_IDENTIFIER => {
            ensure_unset(options.swarm_identifier.is_some(), code)?;
            let (bytes, offset) = read_length_prefixed_u16(data, offset)?;
            options.swarm_identifier = Some(bytes.to_vec());
            Ok(offset)
        }
        CODE_CIPM => {
            ensure_unset(options.content_integrity_protection_method.is_some(), code)?;
            let (value, offset) = read_u8(data, offset)?;
            options.content_integrity_protection_method = Some(CIPM::from_u8(value)?);
            Ok(offset)
        }
        CODE_MHTF => {
            ensure_unset(options.merkle_hash_tree_function.is_some(), code)?;
            let (value, offset) = read_u8(data, offset)?;
            options.merkle_hash_tree_function = Some(MHTF::from_u8(value)?);
            Ok(offset)
        }
        CODE_LSA => {
            ensure_unset(options.live_signature_algorithm.is_some(), code)?;
            let (value, offset) = read_u8(data, offset)?;
            options.live_signature_algorithm = Some(LSA::from_u8(value)?);
            Ok(offset)
        }
        CODE_CAM => {
            ensure_unset(options.chunk_addressing_method.is_some(), code)?;
            let (value, offset) = read_u8(data, offset)?;
            options.chunk_addressing_method = Some(CAM::from_u8(value)?);
            Ok(offset)
        }
        CODE_LIVE_DISCARD_WINDOW => {
            ensure_unset(options.live_discard_window.is_some(), code)?;
            let cam = options.chunk_addressing_method.ok_or(CodecError::OrderViolation)?;
            let width = cam.live_discard_window_width();
            let (value, offset) = if width == 4 {
                let (v, offset) = read_u32(data, offset)?;
                (v as u64, offset)
            } else {
                read_u64(data, offset)?
            };
            options.live_discard_window = Some(value);
            Ok(offset)
        }
        CODE_SUPPORTED_MESSAGES => {
            ensure_unset(options.supported_messages.is_some(), code)?;
            let (len, offset) = read_u8(data, offset)?;
            let (bitmap, offset) = read_fixed(data, offset, len as usize)?;
            options.supported_messages = Some(decode_bitmap(bitmap));
            Ok(offset)
        }
        CODE_CHUNK_SIZE => {
            ensure_unset(options.chunk_size.is_some(), code)?;
            let (value, offset) = read_u32(data, offset)?;
            options.chunk_size = Some(value);
            Ok(offset)
        }
        other => Err(CodecError::UnknownOption(other)),
    }
}

fn ensure_unset(already_set: bool, code: u8) -> Result<(), CodecError> {
    if already_set {
        Err(CodecError::DuplicateOption(code))
    } else {
        Ok(())
    }
}

/// Encodes a protocol-options record, terminated by the `0xFF` sentinel.
///
/// Fields are emitted in ascending code order. A `live_discard_window` set
/// without an accompanying `chunk_addressing_method` is silently omitted
/// (spec §3 invariant, §4.3 Encoder) — this is not an error.
pub fn encode(options: &ProtocolOptions) -> Vec<u8> {
    let mut out = Vec::new();

    if let Some(version) = options.version {
        write_u8(&mut out, CODE_VERSION);
        write_u8(&mut out, version.as_u8());
    }
    if let Some(min_version) = options.minimum_version {
        write_u8(&mut out, CODE_MINIMUM_VERSION);
        write_u8(&mut out, min_version.as_u8());
    }
    if let Some(swarm_id) = &options.swarm_identifier {
        write_u8(&mut out, CODE_SWARM_IDENTIFIER);
        write_length_prefixed_u16(&mut out, swarm_id);
    }
    if let Some(cipm) = options.content_integrity_protection_method {
        write_u8(&mut out, CODE_CIPM);
        write_u8(&mut out, cipm.as_u8());
    }
    if let Some(mhtf) = options.merkle_hash_tree_function {
        write_u8(&mut out, CODE_MHTF);
        write_u8(&mut out, mhtf.as_u8());
    }
    if let Some(lsa) = options.live_signature_algorithm {
        write_u8(&mut out, CODE_LSA);
        write_u8(&mut out, lsa.as_u8());
    }
    if let Some(cam) = options.chunk_addressing_method {
        write_u8(&mut out, CODE_CAM);
        write_u8(&mut out, cam.as_u8());
    }
    if let (Some(ldw), Some(cam)) = (options.live_discard_window, options.chunk_addressing_method) {
        write_u8(&mut out, CODE_LIVE_DISCARD_WINDOW);
        if cam.live_discard_window_width() == 4 {
            write_u32(&mut out, ldw as u32);
        } else {
            write_u64(&mut out, ldw);
        }
    }
    if let Some(messages) = &options.supported_messages {
        write_u8(&mut out, CODE_SUPPORTED_MESSAGES);
        let bitmap = encode_bitmap(messages);
        write_u8(&mut out, bitmap.len() as u8);
        write_fixed(&mut out, &bitmap);
    }
    if let Some(chunk_size) = options.chunk_size {
        write_u8(&mut out, CODE_CHUNK_SIZE);
        write_u32(&mut out, chunk_size);
    }

    write_u8(&mut out, CODE_END_OPTION);
    out
}

// ── Supported-Messages compressed bitmap (spec §4.3) ─────────────────────

/// Encodes a set of message types as a trimmed, MSB-first packed bitmap.
///
/// Builds a bit vector over the full declared `MessageType::ALL` list
/// (padded to a byte boundary), then strips trailing all-zero bytes.
pub fn encode_bitmap(messages: &BTreeSet<MessageType>) -> Vec<u8> {
    let n = MessageType::ALL.len();
    let byte_len = (n + 7) / 8;
    let mut bitmap = vec![0u8; byte_len];
    for (i, ty) in MessageType::ALL.iter().enumerate() {
        if messages.contains(ty) {
            bitmap[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    while bitmap.last() == Some(&0) {
        bitmap.pop();
    }
    bitmap
}

/// Decodes a trimmed, MSB-first packed bitmap into a set of message types.
///
/// Bits beyond `MessageType::ALL.len()` (i.e. past the end of the registry)
/// are ignored, as the spec requires.
pub fn decode_bitmap(bitmap: &[u8]) -> BTreeSet<MessageType> {
    let mut messages = BTreeSet::new();
    for (byte_idx, byte) in bitmap.iter().enumerate() {
        for bit_idx in 0..8 {
            let global_idx = byte_idx * 8 + bit_idx;
            let Some(ty) = MessageType::ALL.get(global_idx) else {
                continue;
            };
            if (byte >> (7 - bit_idx)) & 1 == 1 {
                messages.insert(*ty);
            }
        }
    }
    messages
}
