//! Self-describing binary blobs for the two renderer events that must cross
//! the scene-content transport rather than ride the in-process event stream.
//!
//! Both codecs are byte-exact: the writer produces exactly the length it
//! declares, and the reader consumes the whole blob with nothing left over.
//! Encoding is host-endian, since the transport is same-host.

use crate::ids::{DataSlotId, SceneId};
use crate::state::SceneState;

const SCENE_REFERENCE_KIND: u8 = 1;
const RESOURCE_AVAILABILITY_KIND: u8 = 2;

/// A 128-bit content hash, carried as two 64-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentHash {
    pub low64: u64,
    pub high64: u64,
}

/// Fixed-size record describing a scene-to-scene or scene-to-buffer reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneReferenceEvent {
    pub referenced_sid: SceneId,
    pub consumer_sid: SceneId,
    pub provider_sid: SceneId,
    pub data_consumer_slot: DataSlotId,
    pub data_provider_slot: DataSlotId,
    pub scene_state: SceneState,
    pub version_tag: u64,
    pub status: bool,
}

/// `count` content hashes reported available for `sid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAvailabilityEvent {
    pub sid: SceneId,
    pub hashes: Vec<ContentHash>,
}

/// A blob codec failed to decode: truncated input, trailing bytes, or an
/// unrecognized discriminator byte.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("blob too short: need at least {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
    #[error("blob has {extra} trailing byte(s) past the declared payload")]
    TrailingBytes { extra: usize },
    #[error("unrecognized event kind discriminator {0}")]
    UnknownKind(u8),
}

const SCENE_REFERENCE_LEN: usize = 1 + 8 + 8 + 8 + 4 + 4 + 1 + 8 + 1;

impl SceneReferenceEvent {
    /// Always exactly [`SCENE_REFERENCE_LEN`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SCENE_REFERENCE_LEN);
        out.push(SCENE_REFERENCE_KIND);
        out.extend_from_slice(&self.referenced_sid.0.to_ne_bytes());
        out.extend_from_slice(&self.consumer_sid.0.to_ne_bytes());
        out.extend_from_slice(&self.provider_sid.0.to_ne_bytes());
        out.extend_from_slice(&self.data_consumer_slot.0.to_ne_bytes());
        out.extend_from_slice(&self.data_provider_slot.0.to_ne_bytes());
        out.push(self.scene_state as u8);
        out.extend_from_slice(&self.version_tag.to_ne_bytes());
        out.push(self.status as u8);
        debug_assert_eq!(out.len(), SCENE_REFERENCE_LEN);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < SCENE_REFERENCE_LEN {
            return Err(CodecError::Truncated { need: SCENE_REFERENCE_LEN, have: bytes.len() });
        }
        if bytes.len() > SCENE_REFERENCE_LEN {
            return Err(CodecError::TrailingBytes { extra: bytes.len() - SCENE_REFERENCE_LEN });
        }
        if bytes[0] != SCENE_REFERENCE_KIND {
            return Err(CodecError::UnknownKind(bytes[0]));
        }

        let mut cursor = 1;
        let mut take8 = || {
            let v = u64::from_ne_bytes(bytes[cursor..cursor + 8].try_into().unwrap());
            cursor += 8;
            v
        };
        let referenced_sid = SceneId(take8());
        let consumer_sid = SceneId(take8());
        let provider_sid = SceneId(take8());

        let mut take4 = || {
            let v = u32::from_ne_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
            cursor += 4;
            v
        };
        let data_consumer_slot = DataSlotId(take4());
        let data_provider_slot = DataSlotId(take4());

        let scene_state = SceneState::from_u8(bytes[cursor]).ok_or(CodecError::UnknownKind(bytes[cursor]))?;
        cursor += 1;

        let version_tag = u64::from_ne_bytes(bytes[cursor..cursor + 8].try_into().unwrap());
        cursor += 8;

        let status = bytes[cursor] != 0;
        cursor += 1;
        debug_assert_eq!(cursor, SCENE_REFERENCE_LEN);

        Ok(Self {
            referenced_sid,
            consumer_sid,
            provider_sid,
            data_consumer_slot,
            data_provider_slot,
            scene_state,
            version_tag,
            status,
        })
    }
}

impl ResourceAvailabilityEvent {
    pub fn encode(&self) -> Vec<u8> {
        let len = 1 + 8 + 8 + self.hashes.len() * 16;
        let mut out = Vec::with_capacity(len);
        out.push(RESOURCE_AVAILABILITY_KIND);
        out.extend_from_slice(&self.sid.0.to_ne_bytes());
        out.extend_from_slice(&(self.hashes.len() as u64).to_ne_bytes());
        for hash in &self.hashes {
            out.extend_from_slice(&hash.low64.to_ne_bytes());
            out.extend_from_slice(&hash.high64.to_ne_bytes());
        }
        debug_assert_eq!(out.len(), len);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        const HEADER_LEN: usize = 1 + 8 + 8;
        if bytes.len() < HEADER_LEN {
            return Err(CodecError::Truncated { need: HEADER_LEN, have: bytes.len() });
        }
        if bytes[0] != RESOURCE_AVAILABILITY_KIND {
            return Err(CodecError::UnknownKind(bytes[0]));
        }

        let sid = SceneId(u64::from_ne_bytes(bytes[1..9].try_into().unwrap()));
        let count = u64::from_ne_bytes(bytes[9..17].try_into().unwrap()) as usize;

        let need = HEADER_LEN + count * 16;
        if bytes.len() < need {
            return Err(CodecError::Truncated { need, have: bytes.len() });
        }
        if bytes.len() > need {
            return Err(CodecError::TrailingBytes { extra: bytes.len() - need });
        }

        let mut hashes = Vec::with_capacity(count);
        let mut cursor = HEADER_LEN;
        for _ in 0..count {
            let low64 = u64::from_ne_bytes(bytes[cursor..cursor + 8].try_into().unwrap());
            let high64 = u64::from_ne_bytes(bytes[cursor + 8..cursor + 16].try_into().unwrap());
            hashes.push(ContentHash { low64, high64 });
            cursor += 16;
        }

        Ok(Self { sid, hashes })
    }
}
