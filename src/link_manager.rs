//! The data-link graph between provider slots (offscreen/stream/external
//! buffers or in-scene provider slots) and consumer slots in scenes.
//!
//! Link preconditions (consumer readiness, matching display, matching slot
//! types) are checked by the renderer and surfaced as the `ok` field of the
//! corresponding [`crate::backend::BackendEvent`]; this module only keeps the
//! bookkeeping the rest of the control plane needs: slot types (reported by
//! the renderer as slots come and go) and which source currently feeds each
//! consumer slot.

use fxhash::FxHashMap;

use crate::ids::{BufferId, DataSlotId, DataSlotType, ExternalBufferId, SceneId, StreamBufferId};

/// Where a consumer slot's current link is sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    Offscreen(BufferId),
    Stream(StreamBufferId),
    External(ExternalBufferId),
    Data(SceneId, DataSlotId),
}

/// Slot-type registry and consumer-side link graph.
///
/// One-to-many from the provider side (a provider's fan-out isn't tracked
/// here, it needs no bookkeeping of its own) and one-to-one on the consumer
/// side: a successful link replaces whatever previously fed that consumer
/// slot (invariant 5); a failed link leaves the previous state unspecified,
/// so this only updates on a successful result.
#[derive(Debug, Default)]
pub struct LinkManager {
    provider_slots: FxHashMap<(SceneId, DataSlotId), DataSlotType>,
    consumer_slots: FxHashMap<(SceneId, DataSlotId), DataSlotType>,
    consumer_links: FxHashMap<(SceneId, DataSlotId), LinkSource>,
}

impl LinkManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider_slot_created(&mut self, sid: SceneId, slot: DataSlotId, ty: DataSlotType) {
        self.provider_slots.insert((sid, slot), ty);
    }

    /// A disappearing provider slot does not, by itself, unlink anything
    /// consumer-side; the renderer is expected to also report the affected
    /// consumer unlinks.
    pub fn provider_slot_destroyed(&mut self, sid: SceneId, slot: DataSlotId) {
        self.provider_slots.remove(&(sid, slot));
    }

    pub fn consumer_slot_created(&mut self, sid: SceneId, slot: DataSlotId, ty: DataSlotType) {
        self.consumer_slots.insert((sid, slot), ty);
    }

    /// A disappearing consumer slot implicitly unlinks it.
    pub fn consumer_slot_destroyed(&mut self, sid: SceneId, slot: DataSlotId) {
        self.consumer_slots.remove(&(sid, slot));
        self.consumer_links.remove(&(sid, slot));
    }

    pub fn provider_slot_type(&self, sid: SceneId, slot: DataSlotId) -> Option<DataSlotType> {
        self.provider_slots.get(&(sid, slot)).copied()
    }

    pub fn consumer_slot_type(&self, sid: SceneId, slot: DataSlotId) -> Option<DataSlotType> {
        self.consumer_slots.get(&(sid, slot)).copied()
    }

    /// Applies a link result reported by the renderer: on success, replaces
    /// whatever source previously fed `consumer_slot`; on failure, leaves the
    /// graph untouched (the previous link is no longer trustworthy, but this
    /// module does not guess at what replaces it).
    pub fn record_link_result(&mut self, consumer: SceneId, consumer_slot: DataSlotId, source: LinkSource, ok: bool) {
        if ok {
            self.consumer_links.insert((consumer, consumer_slot), source);
        }
    }

    /// Applies an unlink result: on success, clears whichever link currently
    /// attaches to the consumer slot.
    pub fn record_unlink_result(&mut self, consumer: SceneId, consumer_slot: DataSlotId, ok: bool) {
        if ok {
            self.consumer_links.remove(&(consumer, consumer_slot));
        }
    }

    pub fn current_link(&self, consumer: SceneId, consumer_slot: DataSlotId) -> Option<LinkSource> {
        self.consumer_links.get(&(consumer, consumer_slot)).copied()
    }
}
