//! The typed event catalog delivered to user callbacks.
//!
//! Internally every renderer notification is a tagged [`Event`]; the
//! demultiplexer dispatches each one to exactly one [`EventHandler`] method.
//! Implementors override only the events they care about — every method has
//! an empty default body, so a handler interested in a single callback reads
//! as a single `impl` block.

use crate::ids::{BufferId, DataSlotId, DataSlotType, ExternalBufferId, PickableId, SceneId, StreamBufferId};
use crate::state::SceneState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SceneStateChanged(SceneId, SceneState),
    SceneFlushed(SceneId, u64),
    SceneExpirationEnabled(SceneId),
    SceneExpirationDisabled(SceneId),
    SceneExpired(SceneId),
    SceneExpirationRecovered(SceneId),
    OffscreenBufferLinked(BufferId, SceneId, DataSlotId, bool),
    StreamBufferLinked(StreamBufferId, SceneId, DataSlotId, bool),
    ExternalBufferLinked(ExternalBufferId, SceneId, DataSlotId, bool),
    DataLinked(SceneId, DataSlotId, SceneId, DataSlotId, bool),
    DataUnlinked(SceneId, DataSlotId, bool),
    ProviderSlotCreated(SceneId, DataSlotId, DataSlotType),
    ProviderSlotDestroyed(SceneId, DataSlotId),
    ConsumerSlotCreated(SceneId, DataSlotId, DataSlotType),
    ConsumerSlotDestroyed(SceneId, DataSlotId),
    ObjectsPicked(SceneId, Vec<PickableId>),
    StreamAvailabilityChanged(StreamBufferId, bool),
}

impl Event {
    /// Invokes the matching `EventHandler` method for this event.
    pub fn dispatch(&self, handler: &mut impl EventHandler) {
        match self {
            Self::SceneStateChanged(sid, state) => handler.on_scene_state_changed(*sid, *state),
            Self::SceneFlushed(sid, version) => handler.on_scene_flushed(*sid, *version),
            Self::SceneExpirationEnabled(sid) => handler.on_scene_expiration_enabled(*sid),
            Self::SceneExpirationDisabled(sid) => handler.on_scene_expiration_disabled(*sid),
            Self::SceneExpired(sid) => handler.on_scene_expired(*sid),
            Self::SceneExpirationRecovered(sid) => handler.on_scene_expiration_recovered(*sid),
            Self::OffscreenBufferLinked(bid, consumer, slot, ok) => {
                handler.on_offscreen_buffer_linked(*bid, *consumer, *slot, *ok);
            }
            Self::StreamBufferLinked(sbid, consumer, slot, ok) => {
                handler.on_stream_buffer_linked(*sbid, *consumer, *slot, *ok);
            }
            Self::ExternalBufferLinked(ebid, consumer, slot, ok) => {
                handler.on_external_buffer_linked(*ebid, *consumer, *slot, *ok);
            }
            Self::DataLinked(provider, provider_slot, consumer, consumer_slot, ok) => {
                handler.on_data_linked(*provider, *provider_slot, *consumer, *consumer_slot, *ok);
            }
            Self::DataUnlinked(consumer, consumer_slot, ok) => {
                handler.on_data_unlinked(*consumer, *consumer_slot, *ok);
            }
            Self::ProviderSlotCreated(sid, slot, ty) => handler.on_provider_slot_created(*sid, *slot, *ty),
            Self::ProviderSlotDestroyed(sid, slot) => handler.on_provider_slot_destroyed(*sid, *slot),
            Self::ConsumerSlotCreated(sid, slot, ty) => handler.on_consumer_slot_created(*sid, *slot, *ty),
            Self::ConsumerSlotDestroyed(sid, slot) => handler.on_consumer_slot_destroyed(*sid, *slot),
            Self::ObjectsPicked(sid, objects) => handler.on_objects_picked(*sid, objects),
            Self::StreamAvailabilityChanged(sbid, available) => {
                handler.on_stream_availability_changed(*sbid, *available);
            }
        }
    }
}

/// The callback interface user code implements to observe the control plane.
///
/// The demultiplexer updates its client-side mirror of `current_state`
/// *before* calling [`EventHandler::on_scene_state_changed`], so a callback
/// that re-enters the API (including `flush`/`dispatch_events`) observes the
/// new mirror.
#[allow(unused_variables)]
pub trait EventHandler {
    fn on_scene_state_changed(&mut self, sid: SceneId, state: SceneState) {}
    fn on_scene_flushed(&mut self, sid: SceneId, version: u64) {}
    fn on_scene_expiration_enabled(&mut self, sid: SceneId) {}
    fn on_scene_expiration_disabled(&mut self, sid: SceneId) {}
    fn on_scene_expired(&mut self, sid: SceneId) {}
    fn on_scene_expiration_recovered(&mut self, sid: SceneId) {}
    fn on_offscreen_buffer_linked(&mut self, bid: BufferId, consumer: SceneId, slot: DataSlotId, ok: bool) {}
    fn on_stream_buffer_linked(&mut self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId, ok: bool) {}
    fn on_external_buffer_linked(&mut self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId, ok: bool) {}
    fn on_data_linked(
        &mut self,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
        ok: bool,
    ) {
    }
    fn on_data_unlinked(&mut self, consumer: SceneId, consumer_slot: DataSlotId, ok: bool) {}
    fn on_provider_slot_created(&mut self, sid: SceneId, slot: DataSlotId, ty: DataSlotType) {}
    fn on_provider_slot_destroyed(&mut self, sid: SceneId, slot: DataSlotId) {}
    fn on_consumer_slot_created(&mut self, sid: SceneId, slot: DataSlotId, ty: DataSlotType) {}
    fn on_consumer_slot_destroyed(&mut self, sid: SceneId, slot: DataSlotId) {}
    fn on_objects_picked(&mut self, sid: SceneId, objects: &[PickableId]) {}
    fn on_stream_availability_changed(&mut self, sbid: StreamBufferId, available: bool) {}
}
