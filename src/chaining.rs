//! Stateless fan-out of events to more than one observer.

use crate::events::EventHandler;
use crate::ids::{BufferId, DataSlotId, DataSlotType, ExternalBufferId, PickableId, SceneId, StreamBufferId};
use crate::state::SceneState;

/// Invokes `H1` then `H2`, in that fixed order, for every callback.
///
/// Used to layer application callbacks atop a built-in convenience handler
/// (e.g. [`crate::auto_show::AutoShow`]) without either one knowing about the
/// other: the chainer is the only thing that couples them.
pub struct EventChainer<H1, H2> {
    first: H1,
    second: H2,
}

impl<H1, H2> EventChainer<H1, H2> {
    pub fn new(first: H1, second: H2) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (H1, H2) {
        (self.first, self.second)
    }
}

impl<H1: EventHandler, H2: EventHandler> EventHandler for EventChainer<H1, H2> {
    fn on_scene_state_changed(&mut self, sid: SceneId, state: SceneState) {
        self.first.on_scene_state_changed(sid, state);
        self.second.on_scene_state_changed(sid, state);
    }

    fn on_scene_flushed(&mut self, sid: SceneId, version: u64) {
        self.first.on_scene_flushed(sid, version);
        self.second.on_scene_flushed(sid, version);
    }

    fn on_scene_expiration_enabled(&mut self, sid: SceneId) {
        self.first.on_scene_expiration_enabled(sid);
        self.second.on_scene_expiration_enabled(sid);
    }

    fn on_scene_expiration_disabled(&mut self, sid: SceneId) {
        self.first.on_scene_expiration_disabled(sid);
        self.second.on_scene_expiration_disabled(sid);
    }

    fn on_scene_expired(&mut self, sid: SceneId) {
        self.first.on_scene_expired(sid);
        self.second.on_scene_expired(sid);
    }

    fn on_scene_expiration_recovered(&mut self, sid: SceneId) {
        self.first.on_scene_expiration_recovered(sid);
        self.second.on_scene_expiration_recovered(sid);
    }

    fn on_offscreen_buffer_linked(&mut self, bid: BufferId, consumer: SceneId, slot: DataSlotId, ok: bool) {
        self.first.on_offscreen_buffer_linked(bid, consumer, slot, ok);
        self.second.on_offscreen_buffer_linked(bid, consumer, slot, ok);
    }

    fn on_stream_buffer_linked(&mut self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId, ok: bool) {
        self.first.on_stream_buffer_linked(sbid, consumer, slot, ok);
        self.second.on_stream_buffer_linked(sbid, consumer, slot, ok);
    }

    fn on_external_buffer_linked(&mut self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId, ok: bool) {
        self.first.on_external_buffer_linked(ebid, consumer, slot, ok);
        self.second.on_external_buffer_linked(ebid, consumer, slot, ok);
    }

    fn on_data_linked(
        &mut self,
        provider: SceneId,
        provider_slot: DataSlotId,
        consumer: SceneId,
        consumer_slot: DataSlotId,
        ok: bool,
    ) {
        self.first.on_data_linked(provider, provider_slot, consumer, consumer_slot, ok);
        self.second.on_data_linked(provider, provider_slot, consumer, consumer_slot, ok);
    }

    fn on_data_unlinked(&mut self, consumer: SceneId, consumer_slot: DataSlotId, ok: bool) {
        self.first.on_data_unlinked(consumer, consumer_slot, ok);
        self.second.on_data_unlinked(consumer, consumer_slot, ok);
    }

    fn on_provider_slot_created(&mut self, sid: SceneId, slot: DataSlotId, ty: DataSlotType) {
        self.first.on_provider_slot_created(sid, slot, ty);
        self.second.on_provider_slot_created(sid, slot, ty);
    }

    fn on_provider_slot_destroyed(&mut self, sid: SceneId, slot: DataSlotId) {
        self.first.on_provider_slot_destroyed(sid, slot);
        self.second.on_provider_slot_destroyed(sid, slot);
    }

    fn on_consumer_slot_created(&mut self, sid: SceneId, slot: DataSlotId, ty: DataSlotType) {
        self.first.on_consumer_slot_created(sid, slot, ty);
        self.second.on_consumer_slot_created(sid, slot, ty);
    }

    fn on_consumer_slot_destroyed(&mut self, sid: SceneId, slot: DataSlotId) {
        self.first.on_consumer_slot_destroyed(sid, slot);
        self.second.on_consumer_slot_destroyed(sid, slot);
    }

    fn on_objects_picked(&mut self, sid: SceneId, objects: &[PickableId]) {
        self.first.on_objects_picked(sid, objects);
        self.second.on_objects_picked(sid, objects);
    }

    fn on_stream_availability_changed(&mut self, sbid: StreamBufferId, available: bool) {
        self.first.on_stream_availability_changed(sbid, available);
        self.second.on_stream_availability_changed(sbid, available);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(&'static str, Rc<RefCell<Vec<&'static str>>>);
    impl EventHandler for Recorder {
        fn on_scene_state_changed(&mut self, _sid: SceneId, _state: SceneState) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn invokes_first_then_second() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Recorder("first", Rc::clone(&log));
        let second = Recorder("second", Rc::clone(&log));
        let mut chainer = EventChainer::new(first, second);
        chainer.on_scene_state_changed(SceneId(1), SceneState::Ready);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }
}
