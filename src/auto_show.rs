//! A built-in convenience handler: automatically raises a scene's target
//! state as soon as it becomes available, so simple embedders don't need to
//! write their own `on_scene_state_changed` just to show a scene once
//! published.
//!
//! Composes with application callbacks via [`crate::chaining::EventChainer`]
//! rather than inheritance, so using it never hides state from the rest of
//! the handler chain.

use log::warn;

use crate::control::SceneControl;
use crate::events::EventHandler;
use crate::ids::SceneId;
use crate::state::SceneState;

/// On `Available`, immediately requests `target` for that scene and flushes.
///
/// Does nothing for any other transition; a scene driven back down to
/// `Available` (e.g. after a `Hide`) is requested again, so this also
/// implements "stay shown" across a scene's whole lifetime once attached.
pub struct AutoShow<'a> {
    control: &'a SceneControl,
    target: SceneState,
}

impl<'a> AutoShow<'a> {
    pub fn new(control: &'a SceneControl, target: SceneState) -> Self {
        Self { control, target }
    }
}

impl EventHandler for AutoShow<'_> {
    fn on_scene_state_changed(&mut self, sid: SceneId, state: SceneState) {
        if state != SceneState::Available {
            return;
        }
        match self.control.set_scene_state(sid, self.target) {
            Ok(()) => self.control.flush(),
            Err(err) => warn!("auto-show: scene {sid} not raised to {}: {err}", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, NullBackend, SceneBackend};
    use crate::config::Config;
    use crate::events::Event;
    use crate::ids::{BufferId, DataSlotId, DisplayId, ExternalBufferId, StreamBufferId};

    struct AutoPublishBackend {
        sid: SceneId,
        published: bool,
        inner: NullBackend,
    }

    impl SceneBackend for AutoPublishBackend {
        fn begin_map(&mut self, sid: SceneId, did: DisplayId, buffer: Option<BufferId>, render_order: i32) {
            self.inner.begin_map(sid, did, buffer, render_order);
        }
        fn begin_show(&mut self, sid: SceneId) {
            self.inner.begin_show(sid);
        }
        fn begin_hide(&mut self, sid: SceneId) {
            self.inner.begin_hide(sid);
        }
        fn begin_unmap(&mut self, sid: SceneId) {
            self.inner.begin_unmap(sid);
        }
        fn begin_release(&mut self, sid: SceneId) {
            self.inner.begin_release(sid);
        }
        fn begin_link_offscreen_buffer(&mut self, bid: BufferId, consumer: SceneId, slot: DataSlotId) {
            self.inner.begin_link_offscreen_buffer(bid, consumer, slot);
        }
        fn begin_link_stream_buffer(&mut self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId) {
            self.inner.begin_link_stream_buffer(sbid, consumer, slot);
        }
        fn begin_link_external_buffer(&mut self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId) {
            self.inner.begin_link_external_buffer(ebid, consumer, slot);
        }
        fn begin_link_data(&mut self, provider: SceneId, provider_slot: DataSlotId, consumer: SceneId, consumer_slot: DataSlotId) {
            self.inner.begin_link_data(provider, provider_slot, consumer, consumer_slot);
        }
        fn begin_unlink_data(&mut self, consumer: SceneId, consumer_slot: DataSlotId) {
            self.inner.begin_unlink_data(consumer, consumer_slot);
        }
        fn begin_pick(&mut self, sid: SceneId, nx: f32, ny: f32) {
            self.inner.begin_pick(sid, nx, ny);
        }
        fn poll_events(&mut self) -> Vec<BackendEvent> {
            let mut events = self.inner.poll_events();
            if !self.published {
                self.published = true;
                events.insert(0, BackendEvent::Published(self.sid));
            }
            events
        }
    }

    #[derive(Default)]
    struct Seen(Vec<Event>);
    impl EventHandler for Seen {
        fn on_scene_state_changed(&mut self, sid: SceneId, state: SceneState) {
            self.0.push(Event::SceneStateChanged(sid, state));
        }
    }

    #[test]
    fn drives_scene_to_rendered_once_available() {
        let sid = SceneId(1);
        let backend = AutoPublishBackend { sid, published: false, inner: NullBackend::new() };
        let control = SceneControl::new(Box::new(backend), Config::default());
        control.register_display(DisplayId(1), BufferId(100));
        control.set_scene_mapping(sid, DisplayId(1)).unwrap();
        control.flush();

        let auto = AutoShow::new(&control, SceneState::Rendered);
        let mut chainer = crate::chaining::EventChainer::new(auto, Seen::default());

        for _ in 0..6 {
            control.do_one_loop().unwrap();
            control.dispatch_events(&mut chainer);
        }

        let (_, seen) = chainer.into_inner();
        assert_eq!(control.current_state(sid), SceneState::Rendered);
        assert!(seen.0.contains(&Event::SceneStateChanged(sid, SceneState::Rendered)));
    }

    #[test]
    fn ignores_transitions_other_than_available() {
        let control = SceneControl::new(Box::new(NullBackend::new()), Config::default());
        let mut auto = AutoShow::new(&control, SceneState::Ready);
        auto.on_scene_state_changed(SceneId(1), SceneState::Rendered);
        // No mapping was ever set, so if this tried to act it would fail and
        // warn; the absence of a panic here is the test.
    }
}
