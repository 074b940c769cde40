//! A scriptable [`SceneBackend`] for exercising the control plane without a
//! real renderer. Mirrors the shape of the workspace's in-memory providers
//! (e.g. content-store's `MemoryProvider`): a plain struct with queues the
//! test pre-loads and the code under test drains.

use std::collections::VecDeque;

use crate::backend::{BackendEvent, SceneBackend};
use crate::ids::{BufferId, DataSlotId, DisplayId, ExternalBufferId, SceneId, StreamBufferId};

/// Every `begin_*` call the control plane made, in order, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Map(SceneId, DisplayId, Option<BufferId>, i32),
    Show(SceneId),
    Hide(SceneId),
    Unmap(SceneId),
    Release(SceneId),
    LinkOffscreenBuffer(BufferId, SceneId, DataSlotId),
    LinkStreamBuffer(StreamBufferId, SceneId, DataSlotId),
    LinkExternalBuffer(ExternalBufferId, SceneId, DataSlotId),
    LinkData(SceneId, DataSlotId, SceneId, DataSlotId),
    UnlinkData(SceneId, DataSlotId),
    Pick(SceneId, f32, f32),
}

/// A backend whose [`BackendEvent`]s are scripted by the test ahead of time.
///
/// `poll_events` returns everything queued via [`ScriptedBackend::push_event`]
/// so far; `begin_*` calls are recorded in [`ScriptedBackend::calls`] but
/// otherwise do nothing, which is what lets a test hold a step "outstanding"
/// across several `do_one_loop` calls before deciding how the renderer
/// responds.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub calls: Vec<Call>,
    queued: VecDeque<BackendEvent>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event to be returned by the next `poll_events`.
    pub fn push_event(&mut self, event: BackendEvent) -> &mut Self {
        self.queued.push_back(event);
        self
    }
}

impl SceneBackend for ScriptedBackend {
    fn begin_map(&mut self, sid: SceneId, did: DisplayId, buffer: Option<BufferId>, render_order: i32) {
        self.calls.push(Call::Map(sid, did, buffer, render_order));
    }

    fn begin_show(&mut self, sid: SceneId) {
        self.calls.push(Call::Show(sid));
    }

    fn begin_hide(&mut self, sid: SceneId) {
        self.calls.push(Call::Hide(sid));
    }

    fn begin_unmap(&mut self, sid: SceneId) {
        self.calls.push(Call::Unmap(sid));
    }

    fn begin_release(&mut self, sid: SceneId) {
        self.calls.push(Call::Release(sid));
    }

    fn begin_link_offscreen_buffer(&mut self, bid: BufferId, consumer: SceneId, slot: DataSlotId) {
        self.calls.push(Call::LinkOffscreenBuffer(bid, consumer, slot));
    }

    fn begin_link_stream_buffer(&mut self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId) {
        self.calls.push(Call::LinkStreamBuffer(sbid, consumer, slot));
    }

    fn begin_link_external_buffer(&mut self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId) {
        self.calls.push(Call::LinkExternalBuffer(ebid, consumer, slot));
    }

    fn begin_link_data(&mut self, provider: SceneId, provider_slot: DataSlotId, consumer: SceneId, consumer_slot: DataSlotId) {
        self.calls
            .push(Call::LinkData(provider, provider_slot, consumer, consumer_slot));
    }

    fn begin_unlink_data(&mut self, consumer: SceneId, consumer_slot: DataSlotId) {
        self.calls.push(Call::UnlinkData(consumer, consumer_slot));
    }

    fn begin_pick(&mut self, sid: SceneId, nx: f32, ny: f32) {
        self.calls.push(Call::Pick(sid, nx, ny));
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        self.queued.drain(..).collect()
    }
}
