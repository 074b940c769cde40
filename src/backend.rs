//! The renderer boundary.
//!
//! Everything this crate does not own — the scene graph, the GL context, the
//! GPU upload of a scene's resources — sits behind [`SceneBackend`]. The
//! control plane only ever issues `begin_*` calls (fire-and-forget: they
//! never block and never return a result directly) and drains whatever the
//! backend has to report via [`SceneBackend::poll_events`].
//!
//! This decoupling is what lets a step remain "outstanding" across several
//! ticks (resource upload on `Map` can take a while) and lets an unpublish
//! race ahead of a step response that was already in flight.

use crate::ids::{BufferId, DataSlotId, DataSlotType, DisplayId, ExternalBufferId, PickableId, SceneId, StreamBufferId};
use crate::state::Step;

/// A spontaneous or response event reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The client published `SceneId`; the mirror may now advance off `Unavailable`.
    Published(SceneId),
    /// The client (or the renderer itself) unpublished `SceneId`.
    Unpublished(SceneId),
    /// The outcome of a previously issued [`Step`] for a scene.
    StepResult(SceneId, Step, bool),
    /// A content flush was applied, carrying the client's monotonic version tag.
    Flushed(SceneId, u64),
    ExpirationEnabled(SceneId),
    ExpirationDisabled(SceneId),
    Expired(SceneId),
    Recovered(SceneId),
    OffscreenBufferLinkResult(BufferId, SceneId, DataSlotId, bool),
    StreamBufferLinkResult(StreamBufferId, SceneId, DataSlotId, bool),
    ExternalBufferLinkResult(ExternalBufferId, SceneId, DataSlotId, bool),
    DataLinkResult(SceneId, DataSlotId, SceneId, DataSlotId, bool),
    DataUnlinkResult(SceneId, DataSlotId, bool),
    ProviderSlotCreated(SceneId, DataSlotId, DataSlotType),
    ProviderSlotDestroyed(SceneId, DataSlotId),
    ConsumerSlotCreated(SceneId, DataSlotId, DataSlotType),
    ConsumerSlotDestroyed(SceneId, DataSlotId),
    /// An offscreen buffer was created on (or torn down from, if `None`... see
    /// [`SceneBackend`] docs) a display. Display/buffer lifecycle is owned by
    /// the display subsystem; the control plane only needs to know ownership
    /// well enough to validate buffer-to-consumer links.
    OffscreenBufferRegistered(BufferId, DisplayId),
    OffscreenBufferDestroyed(BufferId),
    ObjectsPicked(SceneId, Vec<PickableId>),
    StreamAvailabilityChanged(StreamBufferId, bool),
}

/// The execution side of every step, link and pick the control plane issues.
///
/// Implementors never block in a `begin_*` call: the real outcome, if any,
/// arrives later through [`SceneBackend::poll_events`]. A scene for which no
/// `begin_*` call was ever issued may still spontaneously produce
/// `Published`/`Unpublished` events — those originate from the client's own
/// publish/unpublish actions on the (out of scope) scene-content channel, not
/// from anything this crate asked for.
pub trait SceneBackend: Send {
    fn begin_map(&mut self, sid: SceneId, did: DisplayId, buffer: Option<BufferId>, render_order: i32);
    fn begin_show(&mut self, sid: SceneId);
    fn begin_hide(&mut self, sid: SceneId);
    fn begin_unmap(&mut self, sid: SceneId);
    fn begin_release(&mut self, sid: SceneId);

    fn begin_link_offscreen_buffer(&mut self, bid: BufferId, consumer: SceneId, slot: DataSlotId);
    fn begin_link_stream_buffer(&mut self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId);
    fn begin_link_external_buffer(&mut self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId);
    fn begin_link_data(&mut self, provider: SceneId, provider_slot: DataSlotId, consumer: SceneId, consumer_slot: DataSlotId);
    fn begin_unlink_data(&mut self, consumer: SceneId, consumer_slot: DataSlotId);

    fn begin_pick(&mut self, sid: SceneId, nx: f32, ny: f32);

    /// Drains and returns every event the backend has produced since the
    /// last call. Must never block.
    fn poll_events(&mut self) -> Vec<BackendEvent>;
}

/// A backend that acknowledges every request immediately and successfully.
///
/// Useful as a placeholder while wiring up an embedding application, and as
/// the default for doc examples. Picks always return an empty result, since
/// there is no real scene graph behind it to hit-test against.
#[derive(Debug, Default)]
pub struct NullBackend {
    pending: Vec<BackendEvent>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneBackend for NullBackend {
    fn begin_map(&mut self, sid: SceneId, _did: DisplayId, _buffer: Option<BufferId>, _render_order: i32) {
        self.pending.push(BackendEvent::StepResult(sid, Step::Map, true));
    }

    fn begin_show(&mut self, sid: SceneId) {
        self.pending.push(BackendEvent::StepResult(sid, Step::Show, true));
    }

    fn begin_hide(&mut self, sid: SceneId) {
        self.pending.push(BackendEvent::StepResult(sid, Step::Hide, true));
    }

    fn begin_unmap(&mut self, sid: SceneId) {
        self.pending.push(BackendEvent::StepResult(sid, Step::Unmap, true));
    }

    fn begin_release(&mut self, sid: SceneId) {
        self.pending.push(BackendEvent::StepResult(sid, Step::Release, true));
    }

    fn begin_link_offscreen_buffer(&mut self, bid: BufferId, consumer: SceneId, slot: DataSlotId) {
        self.pending
            .push(BackendEvent::OffscreenBufferLinkResult(bid, consumer, slot, true));
    }

    fn begin_link_stream_buffer(&mut self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId) {
        self.pending
            .push(BackendEvent::StreamBufferLinkResult(sbid, consumer, slot, true));
    }

    fn begin_link_external_buffer(&mut self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId) {
        self.pending
            .push(BackendEvent::ExternalBufferLinkResult(ebid, consumer, slot, true));
    }

    fn begin_link_data(&mut self, provider: SceneId, provider_slot: DataSlotId, consumer: SceneId, consumer_slot: DataSlotId) {
        self.pending.push(BackendEvent::DataLinkResult(
            provider,
            provider_slot,
            consumer,
            consumer_slot,
            true,
        ));
    }

    fn begin_unlink_data(&mut self, consumer: SceneId, consumer_slot: DataSlotId) {
        self.pending
            .push(BackendEvent::DataUnlinkResult(consumer, consumer_slot, true));
    }

    fn begin_pick(&mut self, sid: SceneId, _nx: f32, _ny: f32) {
        self.pending.push(BackendEvent::ObjectsPicked(sid, Vec::new()));
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.pending)
    }
}
