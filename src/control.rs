//! The facade embedding applications drive: [`SceneControl`].

use std::cell::RefCell;

use crate::backend::{BackendEvent, SceneBackend};
use crate::commands::{Command, CommandQueue};
use crate::config::Config;
use crate::demux::EventDemultiplexer;
use crate::errors::{ApiError, Result};
use crate::events::{Event, EventHandler};
use crate::ids::{BufferId, DataSlotId, DisplayId, ExternalBufferId, SceneId, StreamBufferId};
use crate::link_manager::{LinkManager, LinkSource};
use crate::loop_mode::{LoopMode, ModeError};
use crate::mapping::{self, BufferKind, DisplayRegistry};
use crate::picking;
use crate::state::SceneState;
use crate::state_machine::StateMachine;

struct Inner {
    commands: CommandQueue,
    state_machine: StateMachine,
    link_manager: LinkManager,
    registry: DisplayRegistry,
    demux: EventDemultiplexer,
    backend: Box<dyn SceneBackend>,
    config: Config,
    loop_mode: LoopMode,
}

/// The single entry point an embedding application drives.
///
/// Every public method takes `&self`: state lives behind a [`RefCell`] so
/// that a user callback invoked from [`Self::dispatch_events`] can freely
/// call back into `flush`, `set_scene_state`, or `dispatch_events` itself.
/// `dispatch_events` only ever holds the borrow across a single staged
/// event, never across the callback invocation, which is what makes that
/// re-entrancy sound instead of a `RefCell` panic (see [`crate::demux`]).
pub struct SceneControl {
    inner: RefCell<Inner>,
}

impl SceneControl {
    pub fn new(backend: Box<dyn SceneBackend>, config: Config) -> Self {
        Self {
            inner: RefCell::new(Inner {
                commands: CommandQueue::new(),
                state_machine: StateMachine::new(),
                link_manager: LinkManager::new(),
                registry: DisplayRegistry::new(),
                demux: EventDemultiplexer::new(),
                backend,
                config,
                loop_mode: LoopMode::new(),
            }),
        }
    }

    /// Makes `did` known to the control plane alongside its implicit
    /// framebuffer. Display lifecycle itself belongs to the display/window
    /// platform; this is just enough bookkeeping to validate mappings and
    /// buffer-to-consumer links against.
    pub fn register_display(&self, did: DisplayId, framebuffer: BufferId) {
        self.inner.borrow_mut().registry.register_display(did, framebuffer);
    }

    pub fn unregister_display(&self, did: DisplayId) {
        self.inner.borrow_mut().registry.unregister_display(did);
    }

    pub fn register_offscreen_buffer(&self, bid: BufferId, owner: DisplayId, kind: BufferKind) {
        self.inner.borrow_mut().registry.register_offscreen_buffer(bid, owner, kind);
    }

    pub fn unregister_offscreen_buffer(&self, bid: BufferId) {
        self.inner.borrow_mut().registry.unregister_offscreen_buffer(bid);
    }

    /// The client-side mirror of `sid`'s `current_state`, as of the last
    /// `dispatch_events` drain (not the internal authoritative record, which
    /// may be a tick ahead).
    pub fn current_state(&self, sid: SceneId) -> SceneState {
        self.inner.borrow().demux.current_state(sid)
    }

    /// Sets `sid`'s desired state. Takes effect immediately — matching the
    /// mapping/target-state bookkeeping convention, not the backend-facing
    /// command queue — so a `set_scene_mapping` immediately followed by
    /// `set_scene_state(Ready)` sees the mapping that was just set, with no
    /// intervening `do_one_loop`/`flush` required.
    pub fn set_scene_state(&self, sid: SceneId, state: SceneState) -> Result<()> {
        if state == SceneState::Unavailable {
            return Err(ApiError::IllegalState);
        }
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if state >= SceneState::Ready {
            let mapped = inner.state_machine.record(sid).map_or(false, |r| r.mapping_set);
            if !mapped {
                return Err(ApiError::NoMapping(sid));
            }
        }
        inner.state_machine.set_target_state(sid, state);
        Ok(())
    }

    /// Sets `sid`'s mapped display. Takes effect immediately, so the
    /// mapping is visible to a `set_scene_state` call made right after.
    pub fn set_scene_mapping(&self, sid: SceneId, did: DisplayId) -> Result<()> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let record = inner.state_machine.record_mut(sid);
        mapping::set_mapping(sid, record, &inner.registry, did)
    }

    /// Sets `sid`'s buffer assignment on its already-mapped display. Takes
    /// effect immediately, same as `set_scene_mapping`.
    pub fn set_scene_display_buffer_assignment(&self, sid: SceneId, bid: Option<BufferId>, render_order: i32) -> Result<()> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let record = inner.state_machine.record_mut(sid);
        mapping::set_buffer_assignment(sid, record, &inner.registry, bid, render_order)
    }

    pub fn link_offscreen_buffer(&self, bid: BufferId, consumer: SceneId, slot: DataSlotId) {
        self.inner.borrow_mut().commands.enqueue(Command::LinkOffscreenBuffer(bid, consumer, slot));
    }

    pub fn link_stream_buffer(&self, sbid: StreamBufferId, consumer: SceneId, slot: DataSlotId) {
        self.inner.borrow_mut().commands.enqueue(Command::LinkStreamBuffer(sbid, consumer, slot));
    }

    pub fn link_external_buffer(&self, ebid: ExternalBufferId, consumer: SceneId, slot: DataSlotId) {
        self.inner.borrow_mut().commands.enqueue(Command::LinkExternalBuffer(ebid, consumer, slot));
    }

    pub fn link_data(&self, provider: SceneId, provider_slot: DataSlotId, consumer: SceneId, consumer_slot: DataSlotId) -> Result<()> {
        if provider == consumer {
            return Err(ApiError::SelfLink(provider));
        }
        self.inner
            .borrow_mut()
            .commands
            .enqueue(Command::LinkData(provider, provider_slot, consumer, consumer_slot));
        Ok(())
    }

    pub fn unlink_data(&self, consumer: SceneId, consumer_slot: DataSlotId) {
        self.inner.borrow_mut().commands.enqueue(Command::UnlinkData(consumer, consumer_slot));
    }

    pub fn handle_pick_event(&self, sid: SceneId, nx: f32, ny: f32) {
        self.inner.borrow_mut().commands.enqueue(Command::HandlePick(sid, nx, ny));
    }

    /// Atomically commits every command enqueued so far. Never blocks.
    pub fn flush(&self) {
        self.inner.borrow_mut().commands.flush();
    }

    /// Runs one hosted-loop iteration: applies every command a prior
    /// `flush` made visible, drives the state machine one step per scene,
    /// and stages whatever the backend reports for the next
    /// `dispatch_events`. Forbidden once owned-thread mode has been entered.
    pub fn do_one_loop(&self) -> std::result::Result<(), ModeError> {
        let mut inner = self.inner.borrow_mut();
        inner.loop_mode.enter_hosted()?;
        Self::run_one_cycle(&mut inner);
        Ok(())
    }

    /// Commits this `SceneControl` to owned-thread mode without running a
    /// cycle. The embedding application is responsible for actually driving
    /// cycles on its own loop thread (e.g. via [`crate::loop_mode::spawn_owned_thread`])
    /// and for whatever synchronization that requires; this only enforces
    /// the hosted/owned exclusivity invariant (§5).
    pub fn enter_owned_thread_mode(&self) -> std::result::Result<(), ModeError> {
        self.inner.borrow_mut().loop_mode.enter_owned()
    }

    fn run_one_cycle(inner: &mut Inner) {
        let drained: Vec<Command> = inner.commands.drain_intake().collect();
        for command in drained {
            Self::apply_command(inner, command);
        }
        inner.state_machine.tick(inner.backend.as_mut(), &inner.config);
        let events = inner.backend.poll_events();
        for event in events {
            Self::apply_backend_event(inner, event);
        }
    }

    fn apply_command(inner: &mut Inner, command: Command) {
        match command {
            Command::LinkOffscreenBuffer(bid, consumer, slot) => {
                inner.backend.begin_link_offscreen_buffer(bid, consumer, slot);
            }
            Command::LinkStreamBuffer(sbid, consumer, slot) => {
                inner.backend.begin_link_stream_buffer(sbid, consumer, slot);
            }
            Command::LinkExternalBuffer(ebid, consumer, slot) => {
                inner.backend.begin_link_external_buffer(ebid, consumer, slot);
            }
            Command::LinkData(provider, provider_slot, consumer, consumer_slot) => {
                inner.backend.begin_link_data(provider, provider_slot, consumer, consumer_slot);
            }
            Command::UnlinkData(consumer, consumer_slot) => {
                inner.backend.begin_unlink_data(consumer, consumer_slot);
            }
            Command::HandlePick(sid, nx, ny) => picking::handle_pick(inner.backend.as_mut(), sid, nx, ny),
        }
    }

    fn apply_backend_event(inner: &mut Inner, event: BackendEvent) {
        match event {
            BackendEvent::Published(sid) => inner.state_machine.on_published(sid, &mut inner.demux),
            BackendEvent::Unpublished(sid) => inner.state_machine.on_unpublished(sid, &mut inner.demux),
            BackendEvent::StepResult(sid, step, ok) => inner.state_machine.on_step_result(sid, step, ok, &mut inner.demux),
            BackendEvent::Flushed(sid, version) => inner.state_machine.on_flushed(sid, version, &mut inner.demux),
            BackendEvent::ExpirationEnabled(sid) => inner.state_machine.on_expiration_enabled(sid, &mut inner.demux),
            BackendEvent::ExpirationDisabled(sid) => inner.state_machine.on_expiration_disabled(sid, &mut inner.demux),
            BackendEvent::Expired(sid) => inner.state_machine.on_expired(sid, &mut inner.demux),
            BackendEvent::Recovered(sid) => inner.state_machine.on_expiration_recovered(sid, &mut inner.demux),

            BackendEvent::OffscreenBufferLinkResult(bid, consumer, slot, ok) => {
                inner.link_manager.record_link_result(consumer, slot, LinkSource::Offscreen(bid), ok);
                inner.demux.stage(Event::OffscreenBufferLinked(bid, consumer, slot, ok));
            }
            BackendEvent::StreamBufferLinkResult(sbid, consumer, slot, ok) => {
                inner.link_manager.record_link_result(consumer, slot, LinkSource::Stream(sbid), ok);
                inner.demux.stage(Event::StreamBufferLinked(sbid, consumer, slot, ok));
            }
            BackendEvent::ExternalBufferLinkResult(ebid, consumer, slot, ok) => {
                inner.link_manager.record_link_result(consumer, slot, LinkSource::External(ebid), ok);
                inner.demux.stage(Event::ExternalBufferLinked(ebid, consumer, slot, ok));
            }
            BackendEvent::DataLinkResult(provider, provider_slot, consumer, consumer_slot, ok) => {
                inner
                    .link_manager
                    .record_link_result(consumer, consumer_slot, LinkSource::Data(provider, provider_slot), ok);
                inner
                    .demux
                    .stage(Event::DataLinked(provider, provider_slot, consumer, consumer_slot, ok));
            }
            BackendEvent::DataUnlinkResult(consumer, consumer_slot, ok) => {
                inner.link_manager.record_unlink_result(consumer, consumer_slot, ok);
                inner.demux.stage(Event::DataUnlinked(consumer, consumer_slot, ok));
            }
            BackendEvent::ProviderSlotCreated(sid, slot, ty) => {
                inner.link_manager.provider_slot_created(sid, slot, ty);
                inner.demux.stage(Event::ProviderSlotCreated(sid, slot, ty));
            }
            BackendEvent::ProviderSlotDestroyed(sid, slot) => {
                inner.link_manager.provider_slot_destroyed(sid, slot);
                inner.demux.stage(Event::ProviderSlotDestroyed(sid, slot));
            }
            BackendEvent::ConsumerSlotCreated(sid, slot, ty) => {
                inner.link_manager.consumer_slot_created(sid, slot, ty);
                inner.demux.stage(Event::ConsumerSlotCreated(sid, slot, ty));
            }
            BackendEvent::ConsumerSlotDestroyed(sid, slot) => {
                inner.link_manager.consumer_slot_destroyed(sid, slot);
                inner.demux.stage(Event::ConsumerSlotDestroyed(sid, slot));
            }
            BackendEvent::OffscreenBufferRegistered(bid, did) => {
                inner.registry.register_offscreen_buffer(bid, did, BufferKind::Offscreen);
            }
            BackendEvent::OffscreenBufferDestroyed(bid) => {
                inner.registry.unregister_offscreen_buffer(bid);
            }
            BackendEvent::ObjectsPicked(sid, objects) => inner.demux.stage(Event::ObjectsPicked(sid, objects)),
            BackendEvent::StreamAvailabilityChanged(sbid, available) => {
                inner.demux.stage(Event::StreamAvailabilityChanged(sbid, available));
            }
        }
    }

    /// Drains every event staged since the last call and invokes `handler`
    /// for each, in arrival order. The borrow is released between each
    /// individual event delivery, so `handler` may itself call `flush`,
    /// enqueue more commands, or call `dispatch_events` again.
    pub fn dispatch_events(&self, handler: &mut impl EventHandler) {
        let is_outermost = self.inner.borrow_mut().demux.enter_dispatch();
        loop {
            let event = self.inner.borrow_mut().demux.pop_for_dispatch();
            match event {
                Some(event) => event.dispatch(handler),
                None => break,
            }
        }
        if is_outermost {
            self.inner.borrow_mut().demux.exit_dispatch();
        }
    }
}
