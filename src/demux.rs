//! Consumes the renderer's event stream and delivers typed callbacks.

use std::collections::VecDeque;

use fxhash::FxHashMap;

use crate::events::{Event, EventHandler};
use crate::ids::SceneId;
use crate::state::SceneState;

/// Maintains the client-side mirror of each scene's `current_state` and
/// drains staged events into typed callbacks.
///
/// Every raw event corresponds to exactly one handler call. A
/// `SceneStateChanged` event updates the mirror *before* the handler is
/// invoked, so a callback re-entering the API observes the new state.
///
/// The dispatch loop is split into [`EventDemultiplexer::enter_dispatch`],
/// [`EventDemultiplexer::pop_for_dispatch`] and
/// [`EventDemultiplexer::exit_dispatch`] rather than folded into one
/// `&mut self` loop, specifically so [`crate::control::SceneControl`] can
/// release its lock between events: a user callback is allowed to call back
/// into `flush`/`dispatch_events`, and that only works in safe Rust if the
/// lock isn't still held while the callback runs.
#[derive(Debug, Default)]
pub struct EventDemultiplexer {
    staged: VecDeque<Event>,
    mirror: FxHashMap<SceneId, SceneState>,
    /// Remaining budget for the current (possibly nested) dispatch call
    /// stack: set to the queue length when the outermost call starts, and
    /// shared by any nested call so events appended by a callback's own side
    /// effects are never delivered until a later, separate drain.
    horizon: Option<usize>,
}

impl EventDemultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages an event for the next `dispatch_events` drain.
    pub(crate) fn stage(&mut self, event: Event) {
        self.staged.push_back(event);
    }

    /// The client-side mirror of a scene's `current_state`.
    ///
    /// A scene never seen before mirrors as `Unavailable`, matching the
    /// record's own default.
    pub fn current_state(&self, sid: SceneId) -> SceneState {
        self.mirror.get(&sid).copied().unwrap_or(SceneState::Unavailable)
    }

    /// Establishes the dispatch horizon if none is active yet. Returns
    /// whether this call is the outermost one (and therefore responsible for
    /// calling [`Self::exit_dispatch`] once draining is done).
    pub(crate) fn enter_dispatch(&mut self) -> bool {
        if self.horizon.is_none() {
            self.horizon = Some(self.staged.len());
            true
        } else {
            false
        }
    }

    /// Pops and mirror-updates the next event within the current horizon, or
    /// `None` once the horizon is exhausted.
    pub(crate) fn pop_for_dispatch(&mut self) -> Option<Event> {
        let remaining = self.horizon.as_mut()?;
        if *remaining == 0 {
            return None;
        }
        let event = self.staged.pop_front()?;
        *remaining -= 1;

        if let Event::SceneStateChanged(sid, state) = &event {
            self.mirror.insert(*sid, *state);
        }

        Some(event)
    }

    pub(crate) fn exit_dispatch(&mut self) {
        self.horizon = None;
    }

    /// Convenience, non-reentrant drain for callers (and tests) that don't
    /// need `SceneControl`'s lock-release-between-events dance.
    pub fn dispatch_events(&mut self, handler: &mut impl EventHandler) {
        let is_outermost = self.enter_dispatch();
        while let Some(event) = self.pop_for_dispatch() {
            event.dispatch(handler);
        }
        if is_outermost {
            self.exit_dispatch();
        }
    }

    #[cfg(test)]
    pub(crate) fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SceneId;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(Vec<SceneState>);
    impl EventHandler for Recorder {
        fn on_scene_state_changed(&mut self, _sid: SceneId, state: SceneState) {
            self.0.push(state);
        }
    }

    #[test]
    fn mirror_updates_before_callback_is_invoked() {
        let demux = RefCell::new(EventDemultiplexer::new());
        demux
            .borrow_mut()
            .stage(Event::SceneStateChanged(SceneId(1), SceneState::Ready));

        struct ReentrantChecker<'a> {
            demux: &'a RefCell<EventDemultiplexer>,
            observed: Option<SceneState>,
        }
        impl EventHandler for ReentrantChecker<'_> {
            fn on_scene_state_changed(&mut self, sid: SceneId, _state: SceneState) {
                self.observed = Some(self.demux.borrow().current_state(sid));
            }
        }

        let mut checker = ReentrantChecker { demux: &demux, observed: None };
        let is_outermost = demux.borrow_mut().enter_dispatch();
        while let Some(event) = demux.borrow_mut().pop_for_dispatch() {
            event.dispatch(&mut checker);
        }
        if is_outermost {
            demux.borrow_mut().exit_dispatch();
        }
        assert_eq!(checker.observed, Some(SceneState::Ready));
    }

    #[test]
    fn nested_dispatch_only_drains_original_horizon() {
        fn drain(demux: &RefCell<EventDemultiplexer>, handler: &mut impl EventHandler) {
            let is_outermost = demux.borrow_mut().enter_dispatch();
            loop {
                let event = demux.borrow_mut().pop_for_dispatch();
                match event {
                    Some(event) => event.dispatch(handler),
                    None => break,
                }
            }
            if is_outermost {
                demux.borrow_mut().exit_dispatch();
            }
        }

        struct Nested<'a> {
            demux: &'a RefCell<EventDemultiplexer>,
            seen: Vec<SceneState>,
            injected: bool,
        }
        impl EventHandler for Nested<'_> {
            fn on_scene_state_changed(&mut self, sid: SceneId, state: SceneState) {
                self.seen.push(state);
                if !self.injected {
                    self.injected = true;
                    self.demux
                        .borrow_mut()
                        .stage(Event::SceneStateChanged(sid, SceneState::Rendered));
                    let mut inner = Recorder::default();
                    drain(self.demux, &mut inner);
                    assert!(inner.0.is_empty(), "inner drain must not see the just-staged event");
                }
            }
        }

        let demux = RefCell::new(EventDemultiplexer::new());
        demux
            .borrow_mut()
            .stage(Event::SceneStateChanged(SceneId(1), SceneState::Available));

        let mut handler = Nested { demux: &demux, seen: Vec::new(), injected: false };
        drain(&demux, &mut handler);

        assert_eq!(handler.seen, vec![SceneState::Available]);
        assert_eq!(demux.borrow().staged_len(), 1);
    }
}
