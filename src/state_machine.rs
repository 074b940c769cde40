//! Per-scene lifecycle driver: issues the step commands that move each
//! scene's `current_state` toward its `target_state`, and folds the
//! backend's scene-lifecycle events back into the authoritative record.
//!
//! This module owns the authoritative [`SceneControlRecord`] for every SID
//! the control plane has ever touched. It is distinct from the mirror kept
//! by [`crate::demux::EventDemultiplexer`]: that mirror only updates as
//! staged events are actually drained by the caller, while the record here
//! is updated the instant a backend event is observed, so driving decisions
//! never wait on the caller's `dispatch_events` cadence.

use fxhash::FxHashMap;
use log::{debug, error, trace, warn};

use crate::backend::SceneBackend;
use crate::config::Config;
use crate::demux::EventDemultiplexer;
use crate::events::Event;
use crate::ids::SceneId;
use crate::record::SceneControlRecord;
use crate::state::{rank_down, step_toward, SceneState, Step};

#[derive(Debug, Default)]
pub struct StateMachine {
    records: FxHashMap<SceneId, SceneControlRecord>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mut(&mut self, sid: SceneId) -> &mut SceneControlRecord {
        self.records.entry(sid).or_default()
    }

    pub fn record(&self, sid: SceneId) -> Option<&SceneControlRecord> {
        self.records.get(&sid)
    }

    /// Records a new `target_state` for `sid`. Pre-condition checks
    /// (`NoMapping`, `IllegalState`) are the API layer's job; by the time
    /// this is called the request is already known-valid.
    pub fn set_target_state(&mut self, sid: SceneId, state: SceneState) {
        self.record_mut(sid).target_state = state;
    }

    /// Drives every scene whose `current_state != target_state` one step
    /// closer, issuing at most one outstanding step per scene and honoring
    /// `tick_budget`/`retry_backoff_ticks`.
    pub fn tick(&mut self, backend: &mut dyn SceneBackend, config: &Config) {
        let mut issued = 0u32;
        for (sid, record) in &mut self.records {
            if config.tick_budget != 0 && issued >= config.tick_budget {
                break;
            }
            if record.outstanding_step.is_some() {
                continue;
            }
            if record.ticks_since_failure > 0 {
                if record.ticks_since_failure < config.retry_backoff_ticks {
                    record.ticks_since_failure += 1;
                    continue;
                }
                record.ticks_since_failure = 0;
            }

            let Some(step) = step_toward(record.current_state, record.target_state) else {
                continue;
            };

            match step {
                Step::Map => match record.mapping_display {
                    Some(did) => backend.begin_map(*sid, did, record.mapping_buffer, record.render_order),
                    None => {
                        error!("scene {sid}: driving into Map with no mapping set, skipping tick");
                        continue;
                    }
                },
                Step::Show => backend.begin_show(*sid),
                Step::Hide => backend.begin_hide(*sid),
                Step::Unmap => backend.begin_unmap(*sid),
                Step::Release => backend.begin_release(*sid),
            }

            trace!("scene {sid}: issued {step}");
            record.outstanding_step = Some(step);
            issued += 1;
        }
    }

    pub fn on_published(&mut self, sid: SceneId, demux: &mut EventDemultiplexer) {
        let record = self.record_mut(sid);
        if record.current_state != SceneState::Unavailable {
            warn!("scene {sid}: publish event while already >= Available, ignoring");
            return;
        }
        record.current_state = SceneState::Available;
        if record.target_state == SceneState::Unavailable {
            if let Some(target) = record.pre_unpublish_target.take() {
                debug!("scene {sid}: republished, resuming toward {target}");
                record.target_state = target;
            }
        }
        demux.stage(Event::SceneStateChanged(sid, SceneState::Available));
    }

    /// Rolls `sid`'s mirror back to `Unavailable`, one rank at a time,
    /// staging a `SceneStateChanged` for every intermediate rank — mirroring
    /// the sequence of indirect teardown events the renderer itself would
    /// report on a real unpublish.
    pub fn on_unpublished(&mut self, sid: SceneId, demux: &mut EventDemultiplexer) {
        let record = self.record_mut(sid);
        if record.current_state == SceneState::Unavailable {
            return;
        }
        debug!("scene {sid}: unpublished, stepping mirror down to Unavailable");
        record.pre_unpublish_target = Some(record.target_state);
        record.target_state = SceneState::Unavailable;
        record.outstanding_step = None;
        record.ticks_since_failure = 0;

        while let Some(next) = rank_down(record.current_state) {
            record.current_state = next;
            demux.stage(Event::SceneStateChanged(sid, next));
        }
    }

    pub fn on_step_result(&mut self, sid: SceneId, step: Step, ok: bool, demux: &mut EventDemultiplexer) {
        let Some(record) = self.records.get_mut(&sid) else {
            error!("step result for scene {sid} with no record, ignoring");
            return;
        };

        if record.outstanding_step != Some(step) {
            debug!("scene {sid}: ignoring stale {step} result (absorbed by an intervening unpublish)");
            return;
        }
        record.outstanding_step = None;

        if ok {
            record.current_state = step.to_state();
            record.ticks_since_failure = 0;
            demux.stage(Event::SceneStateChanged(sid, record.current_state));
        } else {
            warn!("scene {sid}: {step} failed, scheduling retry");
            record.ticks_since_failure = 1;
        }
    }

    pub fn on_flushed(&mut self, sid: SceneId, version: u64, demux: &mut EventDemultiplexer) {
        self.record_mut(sid).last_known_version = Some(version);
        demux.stage(Event::SceneFlushed(sid, version));
    }

    pub fn on_expiration_enabled(&mut self, sid: SceneId, demux: &mut EventDemultiplexer) {
        demux.stage(Event::SceneExpirationEnabled(sid));
    }

    pub fn on_expiration_disabled(&mut self, sid: SceneId, demux: &mut EventDemultiplexer) {
        demux.stage(Event::SceneExpirationDisabled(sid));
    }

    pub fn on_expired(&mut self, sid: SceneId, demux: &mut EventDemultiplexer) {
        demux.stage(Event::SceneExpired(sid));
    }

    pub fn on_expiration_recovered(&mut self, sid: SceneId, demux: &mut EventDemultiplexer) {
        demux.stage(Event::SceneExpirationRecovered(sid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, ScriptedBackend};

    #[test]
    fn drives_available_to_rendered_over_two_ticks() {
        let mut sm = StateMachine::new();
        let sid = SceneId(33);
        sm.record_mut(sid).current_state = SceneState::Available;
        sm.set_target_state(sid, SceneState::Rendered);
        sm.record_mut(sid).mapping_display = Some(crate::ids::DisplayId(1));
        sm.record_mut(sid).mapping_set = true;

        let mut backend = ScriptedBackend::new();
        let mut demux = EventDemultiplexer::new();
        let config = Config::default();

        sm.tick(&mut backend, &config);
        assert_eq!(backend.calls, vec![Call::Map(sid, crate::ids::DisplayId(1), None, 0)]);
        sm.on_step_result(sid, Step::Map, true, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Ready);

        backend.calls.clear();
        sm.tick(&mut backend, &config);
        assert_eq!(backend.calls, vec![Call::Show(sid)]);
        sm.on_step_result(sid, Step::Show, true, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Rendered);
    }

    #[test]
    fn at_most_one_outstanding_step_per_scene() {
        let mut sm = StateMachine::new();
        let sid = SceneId(1);
        sm.record_mut(sid).current_state = SceneState::Available;
        sm.record_mut(sid).mapping_display = Some(crate::ids::DisplayId(1));
        sm.set_target_state(sid, SceneState::Ready);

        let mut backend = ScriptedBackend::new();
        let config = Config::default();
        sm.tick(&mut backend, &config);
        sm.tick(&mut backend, &config);
        assert_eq!(backend.calls.len(), 1, "second tick must not re-issue while a step is outstanding");
    }

    #[test]
    fn failed_step_retries_on_next_tick_with_zero_backoff() {
        let mut sm = StateMachine::new();
        let sid = SceneId(1);
        sm.record_mut(sid).current_state = SceneState::Available;
        sm.record_mut(sid).mapping_display = Some(crate::ids::DisplayId(1));
        sm.set_target_state(sid, SceneState::Ready);

        let mut backend = ScriptedBackend::new();
        let mut demux = EventDemultiplexer::new();
        let config = Config::default();

        sm.tick(&mut backend, &config);
        sm.on_step_result(sid, Step::Map, false, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Available, "no state change on failure");

        backend.calls.clear();
        sm.tick(&mut backend, &config);
        assert_eq!(backend.calls, vec![Call::Map(sid, crate::ids::DisplayId(1), None, 0)]);
    }

    #[test]
    fn retry_backoff_delays_the_retry() {
        let mut sm = StateMachine::new();
        let sid = SceneId(1);
        sm.record_mut(sid).current_state = SceneState::Available;
        sm.record_mut(sid).mapping_display = Some(crate::ids::DisplayId(1));
        sm.set_target_state(sid, SceneState::Ready);

        let mut backend = ScriptedBackend::new();
        let mut demux = EventDemultiplexer::new();
        let config = Config { tick_budget: 0, retry_backoff_ticks: 2 };

        sm.tick(&mut backend, &config);
        sm.on_step_result(sid, Step::Map, false, &mut demux);

        backend.calls.clear();
        sm.tick(&mut backend, &config);
        assert!(backend.calls.is_empty(), "first tick after failure is within the backoff window");

        sm.tick(&mut backend, &config);
        assert_eq!(backend.calls, vec![Call::Map(sid, crate::ids::DisplayId(1), None, 0)]);
    }

    #[test]
    fn stale_step_result_after_unpublish_is_absorbed_without_retry() {
        let mut sm = StateMachine::new();
        let sid = SceneId(33);
        sm.record_mut(sid).current_state = SceneState::Available;
        sm.record_mut(sid).mapping_display = Some(crate::ids::DisplayId(1));
        sm.set_target_state(sid, SceneState::Ready);

        let mut backend = ScriptedBackend::new();
        let mut demux = EventDemultiplexer::new();
        let config = Config::default();

        sm.tick(&mut backend, &config);
        sm.on_unpublished(sid, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Unavailable);
        assert_eq!(sm.record(sid).unwrap().target_state, SceneState::Unavailable);

        sm.on_step_result(sid, Step::Map, false, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Unavailable);
        assert_eq!(sm.record(sid).unwrap().ticks_since_failure, 0, "stale failure must not schedule a retry");
    }

    #[test]
    fn unpublish_from_rendered_steps_down_one_rank_at_a_time() {
        let mut sm = StateMachine::new();
        let sid = SceneId(1);
        sm.record_mut(sid).current_state = SceneState::Rendered;
        sm.set_target_state(sid, SceneState::Rendered);

        let mut demux = EventDemultiplexer::new();
        sm.on_unpublished(sid, &mut demux);

        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Unavailable);
        assert_eq!(sm.record(sid).unwrap().target_state, SceneState::Unavailable);

        #[derive(Default)]
        struct Recorder(Vec<SceneState>);
        impl crate::events::EventHandler for Recorder {
            fn on_scene_state_changed(&mut self, _sid: SceneId, state: SceneState) {
                self.0.push(state);
            }
        }

        let mut recorder = Recorder::default();
        demux.dispatch_events(&mut recorder);
        assert_eq!(recorder.0, vec![SceneState::Ready, SceneState::Available, SceneState::Unavailable]);
    }

    #[test]
    fn republish_resumes_toward_preserved_target() {
        let mut sm = StateMachine::new();
        let sid = SceneId(33);
        sm.record_mut(sid).mapping_display = Some(crate::ids::DisplayId(1));
        sm.set_target_state(sid, SceneState::Rendered);

        let mut demux = EventDemultiplexer::new();
        sm.on_published(sid, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Available);

        sm.on_unpublished(sid, &mut demux);
        assert_eq!(sm.record(sid).unwrap().target_state, SceneState::Unavailable);

        sm.on_published(sid, &mut demux);
        assert_eq!(sm.record(sid).unwrap().current_state, SceneState::Available);
        assert_eq!(sm.record(sid).unwrap().target_state, SceneState::Rendered);
    }
}
