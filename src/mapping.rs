//! Guards and records the mapping configuration a scene needs before the
//! state machine can step it into `Ready`.

use fxhash::FxHashMap;

use crate::errors::ApiError;
use crate::ids::{BufferId, DisplayId, SceneId};
use crate::record::SceneControlRecord;

/// The kind of buffer a [`BufferId`] names, as reported by the display
/// subsystem when the buffer is registered. Scheduling across buffer kinds
/// is a display-subsystem concern, out of scope here; the control plane
/// only needs the kind well enough to validate registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Offscreen,
    Framebuffer,
    InterruptibleOffscreen,
}

/// Tracks which displays the embedding application has made known to the
/// control plane, and each one's implicit framebuffer.
///
/// Display creation itself is out of scope (owned by the display/window
/// platform); this registry is just enough bookkeeping for the control
/// plane to normalize buffer assignments and validate links against it.
#[derive(Debug, Default)]
pub struct DisplayRegistry {
    framebuffers: FxHashMap<DisplayId, BufferId>,
    buffer_kinds: FxHashMap<BufferId, BufferKind>,
    buffer_owners: FxHashMap<BufferId, DisplayId>,
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_display(&mut self, did: DisplayId, framebuffer: BufferId) {
        self.framebuffers.insert(did, framebuffer);
        self.buffer_kinds.insert(framebuffer, BufferKind::Framebuffer);
        self.buffer_owners.insert(framebuffer, did);
    }

    pub fn unregister_display(&mut self, did: DisplayId) {
        if let Some(fb) = self.framebuffers.remove(&did) {
            self.buffer_kinds.remove(&fb);
            self.buffer_owners.remove(&fb);
        }
        self.buffer_owners.retain(|_, owner| *owner != did);
    }

    pub fn register_offscreen_buffer(&mut self, bid: BufferId, owner: DisplayId, kind: BufferKind) {
        self.buffer_kinds.insert(bid, kind);
        self.buffer_owners.insert(bid, owner);
    }

    pub fn unregister_offscreen_buffer(&mut self, bid: BufferId) {
        self.buffer_kinds.remove(&bid);
        self.buffer_owners.remove(&bid);
    }

    pub fn is_known(&self, did: DisplayId) -> bool {
        self.framebuffers.contains_key(&did)
    }

    pub fn framebuffer_of(&self, did: DisplayId) -> Option<BufferId> {
        self.framebuffers.get(&did).copied()
    }

    pub fn owner_of_buffer(&self, bid: BufferId) -> Option<DisplayId> {
        self.buffer_owners.get(&bid).copied()
    }

    pub fn kind_of_buffer(&self, bid: BufferId) -> Option<BufferKind> {
        self.buffer_kinds.get(&bid).copied()
    }
}

/// Records `did` as `sid`'s mapped display, clearing the buffer assignment
/// to "framebuffer of `did`" and zeroing `render_order`.
///
/// Only permitted while both `current_state` and `target_state` are below
/// `Ready` (invariant 2): a scene's resources are bound to the display
/// context, so changing display first requires returning the scene below
/// `Ready`.
pub fn set_mapping(
    sid: SceneId,
    record: &mut SceneControlRecord,
    registry: &DisplayRegistry,
    did: DisplayId,
) -> Result<(), ApiError> {
    if !registry.is_known(did) {
        return Err(ApiError::UnknownDisplay(did));
    }
    if !record.mapping_mutable() {
        return Err(ApiError::MappingLocked(sid));
    }

    record.mapping_display = Some(did);
    record.mapping_buffer = None;
    record.render_order = 0;
    record.mapping_set = true;
    Ok(())
}

/// Records a buffer assignment for `sid`, normalizing `bid` to `None`
/// ("framebuffer") when it names the mapped display's own framebuffer.
///
/// Permitted at any time once a mapping has been set (unlike `set_mapping`,
/// this is not locked to `current_state`/`target_state`).
pub fn set_buffer_assignment(
    sid: SceneId,
    record: &mut SceneControlRecord,
    registry: &DisplayRegistry,
    bid: Option<BufferId>,
    render_order: i32,
) -> Result<(), ApiError> {
    let did = record
        .mapping_display
        .ok_or(ApiError::AssignmentWithoutMapping(sid))?;
    let framebuffer = registry.framebuffer_of(did);

    record.mapping_buffer = match bid {
        Some(bid) if Some(bid) == framebuffer => None,
        other => other,
    };
    record.render_order = render_order;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SceneState;

    fn registry_with_display(did: DisplayId, fb: BufferId) -> DisplayRegistry {
        let mut r = DisplayRegistry::new();
        r.register_display(did, fb);
        r
    }

    #[test]
    fn set_mapping_clears_buffer_and_order() {
        let registry = registry_with_display(DisplayId(1), BufferId(100));
        let mut record = SceneControlRecord::default();
        record.render_order = 5;
        record.mapping_buffer = Some(BufferId(7));

        set_mapping(SceneId(1), &mut record, &registry, DisplayId(1)).unwrap();

        assert_eq!(record.mapping_display, Some(DisplayId(1)));
        assert_eq!(record.mapping_buffer, None);
        assert_eq!(record.render_order, 0);
        assert!(record.mapping_set);
    }

    #[test]
    fn set_mapping_rejected_when_locked() {
        let registry = registry_with_display(DisplayId(1), BufferId(100));
        let mut record = SceneControlRecord::default();
        record.current_state = SceneState::Ready;
        record.target_state = SceneState::Ready;

        assert!(set_mapping(SceneId(1), &mut record, &registry, DisplayId(1)).is_err());
    }

    #[test]
    fn set_mapping_rejected_for_unknown_display() {
        let registry = DisplayRegistry::new();
        let mut record = SceneControlRecord::default();
        assert_eq!(
            set_mapping(SceneId(1), &mut record, &registry, DisplayId(9)),
            Err(ApiError::UnknownDisplay(DisplayId(9)))
        );
    }

    #[test]
    fn buffer_assignment_normalizes_framebuffer_to_null() {
        let registry = registry_with_display(DisplayId(1), BufferId(100));
        let mut record = SceneControlRecord::default();
        set_mapping(SceneId(1), &mut record, &registry, DisplayId(1)).unwrap();

        set_buffer_assignment(SceneId(1), &mut record, &registry, Some(BufferId(100)), 3).unwrap();
        assert_eq!(record.mapping_buffer, None);
        assert_eq!(record.render_order, 3);

        set_buffer_assignment(SceneId(1), &mut record, &registry, None, 3).unwrap();
        assert_eq!(record.mapping_buffer, None);
    }

    #[test]
    fn buffer_assignment_without_mapping_is_rejected() {
        let registry = DisplayRegistry::new();
        let mut record = SceneControlRecord::default();
        assert!(set_buffer_assignment(SceneId(1), &mut record, &registry, Some(BufferId(5)), 0).is_err());
    }
}
