//! The per-scene control record: one per SID known to the control plane.

use crate::ids::{BufferId, DisplayId};
use crate::state::{SceneState, Step};

/// Everything the control plane tracks for a single scene.
///
/// Created lazily on first API touch or first event mentioning the SID, and
/// never destroyed: its storage is reused if the scene is re-published.
#[derive(Debug, Clone)]
pub struct SceneControlRecord {
    /// Mirror of the renderer's reported state, driven only by events.
    pub current_state: SceneState,
    /// Authoritative user intent.
    pub target_state: SceneState,
    pub mapping_set: bool,
    pub mapping_display: Option<DisplayId>,
    /// `None` means "framebuffer of `mapping_display`".
    pub mapping_buffer: Option<BufferId>,
    pub render_order: i32,
    /// Opaque monotonic tag from the last applied content flush.
    pub last_known_version: Option<u64>,
    /// At most one step may be outstanding per scene (coalescing rule).
    pub(crate) outstanding_step: Option<Step>,
    /// Ticks since `outstanding_step`'s last failure, for `retry_backoff_ticks`.
    pub(crate) ticks_since_failure: u32,
    /// The target the user had requested right before an unpublish, kept
    /// only if the user's target has not since changed (§4.2 recovery rule).
    pub(crate) pre_unpublish_target: Option<SceneState>,
}

impl Default for SceneControlRecord {
    fn default() -> Self {
        Self {
            current_state: SceneState::Unavailable,
            target_state: SceneState::Unavailable,
            mapping_set: false,
            mapping_display: None,
            mapping_buffer: None,
            render_order: 0,
            last_known_version: None,
            outstanding_step: None,
            ticks_since_failure: 0,
            pre_unpublish_target: None,
        }
    }
}

impl SceneControlRecord {
    /// Mapping (display/buffer/order) may be mutated only while both
    /// `current_state` and `target_state` are below `Ready` (invariant 2).
    pub fn mapping_mutable(&self) -> bool {
        self.current_state < SceneState::Ready && self.target_state < SceneState::Ready
    }

    /// The buffer a link onto this scene's mapped display actually targets.
    pub fn effective_buffer(&self, framebuffer_of: BufferId) -> BufferId {
        self.mapping_buffer.unwrap_or(framebuffer_of)
    }
}
