//! Hit-test requests against a scene's pickable objects.

use crate::backend::SceneBackend;
use crate::ids::SceneId;

/// Buffer-normalized pick coordinates are valid only within this range on
/// each axis; anything outside produces an empty result without ever
/// reaching the backend.
const COORD_RANGE: std::ops::RangeInclusive<f32> = -1.0..=1.0;

/// Issues `HandlePick(sid, nx, ny)` against `backend`, unless the coordinates
/// fall outside `[-1, 1] x [-1, 1]`, in which case the request is dropped
/// before ever reaching the backend and the renderer sees no request at all.
pub fn handle_pick(backend: &mut dyn SceneBackend, sid: SceneId, nx: f32, ny: f32) {
    if COORD_RANGE.contains(&nx) && COORD_RANGE.contains(&ny) {
        backend.begin_pick(sid, nx, ny);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, ScriptedBackend};

    #[test]
    fn in_range_coordinates_reach_the_backend() {
        let mut backend = ScriptedBackend::new();
        handle_pick(&mut backend, SceneId(1), -0.38, 0.44);
        assert_eq!(backend.calls, vec![Call::Pick(SceneId(1), -0.38, 0.44)]);
    }

    #[test]
    fn out_of_range_coordinates_never_reach_the_backend() {
        let mut backend = ScriptedBackend::new();
        handle_pick(&mut backend, SceneId(1), -1.01, 0.0);
        handle_pick(&mut backend, SceneId(1), 0.0, 1.5);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn boundary_coordinates_are_in_range() {
        let mut backend = ScriptedBackend::new();
        handle_pick(&mut backend, SceneId(1), -1.0, 1.0);
        assert_eq!(backend.calls, vec![Call::Pick(SceneId(1), -1.0, 1.0)]);
    }
}
