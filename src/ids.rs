//! Opaque handles used throughout the control plane.

use std::fmt;

/// 64-bit opaque handle, unique per control plane, identifying a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u64);

/// 32-bit opaque handle denoting a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub u32);

/// 32-bit opaque handle for a display buffer (framebuffer or offscreen buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// 32-bit opaque handle for an externally produced stream buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamBufferId(pub u32);

/// 32-bit opaque handle for an externally produced buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalBufferId(pub u32);

/// 32-bit identifier for a data slot (provider or consumer) defined inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataSlotId(pub u32);

/// Identifier of a pickable object, as returned by a hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickableId(pub u32);

macro_rules! impl_display_as_inner {
    ($($ty:ident),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

impl_display_as_inner!(
    SceneId,
    DisplayId,
    BufferId,
    StreamBufferId,
    ExternalBufferId,
    DataSlotId,
    PickableId
);

/// The type tag carried by a data slot, as reported by the renderer when the
/// slot is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSlotType {
    Transform,
    Float,
    Vec2i,
    Vec4f,
    TextureSampler,
    ViewportOffset,
    ViewportSize,
}
