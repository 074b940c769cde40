//! The scene lifecycle and the single-notch steps that move through it.

use std::fmt;

/// Per-scene lifecycle state, as mirrored on the client.
///
/// Ordering is meaningful: it defines both "higher" and the direction the
/// state machine drives in (see [`SceneState::step_toward`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SceneState {
    Unavailable = 0,
    Available = 1,
    Ready = 2,
    Rendered = 3,
}

impl SceneState {
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Inverse of the `repr(u8)` cast, for decoding the wire form.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unavailable),
            1 => Some(Self::Available),
            2 => Some(Self::Ready),
            3 => Some(Self::Rendered),
            _ => None,
        }
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unavailable => "unavailable",
            Self::Available => "available",
            Self::Ready => "ready",
            Self::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

/// A single-notch transition the state machine can actively drive.
///
/// `Unavailable -> Available` is deliberately absent: that step only ever
/// happens passively, in response to a `Published` event from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Map,
    Show,
    Hide,
    Unmap,
    Release,
}

impl Step {
    /// The state this step departs from.
    pub fn from_state(self) -> SceneState {
        match self {
            Self::Map => SceneState::Available,
            Self::Show => SceneState::Ready,
            Self::Hide => SceneState::Rendered,
            Self::Unmap => SceneState::Ready,
            Self::Release => SceneState::Available,
        }
    }

    /// The state this step arrives at, on success.
    pub fn to_state(self) -> SceneState {
        match self {
            Self::Map => SceneState::Ready,
            Self::Show => SceneState::Rendered,
            Self::Hide => SceneState::Ready,
            Self::Unmap => SceneState::Available,
            Self::Release => SceneState::Unavailable,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Map => "map",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Unmap => "unmap",
            Self::Release => "release",
        };
        f.write_str(name)
    }
}

/// Computes the single step that moves `current` one notch toward `target`,
/// per the driving rule in the scene state machine.
///
/// Returns `None` when `current == target` (nothing to drive) or when
/// `current == Unavailable` and `target > current`: that step is passive and
/// only happens in response to a `Published` event, never issued by us.
pub fn step_toward(current: SceneState, target: SceneState) -> Option<Step> {
    use SceneState::{Available, Ready, Rendered, Unavailable};

    match current.rank().cmp(&target.rank()) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => match current {
            Available => Some(Step::Map),
            Ready => Some(Step::Show),
            Unavailable | Rendered => None,
        },
        std::cmp::Ordering::Greater => match current {
            Rendered => Some(Step::Hide),
            Ready => Some(Step::Unmap),
            Available => Some(Step::Release),
            Unavailable => None,
        },
    }
}

/// The state one rank below `state`, or `None` if already `Unavailable`.
///
/// Used to collapse an unpublish down to `Unavailable` one notch at a time,
/// so each notch still gets its own `SceneStateChanged` event.
pub fn rank_down(state: SceneState) -> Option<SceneState> {
    match state {
        SceneState::Rendered => Some(SceneState::Ready),
        SceneState::Ready => Some(SceneState::Available),
        SceneState::Available => Some(SceneState::Unavailable),
        SceneState::Unavailable => None,
    }
}
