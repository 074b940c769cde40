//! Synchronous, API-level errors.
//!
//! These are returned directly from the call that violated a pre-condition
//! and never result in a command being enqueued or an event being produced.
//! Operation-level (asynchronous) failures are not modeled as errors at all:
//! per the control plane's error taxonomy they are `result` fields on events
//! (see [`crate::events::Event`]).

use thiserror::Error;

use crate::ids::{DisplayId, SceneId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("scene {0} has no mapping set; set_scene_mapping must be called before requesting a state >= Ready")]
    NoMapping(SceneId),

    #[error("scene {0} cannot change mapping while current or target state is >= Ready")]
    MappingLocked(SceneId),

    #[error("scene {0} has no mapping set; set_scene_mapping must be called before a buffer assignment")]
    AssignmentWithoutMapping(SceneId),

    #[error("link rejected: provider and consumer scene are both {0}")]
    SelfLink(SceneId),

    #[error("display {0} is unknown to the control plane")]
    UnknownDisplay(DisplayId),

    #[error("set_scene_state(Unavailable) is not accepted; use Available to release a scene")]
    IllegalState,
}

pub type Result<T> = std::result::Result<T, ApiError>;
