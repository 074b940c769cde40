//! Scene-control plane for a distributed, client–renderer 3D scene-graph
//! runtime: the command queue, scene state machine, mapping/target-state
//! controller, data-link manager and event demultiplexer that drive a scene
//! through `Unavailable -> Available -> Ready -> Rendered` and report every
//! transition back to the embedding application.
//!
//! The scene graph, GPU resources, display platform and wire transport are
//! all external collaborators, modeled at the boundary as [`backend::SceneBackend`].
//! Everything in this crate is synchronous and non-blocking; see
//! [`control::SceneControl`] for the entry point and [`wait`] for the one
//! blocking convenience helper layered outside the core.

pub mod auto_show;
pub mod backend;
pub mod chaining;
pub mod codec;
pub mod commands;
pub mod config;
pub mod control;
pub mod demux;
pub mod errors;
pub mod events;
pub mod ids;
pub mod link_manager;
pub mod loop_mode;
pub mod mapping;
pub mod picking;
pub mod record;
pub mod state;
pub mod state_machine;
pub mod testing;
pub mod wait;

pub use auto_show::AutoShow;
pub use backend::{BackendEvent, NullBackend, SceneBackend};
pub use chaining::EventChainer;
pub use config::Config;
pub use control::SceneControl;
pub use errors::{ApiError, Result};
pub use events::{Event, EventHandler};
pub use ids::{BufferId, DataSlotId, DataSlotType, DisplayId, ExternalBufferId, PickableId, SceneId, StreamBufferId};
pub use loop_mode::{spawn_owned_thread, ModeError, OwnedLoopHandle};
pub use state::{SceneState, Step};
