//! A blocking convenience helper layered outside the non-blocking core.
//!
//! `do_one_loop` and `dispatch_events` never block; this is the only place
//! in the crate that spins the caller's own thread on a predicate, and it
//! always takes an explicit deadline so it can't hang forever. Not meant to
//! replace a caller's own event loop — just a building block for small
//! examples and tests.

use instant::{Duration, Instant};

use crate::control::SceneControl;
use crate::events::EventHandler;
use crate::loop_mode::ModeError;

/// Runs `do_one_loop` + `dispatch_events` in a loop, forwarding every
/// dispatched event to `handler`, until `predicate(control)` returns `true`
/// or `deadline` elapses.
///
/// Returns `true` if `predicate` was satisfied before the deadline.
pub fn wait_until(
    control: &SceneControl,
    handler: &mut impl EventHandler,
    deadline: Duration,
    mut predicate: impl FnMut(&SceneControl) -> bool,
) -> Result<bool, ModeError> {
    let start = Instant::now();
    loop {
        if predicate(control) {
            return Ok(true);
        }
        if start.elapsed() >= deadline {
            return Ok(false);
        }
        control.do_one_loop()?;
        control.dispatch_events(handler);
    }
}
