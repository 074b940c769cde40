//! Tunables the spec leaves implementation-defined.
//!
//! Unlike the heavier crates in this workspace, the control plane does not
//! own file or environment loading: it just exposes a `Deserialize`-able
//! struct and trusts the embedding application to populate it however it
//! populates everything else.

use serde::Deserialize;

/// Scheduling tunables for [`crate::control::SceneControl::do_one_loop`].
///
/// Neither field changes the driving rule itself (§4.2): they only bound how
/// much work a single tick does and how eagerly a failed step is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of step commands issued across all scenes per tick.
    /// `0` means unbounded, matching the spec's literal behavior.
    pub tick_budget: u32,

    /// Minimum number of ticks between a failed step and its retry. `0`
    /// retries on the very next tick, matching "retries repeat indefinitely".
    pub retry_backoff_ticks: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_budget: 0,
            retry_backoff_ticks: 0,
        }
    }
}
