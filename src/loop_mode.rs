//! Enforces the hosted-loop / owned-thread exclusivity rule and provides the
//! owned-thread convenience runner.
//!
//! The driving loop itself (`do_one_loop`) stays on whichever thread the
//! embedding application chooses; this module only (a) enforces that an
//! application picks one mode and sticks with it, and (b) offers a small
//! `crossbeam-channel`-backed thread runner for the owned-thread case, the
//! same pattern `lgn-presenter` uses for its render thread.

use std::thread::JoinHandle;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Hosted,
    Owned,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    #[error("owned-thread mode is already active; do_one_loop cannot be called directly")]
    AlreadyOwned,
    #[error("hosted-loop mode is already active; it cannot switch to owned-thread mode")]
    AlreadyHosted,
}

/// Tracks which of the two operation modes (§5) has been entered, once a
/// `SceneControl` has committed to one it may never switch to the other.
#[derive(Debug, Default)]
pub struct LoopMode {
    mode: Option<Mode>,
}

impl LoopMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_hosted(&mut self) -> Result<(), ModeError> {
        match self.mode {
            None => {
                self.mode = Some(Mode::Hosted);
                Ok(())
            }
            Some(Mode::Hosted) => Ok(()),
            Some(Mode::Owned) => Err(ModeError::AlreadyOwned),
        }
    }

    pub fn enter_owned(&mut self) -> Result<(), ModeError> {
        match self.mode {
            None => {
                self.mode = Some(Mode::Owned);
                Ok(())
            }
            Some(Mode::Owned) => Ok(()),
            Some(Mode::Hosted) => Err(ModeError::AlreadyHosted),
        }
    }
}

/// A running owned-thread loop. Dropping this without calling
/// [`OwnedLoopHandle::stop_thread`] leaves the thread running detached.
pub struct OwnedLoopHandle {
    stop_tx: crossbeam_channel::Sender<()>,
    join_handle: Option<JoinHandle<()>>,
}

/// Spawns a thread that calls `tick` in a loop until [`OwnedLoopHandle::stop_thread`]
/// is called. The stop signal is only checked between ticks, so whatever
/// `tick` already flushed is fully processed before the thread exits.
pub fn spawn_owned_thread(mut tick: impl FnMut() + Send + 'static) -> OwnedLoopHandle {
    let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
    let join_handle = std::thread::spawn(move || loop {
        tick();
        if stop_rx.try_recv().is_ok() {
            break;
        }
    });
    OwnedLoopHandle { stop_tx, join_handle: Some(join_handle) }
}

impl OwnedLoopHandle {
    /// Signals the loop thread to stop after its current tick and joins it.
    pub fn stop_thread(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for OwnedLoopHandle {
    fn drop(&mut self) {
        if self.join_handle.is_some() {
            log::warn!("OwnedLoopHandle dropped without stop_thread(); loop thread left detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_then_hosted_is_idempotent() {
        let mut mode = LoopMode::new();
        assert!(mode.enter_hosted().is_ok());
        assert!(mode.enter_hosted().is_ok());
    }

    #[test]
    fn hosted_then_owned_is_rejected() {
        let mut mode = LoopMode::new();
        mode.enter_hosted().unwrap();
        assert_eq!(mode.enter_owned(), Err(ModeError::AlreadyHosted));
    }

    #[test]
    fn owned_then_hosted_is_rejected() {
        let mut mode = LoopMode::new();
        mode.enter_owned().unwrap();
        assert_eq!(mode.enter_hosted(), Err(ModeError::AlreadyOwned));
    }

    #[test]
    fn owned_thread_runs_until_stopped() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let handle = spawn_owned_thread(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(1));
        });
        std::thread::sleep(std::time::Duration::from_millis(20));
        handle.stop_thread();
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }
}
