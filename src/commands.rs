//! Flush-atomic, in-order submission of control-plane intents.

use crate::ids::{BufferId, DataSlotId, ExternalBufferId, SceneId, StreamBufferId};

/// A single control-plane intent, as recognized by the command queue.
///
/// Scene-state/mapping/buffer-assignment bookkeeping applies synchronously
/// at the API call instead of going through this queue — it has no
/// backend-facing side effect of its own, only the link/pick operations
/// below do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LinkOffscreenBuffer(BufferId, SceneId, DataSlotId),
    LinkStreamBuffer(StreamBufferId, SceneId, DataSlotId),
    LinkExternalBuffer(ExternalBufferId, SceneId, DataSlotId),
    LinkData(SceneId, DataSlotId, SceneId, DataSlotId),
    UnlinkData(SceneId, DataSlotId),
    HandlePick(SceneId, f32, f32),
}

/// Buffers commands locally until [`CommandQueue::flush`] commits them.
///
/// `enqueue` has no side effect on the renderer; only `flush` moves commands
/// where the next tick can see them, atomically and in enqueue order.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: Vec<Command>,
    intake: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command to the pending list. Has no effect until `flush`.
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Atomically moves the entire pending list onto the intake, in order,
    /// and clears the pending list. Never blocks.
    pub fn flush(&mut self) {
        self.intake.append(&mut self.pending);
    }

    /// Drains every command made visible by a prior `flush`, in order.
    ///
    /// Called once per tick by the driving loop; commands from a later
    /// `flush` are only observed on a subsequent call.
    pub(crate) fn drain_intake(&mut self) -> std::vec::Drain<'_, Command> {
        self.intake.drain(..)
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub(crate) fn intake_len(&self) -> usize {
        self.intake.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SceneId;

    #[test]
    fn enqueue_has_no_effect_before_flush() {
        let mut q = CommandQueue::new();
        q.enqueue(Command::HandlePick(SceneId(1), 0.1, 0.2));
        assert_eq!(q.pending_len(), 1);
        assert_eq!(q.intake_len(), 0);
    }

    #[test]
    fn flush_moves_pending_to_intake_in_order() {
        let mut q = CommandQueue::new();
        q.enqueue(Command::HandlePick(SceneId(1), 0.1, 0.2));
        q.enqueue(Command::HandlePick(SceneId(2), 0.3, 0.4));
        q.flush();
        assert_eq!(q.pending_len(), 0);
        let drained: Vec<_> = q.drain_intake().collect();
        assert_eq!(
            drained,
            vec![
                Command::HandlePick(SceneId(1), 0.1, 0.2),
                Command::HandlePick(SceneId(2), 0.3, 0.4),
            ]
        );
    }

    #[test]
    fn ordering_preserved_across_flush_boundary() {
        let mut q = CommandQueue::new();
        q.enqueue(Command::HandlePick(SceneId(1), 0.1, 0.2));
        q.flush();
        q.enqueue(Command::HandlePick(SceneId(2), 0.3, 0.4));
        q.flush();
        let drained: Vec<_> = q.drain_intake().collect();
        assert_eq!(
            drained,
            vec![
                Command::HandlePick(SceneId(1), 0.1, 0.2),
                Command::HandlePick(SceneId(2), 0.3, 0.4),
            ]
        );
    }
}
