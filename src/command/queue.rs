//! Bounded lock-free command queue.
//!
//! A fixed-capacity MPMC ring buffer: producers use a non-blocking
//! `try_send`, the consumer drains a bounded number of entries per tick.
//! A full queue drops the command and reports [`CommandError::QueueFull`];
//! producers never block on the real-time domain.
//!
//! Emergency stops do not ride the ring. `try_send` diverts them to an
//! atomic latch that accepts regardless of queue depth, and the consumer
//! takes the latch before it touches the ring, so an estop pre-empts every
//! command queued ahead of it.

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::mpmc::MpMcQueue;

use crate::error::CommandError;

use super::types::{CommandKind, MotionCommand};

/// Fixed queue capacity (must be a power of two).
pub const QUEUE_DEPTH: usize = 16;

/// The shared command queue.
///
/// Place one in a `static` (or any location that outlives both scheduling
/// domains) and hand [`CommandSender`]s to producers. The consumer side is
/// the controller's tick, which holds its own reference.
pub struct CommandQueue {
    inner: MpMcQueue<MotionCommand, QUEUE_DEPTH>,
    estop: AtomicBool,
}

impl CommandQueue {
    /// Create an empty queue. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            inner: MpMcQueue::new(),
            estop: AtomicBool::new(false),
        }
    }

    /// Get a producer handle.
    #[inline]
    pub fn sender(&self) -> CommandSender<'_> {
        CommandSender { queue: self }
    }

    /// Non-blocking enqueue.
    ///
    /// [`CommandKind::EmergencyStop`] never enters the ring: it sets the
    /// estop latch instead and always succeeds, even when the ring is full.
    pub fn try_send(&self, command: MotionCommand) -> Result<(), CommandError> {
        if command.kind == CommandKind::EmergencyStop {
            self.estop.store(true, Ordering::Release);
            return Ok(());
        }
        self.inner
            .enqueue(command)
            .map_err(|_| CommandError::QueueFull)
    }

    /// Non-blocking dequeue (consumer side).
    #[inline]
    pub fn try_recv(&self) -> Option<MotionCommand> {
        self.inner.dequeue()
    }

    /// Consume the estop latch (consumer side). Must be checked before
    /// draining the ring so queued commands cannot outrun an estop.
    #[inline]
    pub fn take_estop(&self) -> bool {
        self.estop.swap(false, Ordering::AcqRel)
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable producer handle onto a [`CommandQueue`].
#[derive(Clone, Copy)]
pub struct CommandSender<'q> {
    queue: &'q CommandQueue,
}

impl CommandSender<'_> {
    /// Enqueue a command without blocking.
    ///
    /// Returns [`CommandError::QueueFull`] when the ring is full; the command
    /// is dropped, not retried.
    #[inline]
    pub fn send(&self, command: MotionCommand) -> Result<(), CommandError> {
        self.queue.try_send(command)
    }
}
