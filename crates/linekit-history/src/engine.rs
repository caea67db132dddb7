//! Linear undo/redo engine over immutable snapshots.

use parking_lot::{ReentrantMutex, RwLock};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot, watch};

use crate::error::{HistoryError, HistoryResult};
use crate::snapshot::{HistorySnapshot, Snapshot};
use crate::subscribers::{SubscriberRegistry, SubscriptionId};

/// What a commit did to the stack once it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The value was appended and became current at `depth`.
    Committed { depth: usize },
    /// The value equalled the current entry; nothing changed.
    Unchanged { depth: usize },
    /// The current position moved away from the depth the value was derived
    /// from; nothing changed.
    Stale { depth: usize },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }

    pub fn depth(&self) -> usize {
        match self {
            CommitOutcome::Committed { depth }
            | CommitOutcome::Unchanged { depth }
            | CommitOutcome::Stale { depth } => *depth,
        }
    }
}

/// Acknowledgement of a queued commit.
///
/// The commit is applied whether or not the handle is awaited; awaiting it
/// waits until the worker has applied the value and published the result.
#[must_use = "await the handle before issuing dependent edits"]
pub struct CommitHandle {
    ack: oneshot::Receiver<CommitOutcome>,
}

impl Future for CommitHandle {
    type Output = HistoryResult<CommitOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.ack)
            .poll(cx)
            .map(|result| result.map_err(|_| HistoryError::WorkerStopped))
    }
}

struct PendingCommit<T> {
    value: T,
    base: Option<usize>,
    ack: oneshot::Sender<CommitOutcome>,
}

struct Stack<T> {
    entries: Vec<T>,
    depth: usize,
}

impl<T: Snapshot> Stack<T> {
    fn snapshot(&self) -> HistorySnapshot<T> {
        HistorySnapshot {
            value: self.entries[self.depth].clone(),
            depth: self.depth,
            len: self.entries.len(),
        }
    }
}

struct Shared<T> {
    stack: RwLock<Stack<T>>,
    // Held across a depth change and its publication so observers see
    // changes in the order they were made.
    publish_order: ReentrantMutex<()>,
    publisher: watch::Sender<HistorySnapshot<T>>,
    subscribers: SubscriberRegistry<T>,
}

impl<T: Snapshot> Shared<T> {
    fn apply(&self, value: T, base: Option<usize>) -> CommitOutcome {
        let _order = self.publish_order.lock();

        let snapshot = {
            let mut stack = self.stack.write();
            if base.is_some_and(|base| base != stack.depth) {
                tracing::debug!(
                    "Dropping commit based on entry {:?}; current entry is {}",
                    base,
                    stack.depth
                );
                return CommitOutcome::Stale { depth: stack.depth };
            }
            if stack.entries[stack.depth] == value {
                tracing::trace!("Skipping commit equal to entry {}", stack.depth);
                return CommitOutcome::Unchanged { depth: stack.depth };
            }

            let next = stack.depth + 1;
            let discarded = stack.entries.len() - next;
            stack.entries.truncate(next);
            stack.entries.push(value);
            stack.depth = next;

            tracing::debug!(
                "Committed history entry {} ({} redo entries discarded)",
                next,
                discarded
            );
            stack.snapshot()
        };

        let depth = snapshot.depth;
        self.publish(snapshot);
        CommitOutcome::Committed { depth }
    }

    fn move_depth(&self, target: impl FnOnce(usize, usize) -> usize) -> bool {
        let _order = self.publish_order.lock();

        let snapshot = {
            let mut stack = self.stack.write();
            let next = target(stack.depth, stack.entries.len());
            if next == stack.depth {
                return false;
            }
            tracing::debug!("History depth {} -> {}", stack.depth, next);
            stack.depth = next;
            stack.snapshot()
        };

        self.publish(snapshot);
        true
    }

    fn publish(&self, snapshot: HistorySnapshot<T>) {
        self.publisher.send_replace(snapshot.clone());
        self.subscribers.notify(&snapshot);
    }
}

async fn run_commit_worker<T: Snapshot>(
    shared: Arc<Shared<T>>,
    mut queue: mpsc::UnboundedReceiver<PendingCommit<T>>,
) {
    while let Some(pending) = queue.recv().await {
        let outcome = shared.apply(pending.value, pending.base);
        // the caller may have dropped its handle; the entry stays applied
        let _ = pending.ack.send(outcome);
    }
    tracing::debug!("History commit worker stopped");
}

/// Versioned stack of snapshots with linear undo/redo.
///
/// Entry 0 is the initial value and is never removed. Committing after an
/// undo discards the redo branch. Commits go through a queue drained by a
/// single worker task, so stack order always follows the order of
/// [`HistoryEngine::commit`] calls; undo and redo are synchronous pointer
/// moves.
///
/// ```rust,ignore
/// let history = HistoryEngine::new(0u32)?;
/// history.commit(1).await?;
/// history.undo();
/// assert_eq!(history.current(), 0);
/// ```
pub struct HistoryEngine<T: Snapshot> {
    shared: Arc<Shared<T>>,
    queue: mpsc::UnboundedSender<PendingCommit<T>>,
}

impl<T: Snapshot> HistoryEngine<T> {
    /// Creates an engine whose first entry is `zero`.
    ///
    /// Must be called from within a Tokio runtime; the commit worker is
    /// spawned on it and stops when the engine is dropped.
    pub fn new(zero: T) -> HistoryResult<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| HistoryError::NoRuntime)?;

        let stack = Stack {
            entries: vec![zero],
            depth: 0,
        };
        let (publisher, _) = watch::channel(stack.snapshot());
        let shared = Arc::new(Shared {
            stack: RwLock::new(stack),
            publish_order: ReentrantMutex::new(()),
            publisher,
            subscribers: SubscriberRegistry::new(),
        });

        let (queue, receiver) = mpsc::unbounded_channel();
        runtime.spawn(run_commit_worker(shared.clone(), receiver));

        Ok(Self { shared, queue })
    }

    /// Queues `value` as the next entry.
    ///
    /// The value is enqueued before this call returns, which fixes its place
    /// in the stack relative to other commits. A value equal to the entry that
    /// is current when it is applied is dropped without creating a step.
    pub fn commit(&self, value: T) -> CommitHandle {
        self.enqueue(value, None)
    }

    /// Queues `value` as the next entry only if the current position is
    /// still `base` when the commit is applied.
    ///
    /// Use this for values derived from the entry at `base`: an undo or redo
    /// that lands in between turns the commit into [`CommitOutcome::Stale`]
    /// instead of silently discarding the moved-to position.
    pub fn commit_from(&self, base: usize, value: T) -> CommitHandle {
        self.enqueue(value, Some(base))
    }

    fn enqueue(&self, value: T, base: Option<usize>) -> CommitHandle {
        let (ack, receiver) = oneshot::channel();
        if self.queue.send(PendingCommit { value, base, ack }).is_err() {
            // the dropped ack resolves the handle with WorkerStopped
            tracing::warn!("History commit worker is gone; commit dropped");
        }
        CommitHandle { ack: receiver }
    }

    /// Copy of the current entry.
    pub fn current(&self) -> T {
        let stack = self.shared.stack.read();
        stack.entries[stack.depth].clone()
    }

    /// Current entry together with depth and stack length.
    pub fn snapshot(&self) -> HistorySnapshot<T> {
        self.shared.stack.read().snapshot()
    }

    /// Moves one entry back. Returns `false` at the first entry.
    pub fn undo(&self) -> bool {
        self.shared.move_depth(|depth, _| depth.saturating_sub(1))
    }

    /// Moves one entry forward. Returns `false` at the last entry.
    pub fn redo(&self) -> bool {
        self.shared.move_depth(|depth, len| (depth + 1).min(len - 1))
    }

    pub fn can_undo(&self) -> bool {
        self.shared.stack.read().depth > 0
    }

    pub fn can_redo(&self) -> bool {
        let stack = self.shared.stack.read();
        stack.depth + 1 < stack.entries.len()
    }

    pub fn depth(&self) -> usize {
        self.shared.stack.read().depth
    }

    /// Number of entries, including the initial one.
    pub fn len(&self) -> usize {
        self.shared.stack.read().entries.len()
    }

    /// Always `false`: the initial entry is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Receiver that always holds the latest snapshot and is marked changed
    /// on every depth change.
    pub fn watch(&self) -> watch::Receiver<HistorySnapshot<T>> {
        self.shared.publisher.subscribe()
    }

    /// Registers a handler called with every new snapshot.
    ///
    /// Handlers run synchronously on the thread that changed the depth (the
    /// commit worker for commits, the caller for undo/redo).
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&HistorySnapshot<T>) + Send + Sync + 'static,
    {
        self.shared.subscribers.subscribe(handler)
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }
}

impl<T: Snapshot + std::fmt::Debug> std::fmt::Debug for HistoryEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stack = self.shared.stack.read();
        f.debug_struct("HistoryEngine")
            .field("depth", &stack.depth)
            .field("len", &stack.entries.len())
            .field("subscribers", &self.shared.subscribers.len())
            .finish()
    }
}
