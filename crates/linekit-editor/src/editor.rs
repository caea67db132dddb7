//! Undoable editing of a [`Measurement`].
//!
//! Every operation reads the current snapshot, changes a copy and commits
//! it, so each successful edit is exactly one undo step. Edits are
//! serialized: a second edit starts only after the previous commit has been
//! applied. An undo or redo that lands while an edit is in flight wins; the
//! edit fails with [`EditorError::HistoryMoved`] and nothing is committed.
//! Edits that would store NaN or an infinity are rejected.

use std::collections::HashSet;

use linekit_core::tree::{self, MeasurementTree};
use linekit_core::{LineId, LineSegment, Measurement, MeasurementLine, NodeId};
use linekit_history::{CommitOutcome, HistoryEngine, HistorySnapshot, SubscriptionId};
use tokio::sync::{watch, Mutex};

use crate::error::{EditorError, EditorResult};

/// Editing session over one measurement document.
pub struct MeasurementEditor {
    history: HistoryEngine<Measurement>,
    edit_lock: Mutex<()>,
}

impl MeasurementEditor {
    /// Starts a session whose first history entry is `measurement`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(measurement: Measurement) -> EditorResult<Self> {
        Ok(Self {
            history: HistoryEngine::new(measurement)?,
            edit_lock: Mutex::new(()),
        })
    }

    async fn edit<R, F>(&self, change: F) -> EditorResult<R>
    where
        F: FnOnce(&mut Measurement) -> EditorResult<R>,
    {
        let _guard = self.edit_lock.lock().await;
        let base = self.history.snapshot();
        let mut draft = base.value;
        let result = change(&mut draft)?;
        draft.check_finite()?;

        match self.history.commit_from(base.depth, draft).await? {
            CommitOutcome::Committed { .. } => {}
            CommitOutcome::Unchanged { .. } => {
                tracing::trace!("Edit left measurement unchanged");
            }
            CommitOutcome::Stale { depth } => {
                tracing::warn!(
                    "Edit based on entry {} dropped; history moved to {}",
                    base.depth,
                    depth
                );
                return Err(EditorError::HistoryMoved);
            }
        }
        Ok(result)
    }

    /// Draws a new line and files it under `parent` (or the root).
    ///
    /// The line is named `Line <id>`, rounded to whole pixels when
    /// `pixel_perfect` is set and locked when `auto_lock` is set.
    pub async fn add_line(
        &self,
        segment: LineSegment,
        parent: Option<NodeId>,
    ) -> EditorResult<LineId> {
        self.edit(|m| {
            let id = m.next_line_id().ok_or(EditorError::IdSpaceExhausted)?;
            let segment = if m.pixel_perfect {
                segment.rounded()
            } else {
                segment
            };

            let mut line = MeasurementLine::new(id, segment, format!("Line {}", id));
            line.is_locked = m.auto_lock;

            let leaf = MeasurementTree::leaf(id);
            match parent {
                Some(group_id) => tree::locate_group_mut(&mut m.hierarchy, group_id)
                    .ok_or(EditorError::GroupNotFound { id: group_id })?
                    .items
                    .push(leaf),
                None => m.hierarchy.push(leaf),
            }
            m.lines.push(line);

            tracing::debug!("Added line {} under {:?}", id, parent);
            Ok(id)
        })
        .await
    }

    /// Applies `change` to line `id`. The id itself cannot be changed.
    pub async fn update_line<F>(&self, id: LineId, change: F) -> EditorResult<()>
    where
        F: FnOnce(&mut MeasurementLine),
    {
        self.edit(|m| {
            let line = m.line_mut(id).ok_or(EditorError::LineNotFound { id })?;
            change(line);
            line.id = id;
            Ok(())
        })
        .await
    }

    /// Moves the endpoints of line `id`. Locked lines are rejected.
    pub async fn set_line_segment(&self, id: LineId, segment: LineSegment) -> EditorResult<()> {
        self.edit(|m| {
            let pixel_perfect = m.pixel_perfect;
            let line = m.line_mut(id).ok_or(EditorError::LineNotFound { id })?;
            if line.is_locked {
                return Err(EditorError::LineLocked { id });
            }
            line.set_segment(if pixel_perfect {
                segment.rounded()
            } else {
                segment
            });
            Ok(())
        })
        .await
    }

    pub async fn rename_line(&self, id: LineId, name: impl Into<String>) -> EditorResult<()> {
        let name = name.into();
        self.update_line(id, move |line| line.name = name).await
    }

    pub async fn set_line_hidden(&self, id: LineId, hidden: bool) -> EditorResult<()> {
        self.update_line(id, |line| line.is_hidden = hidden).await
    }

    pub async fn set_line_locked(&self, id: LineId, locked: bool) -> EditorResult<()> {
        self.update_line(id, |line| line.is_locked = locked).await
    }

    /// Removes line `id` and its leaf.
    pub async fn delete_line(&self, id: LineId) -> EditorResult<()> {
        self.edit(|m| {
            let before = m.lines.len();
            m.lines.retain(|line| line.id != id);
            if m.lines.len() == before {
                return Err(EditorError::LineNotFound { id });
            }
            tree::remove_node(&mut m.hierarchy, id);
            tracing::debug!("Deleted line {}", id);
            Ok(())
        })
        .await
    }

    /// Creates an empty group under `parent` (or the root) and returns its id.
    pub async fn create_group(
        &self,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> EditorResult<NodeId> {
        let name = name.into();
        self.edit(move |m| {
            let mut group =
                tree::create_group(&m.hierarchy, name).ok_or(EditorError::IdSpaceExhausted)?;
            if m.line(group.id).is_some() {
                // a line without a leaf already owns this id
                group.id = m.next_line_id().ok_or(EditorError::IdSpaceExhausted)?;
            }
            let id = group.id;

            match parent {
                Some(parent_id) => tree::locate_group_mut(&mut m.hierarchy, parent_id)
                    .ok_or(EditorError::GroupNotFound { id: parent_id })?
                    .items
                    .push(group.into()),
                None => m.hierarchy.push(group.into()),
            }

            tracing::debug!("Created group {} under {:?}", id, parent);
            Ok(id)
        })
        .await
    }

    pub async fn rename_group(&self, id: NodeId, name: impl Into<String>) -> EditorResult<()> {
        let name = name.into();
        self.edit(move |m| {
            tree::locate_group_mut(&mut m.hierarchy, id)
                .ok_or(EditorError::GroupNotFound { id })?
                .name = name;
            Ok(())
        })
        .await
    }

    /// Removes node `id` (a leaf or a whole group) and the lines whose
    /// leaves went with it. Returns the number of lines removed.
    pub async fn remove_node(&self, id: NodeId) -> EditorResult<usize> {
        self.edit(|m| {
            let before: HashSet<NodeId> = tree::leaf_ids(&m.hierarchy).into_iter().collect();
            if tree::remove_node(&mut m.hierarchy, id) == 0 {
                return Err(EditorError::NodeNotFound { id });
            }
            let after: HashSet<NodeId> = tree::leaf_ids(&m.hierarchy).into_iter().collect();

            let count = m.lines.len();
            m.lines
                .retain(|line| !before.contains(&line.id) || after.contains(&line.id));
            let removed = count - m.lines.len();

            tracing::debug!("Removed node {} and {} line(s)", id, removed);
            Ok(removed)
        })
        .await
    }

    /// Changes document-level settings such as colors, grid or ratio.
    ///
    /// `lines` and `hierarchy` are restored after `change` runs; use the
    /// line and group operations for those.
    pub async fn update_settings<F>(&self, change: F) -> EditorResult<()>
    where
        F: FnOnce(&mut Measurement),
    {
        self.edit(|m| {
            let lines = m.lines.clone();
            let hierarchy = m.hierarchy.clone();
            change(m);
            m.lines = lines;
            m.hierarchy = hierarchy;
            Ok(())
        })
        .await
    }

    /// Moves back one entry. An edit still waiting for its commit when this
    /// runs fails with [`EditorError::HistoryMoved`].
    pub fn undo(&self) -> bool {
        self.history.undo()
    }

    pub fn redo(&self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Copy of the current document.
    pub fn current(&self) -> Measurement {
        self.history.current()
    }

    pub fn snapshot(&self) -> HistorySnapshot<Measurement> {
        self.history.snapshot()
    }

    pub fn watch(&self) -> watch::Receiver<HistorySnapshot<Measurement>> {
        self.history.watch()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&HistorySnapshot<Measurement>) + Send + Sync + 'static,
    {
        self.history.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.history.unsubscribe(id)
    }

    pub fn history(&self) -> &HistoryEngine<Measurement> {
        &self.history
    }
}

impl std::fmt::Debug for MeasurementEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementEditor")
            .field("history", &self.history)
            .finish()
    }
}
