use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::models::activity::{ActivityItem, HistoryItem, ItemStatus, UserAction};

/// How long a terminal badge stays visible before the row leaves the queue.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Partial update merged into a queue item; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct QueueUpdate {
    pub status: Option<ItemStatus>,
    pub suggested_name: Option<String>,
    pub suggested_folder: Option<String>,
    pub summary: Option<String>,
    pub auto_rename_applied: Option<bool>,
    pub auto_move_applied: Option<bool>,
    pub user_action: Option<UserAction>,
}

impl QueueUpdate {
    fn apply(self, item: &mut ActivityItem) {
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(name) = self.suggested_name {
            item.suggested_name = Some(name);
        }
        if let Some(folder) = self.suggested_folder {
            item.suggested_folder = Some(folder);
        }
        if let Some(summary) = self.summary {
            item.summary = Some(summary);
        }
        if let Some(applied) = self.auto_rename_applied {
            item.auto_rename_applied = applied;
        }
        if let Some(applied) = self.auto_move_applied {
            item.auto_move_applied = applied;
        }
        if let Some(action) = self.user_action {
            item.user_action = action;
        }
    }
}

#[derive(Default)]
struct StoreState {
    queue: Vec<ActivityItem>,
    history: Vec<HistoryItem>,
    is_processing: bool,
    current_index: usize,
    total_files: usize,
    // Terminal actions are settled by timers; each action bumps the epoch so
    // a timer from an earlier action finds itself stale and does nothing.
    next_settle_epoch: u64,
    pending_settles: HashMap<String, u64>,
}

struct Inner {
    state: Mutex<StoreState>,
    settle_delay: Duration,
}

/// In-memory container for the live review queue and the retired history.
///
/// The handle is cheap to clone; all clones share one state. Operations that
/// reference an unknown id are logged no-ops so rapid UI races (double
/// clicks, actions on a row mid-retirement) never error. `approve_item` and
/// `reject_item` schedule retirement on a Tokio timer and therefore must be
/// called from within a Tokio runtime.
#[derive(Clone)]
pub struct ActivityStore {
    inner: Arc<Inner>,
}

impl Default for ActivityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::with_settle_delay(DEFAULT_SETTLE_DELAY)
    }

    pub fn with_settle_delay(settle_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(StoreState::default()),
                settle_delay,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a new item. Ids already present in the queue are rejected as a
    /// logged no-op; an id is expected to be unique for its queue lifetime.
    pub fn add_to_queue(&self, item: ActivityItem) {
        let mut state = self.lock();
        if state.queue.iter().any(|existing| existing.id == item.id) {
            log::warn!("ignoring enqueue of duplicate queue id {}", item.id);
            return;
        }
        state.queue.push(item);
    }

    /// Merge a partial update into the item with the given id.
    pub fn update_queue_item(&self, id: &str, update: QueueUpdate) {
        let mut state = self.lock();
        match state.queue.iter_mut().find(|item| item.id == id) {
            Some(item) => update.apply(item),
            None => log::debug!("ignoring update for unknown queue item {id}"),
        }
    }

    /// Remove an item without producing a history record.
    pub fn remove_from_queue(&self, id: &str) {
        let mut state = self.lock();
        state.pending_settles.remove(id);
        state.queue.retain(|item| item.id != id);
    }

    /// Drop every queued item and reset the processing counters. Pending
    /// settle timers are cancelled.
    pub fn clear_queue(&self) {
        let mut state = self.lock();
        state.queue.clear();
        state.pending_settles.clear();
        state.is_processing = false;
        state.current_index = 0;
        state.total_files = 0;
    }

    pub fn set_processing(&self, is_processing: bool) {
        self.lock().is_processing = is_processing;
    }

    pub fn set_progress(&self, current: usize, total: usize) {
        let mut state = self.lock();
        state.current_index = current;
        state.total_files = total;
    }

    /// Record the user's replacement for the suggested name. The write is
    /// never rejected, but a name whose rename was already applied keeps its
    /// applied value when the item retires.
    pub fn edit_item_name(&self, id: &str, new_name: &str) {
        let mut state = self.lock();
        match state.queue.iter_mut().find(|item| item.id == id) {
            Some(item) => item.edited_name = Some(new_name.to_string()),
            None => log::debug!("ignoring name edit for unknown queue item {id}"),
        }
    }

    /// Record the user's replacement for the suggested folder; same gating
    /// as [`edit_item_name`](Self::edit_item_name).
    pub fn edit_item_folder(&self, id: &str, new_folder: &str) {
        let mut state = self.lock();
        match state.queue.iter_mut().find(|item| item.id == id) {
            Some(item) => item.edited_folder = Some(new_folder.to_string()),
            None => log::debug!("ignoring folder edit for unknown queue item {id}"),
        }
    }

    /// Mark an item approved and schedule its retirement after the settle
    /// delay. A later terminal action on the same id supersedes this one.
    pub fn approve_item(&self, id: &str) {
        self.finish_item(id, UserAction::Approved, ItemStatus::Approved);
    }

    /// Mark an item rejected and schedule its retirement after the settle
    /// delay.
    pub fn reject_item(&self, id: &str) {
        self.finish_item(id, UserAction::Rejected, ItemStatus::Rejected);
    }

    /// Approve every item currently awaiting review. Items still processing
    /// are left untouched; calling this again before the settle delay
    /// elapses is a no-op because no item is `completed` anymore.
    pub fn approve_all(&self) {
        for id in self.completed_ids() {
            self.approve_item(&id);
        }
    }

    /// Reject every item currently awaiting review.
    pub fn reject_all(&self) {
        for id in self.completed_ids() {
            self.reject_item(&id);
        }
    }

    /// Retire an item immediately, bypassing the settle delay.
    pub fn move_to_history(&self, id: &str) {
        let mut state = self.lock();
        state.pending_settles.remove(id);
        retire(&mut state, id);
    }

    pub fn clear_history(&self) {
        self.lock().history.clear();
    }

    pub fn queue(&self) -> Vec<ActivityItem> {
        self.lock().queue.clone()
    }

    pub fn queue_item(&self, id: &str) -> Option<ActivityItem> {
        self.lock().queue.iter().find(|item| item.id == id).cloned()
    }

    /// Retired records, most recent first.
    pub fn history(&self) -> Vec<HistoryItem> {
        self.lock().history.clone()
    }

    pub fn progress(&self) -> (usize, usize) {
        let state = self.lock();
        (state.current_index, state.total_files)
    }

    pub fn is_processing(&self) -> bool {
        self.lock().is_processing
    }

    fn completed_ids(&self) -> Vec<String> {
        self.lock()
            .queue
            .iter()
            .filter(|item| item.status == ItemStatus::Completed)
            .map(|item| item.id.clone())
            .collect()
    }

    fn finish_item(&self, id: &str, action: UserAction, status: ItemStatus) {
        let epoch = {
            let mut state = self.lock();
            let Some(item) = state.queue.iter_mut().find(|item| item.id == id) else {
                log::debug!("ignoring {action} for unknown queue item {id}");
                return;
            };
            item.user_action = action;
            item.status = status;

            state.next_settle_epoch += 1;
            let epoch = state.next_settle_epoch;
            state.pending_settles.insert(id.to_string(), epoch);
            epoch
        };

        let store = self.clone();
        let id = id.to_string();
        let delay = self.inner.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.retire_if_current(&id, epoch);
        });
    }

    fn retire_if_current(&self, id: &str, epoch: u64) {
        let mut state = self.lock();
        if state.pending_settles.get(id) != Some(&epoch) {
            log::debug!("stale settle timer for queue item {id}, skipping");
            return;
        }
        state.pending_settles.remove(id);
        retire(&mut state, id);
    }
}

fn retire(state: &mut StoreState, id: &str) {
    let Some(position) = state.queue.iter().position(|item| item.id == id) else {
        log::debug!("ignoring retirement of unknown queue item {id}");
        return;
    };
    // Removal and append happen under the same lock, so an id is never
    // visible in both collections.
    let item = state.queue.remove(position);
    state.history.insert(0, item.into_history());
}
