//! # Reminders Feature
//!
//! Scheduled care notifications over a persisted canonical set.
//!
//! The [`ReminderCenter`] is the single writer of the canonical reminder
//! list: user intents (`add`, `delete`) and fired timers all mutate it
//! through the center, which persists every change and re-derives the live
//! timer set from scratch after each one.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.1.0: Plant-name snapshots so reminders survive garden changes
//! - 2.0.0: Single-writer center owning scheduler and persistence
//! - 1.0.0: Initial reminder list with one-shot notifications

pub mod scheduler;

pub use scheduler::{ConsoleNotifier, Notifier, ReminderScheduler};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::error::ReminderError;
use crate::storage::{SnapshotStore, REMINDER_SNAPSHOT};

/// A scheduled care notification.
///
/// `plant_id` is a weak reference: the plant may disappear independently,
/// so `plant_name` snapshots the display name at creation time and the
/// reminder stays meaningful either way. The live timer handle is scheduler
/// state and is never part of this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub message: String,
    /// Absolute firing instant; serialized as RFC 3339, which sorts lexically.
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub plant_id: Option<String>,
    #[serde(default)]
    pub plant_name: Option<String>,
}

/// User intent to create a reminder, validated before it reaches the
/// canonical set.
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub message: String,
    pub time: DateTime<Utc>,
    pub plant_id: Option<String>,
    pub plant_name: Option<String>,
}

struct CenterState {
    reminders: Vec<Reminder>,
    scheduler: ReminderScheduler,
    store: SnapshotStore,
}

impl CenterState {
    /// Snapshot the canonical set. Best-effort: a failed write is logged
    /// and in-memory state stays authoritative for the session.
    fn persist(&self) {
        if let Err(e) = self.store.save(REMINDER_SNAPSHOT, &self.reminders) {
            warn!("Failed to save reminder snapshot: {e:#}");
        }
    }

    fn reconcile(&mut self) {
        self.scheduler.reconcile(&self.reminders);
    }
}

/// Single-writer owner of the canonical reminder set.
///
/// Every mutation happens under one lock and ends with a full scheduler
/// reconciliation, so no timer elapse can observe a half-updated mapping
/// and two reconciliations never overlap.
pub struct ReminderCenter {
    state: Arc<Mutex<CenterState>>,
    listener: JoinHandle<()>,
}

impl ReminderCenter {
    /// Load the persisted set (dropping past-due entries), arm timers for
    /// what remains, and start listening for fired reminders.
    pub async fn new(store: SnapshotStore, notifier: Arc<dyn Notifier>) -> Self {
        let (fired_tx, mut fired_rx) = mpsc::unbounded_channel();

        let mut reminders: Vec<Reminder> = store.load(REMINDER_SNAPSHOT);
        let loaded = reminders.len();
        let now = Utc::now();
        reminders.retain(|r| r.time > now);
        reminders.sort_by_key(|r| r.time);
        if reminders.len() < loaded {
            debug!("Dropped {} past-due reminders at load", loaded - reminders.len());
        }

        let state = Arc::new(Mutex::new(CenterState {
            reminders,
            scheduler: ReminderScheduler::new(notifier, fired_tx),
            store,
        }));

        {
            let mut state = state.lock().await;
            // Rewrite the snapshot so past-due entries never survive a reload.
            state.persist();
            state.reconcile();
        }

        let listener_state = Arc::clone(&state);
        let listener = tokio::spawn(async move {
            while let Some(id) = fired_rx.recv().await {
                Self::remove(&listener_state, &id).await;
            }
        });

        Self { state, listener }
    }

    /// Create a reminder. Validation happens here, at the intent boundary:
    /// an empty message or a non-future time is rejected before anything
    /// reaches the canonical set or the scheduler.
    pub async fn add(&self, draft: ReminderDraft) -> Result<Reminder, ReminderError> {
        if draft.message.trim().is_empty() {
            return Err(ReminderError::EmptyMessage);
        }
        if draft.time <= Utc::now() {
            return Err(ReminderError::TimeNotFuture);
        }

        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            message: draft.message,
            time: draft.time,
            plant_id: draft.plant_id,
            plant_name: draft.plant_name,
        };

        let mut state = self.state.lock().await;
        state.reminders.push(reminder.clone());
        state.reminders.sort_by_key(|r| r.time);
        state.persist();
        state.reconcile();

        debug!("Added reminder {} at {}", reminder.id, reminder.time);
        Ok(reminder)
    }

    /// Delete a reminder by id. Deleting an unknown id (for example one
    /// that already fired and removed itself) is a no-op, not an error.
    pub async fn delete(&self, id: &str) {
        Self::remove(&self.state, id).await;
    }

    async fn remove(state: &Mutex<CenterState>, id: &str) {
        let mut state = state.lock().await;
        let before = state.reminders.len();
        state.reminders.retain(|r| r.id != id);
        if state.reminders.len() == before {
            debug!("Delete for unknown reminder {id} ignored");
            return;
        }
        state.persist();
        state.reconcile();
    }

    /// Re-run reconciliation against the unchanged canonical set.
    pub async fn resync(&self) {
        self.state.lock().await.reconcile();
    }

    /// The canonical set, ascending by time.
    pub async fn reminders(&self) -> Vec<Reminder> {
        self.state.lock().await.reminders.clone()
    }

    /// The next reminder to fire, if any.
    pub async fn upcoming(&self) -> Option<Reminder> {
        self.state.lock().await.reminders.first().cloned()
    }

    /// Ids with a live countdown, sorted.
    pub async fn armed_ids(&self) -> Vec<String> {
        self.state.lock().await.scheduler.armed_ids()
    }

    /// Firing instant of an armed reminder.
    pub async fn armed_due(&self, id: &str) -> Option<DateTime<Utc>> {
        self.state.lock().await.scheduler.armed_due(id)
    }

    /// Cancel every live countdown and stop processing fired reminders.
    pub async fn shutdown(&self) {
        self.listener.abort();
        self.state.lock().await.scheduler.shutdown();
    }
}

impl Drop for ReminderCenter {
    fn drop(&mut self) {
        // Scheduler teardown happens when the state Arc unwinds; the
        // listener must not keep it alive past the center.
        self.listener.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::scheduler::testing::RecordingNotifier;
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn draft(message: &str, offset: ChronoDuration) -> ReminderDraft {
        ReminderDraft {
            message: message.to_string(),
            time: Utc::now() + offset,
            plant_id: None,
            plant_name: None,
        }
    }

    async fn center_with_notifier(
        dir: &tempfile::TempDir,
    ) -> (ReminderCenter, Arc<RecordingNotifier>) {
        let notifier = RecordingNotifier::new();
        let center = ReminderCenter::new(
            SnapshotStore::new(dir.path()),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        )
        .await;
        (center, notifier)
    }

    /// Let spawned timers and the fired-id listener run without idling the
    /// runtime (idling would auto-advance the paused clock).
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_rejects_empty_message() {
        let dir = tempfile::tempdir().unwrap();
        let (center, _) = center_with_notifier(&dir).await;

        let result = center.add(draft("   ", ChronoDuration::seconds(10))).await;
        assert_eq!(result.unwrap_err(), ReminderError::EmptyMessage);
        assert!(center.reminders().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_rejects_non_future_time() {
        let dir = tempfile::tempdir().unwrap();
        let (center, _) = center_with_notifier(&dir).await;

        let result = center.add(draft("Water", ChronoDuration::seconds(-1))).await;
        assert_eq!(result.unwrap_err(), ReminderError::TimeNotFuture);
        assert!(center.armed_ids().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let (center, _) = center_with_notifier(&dir).await;

        for i in 0..5i64 {
            center
                .add(draft(&format!("task {i}"), ChronoDuration::minutes(i + 1)))
                .await
                .unwrap();
        }

        let mut ids: Vec<String> = center
            .reminders()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_canonical_set_sorted_by_time() {
        let dir = tempfile::tempdir().unwrap();
        let (center, _) = center_with_notifier(&dir).await;

        center.add(draft("later", ChronoDuration::minutes(30))).await.unwrap();
        center.add(draft("sooner", ChronoDuration::minutes(5))).await.unwrap();
        center.add(draft("middle", ChronoDuration::minutes(15))).await.unwrap();

        let reminders = center.reminders().await;
        let messages: Vec<&str> = reminders.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["sooner", "middle", "later"]);
        assert!(reminders.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_filters_past_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let stored = vec![
            Reminder {
                id: "past".to_string(),
                message: "missed".to_string(),
                time: Utc::now() - ChronoDuration::hours(1),
                plant_id: None,
                plant_name: None,
            },
            Reminder {
                id: "far".to_string(),
                message: "far".to_string(),
                time: Utc::now() + ChronoDuration::hours(2),
                plant_id: None,
                plant_name: None,
            },
            Reminder {
                id: "near".to_string(),
                message: "near".to_string(),
                time: Utc::now() + ChronoDuration::hours(1),
                plant_id: None,
                plant_name: None,
            },
        ];
        store.save(REMINDER_SNAPSHOT, &stored).unwrap();

        let (center, _) = center_with_notifier(&dir).await;
        let reminders = center.reminders().await;
        let ids: Vec<&str> = reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);

        // The snapshot is rewritten, so the past entry cannot resurface.
        let reloaded: Vec<Reminder> = store.load(REMINDER_SNAPSHOT);
        assert_eq!(reloaded.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_and_removes_itself() {
        let dir = tempfile::tempdir().unwrap();
        let (center, notifier) = center_with_notifier(&dir).await;

        center.add(draft("Water fern", ChronoDuration::seconds(1))).await.unwrap();

        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;

        let fired = notifier.fired.lock().unwrap().clone();
        assert_eq!(fired, vec![("General".to_string(), "Water fern".to_string())]);
        assert!(center.reminders().await.is_empty());
        assert!(center.armed_ids().await.is_empty());

        // Re-running reconciliation after the fire never re-fires it.
        center.resync().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_cancels_armed_timer() {
        let dir = tempfile::tempdir().unwrap();
        let (center, notifier) = center_with_notifier(&dir).await;

        let reminder = center
            .add(draft("Mist the orchid", ChronoDuration::seconds(10)))
            .await
            .unwrap();
        center.delete(&reminder.id).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(notifier.count(), 0);
        assert!(center.reminders().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_after_fire_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let (center, notifier) = center_with_notifier(&dir).await;

        let reminder = center
            .add(draft("Feed the basil", ChronoDuration::seconds(1)))
            .await
            .unwrap();

        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(notifier.count(), 1);

        // Already auto-deleted; a second delete changes nothing.
        center.delete(&reminder.id).await;
        assert!(center.reminders().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_reminder_fires_first() {
        let dir = tempfile::tempdir().unwrap();
        let (center, notifier) = center_with_notifier(&dir).await;

        center.add(draft("slow", ChronoDuration::seconds(5))).await.unwrap();
        center.add(draft("fast", ChronoDuration::seconds(1))).await.unwrap();

        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;

        let fired = notifier.fired.lock().unwrap().clone();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, "fast");

        // The slower reminder is still canonical and still armed.
        let remaining = center.reminders().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "slow");
        assert_eq!(center.armed_ids().await, vec![remaining[0].id.clone()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resync_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (center, _) = center_with_notifier(&dir).await;

        let reminder = center
            .add(draft("Rotate the monstera", ChronoDuration::minutes(10)))
            .await
            .unwrap();

        let ids_before = center.armed_ids().await;
        let due_before = center.armed_due(&reminder.id).await;
        center.resync().await;
        center.resync().await;

        assert_eq!(center.armed_ids().await, ids_before);
        assert_eq!(center.armed_due(&reminder.id).await, due_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_plant_name_reaches_notification() {
        let dir = tempfile::tempdir().unwrap();
        let (center, notifier) = center_with_notifier(&dir).await;

        center
            .add(ReminderDraft {
                message: "Water deeply".to_string(),
                time: Utc::now() + ChronoDuration::seconds(1),
                plant_id: Some("missing-plant".to_string()),
                plant_name: Some("Spiky (Hybrid Tea Rose)".to_string()),
            })
            .await
            .unwrap();

        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;

        let fired = notifier.fired.lock().unwrap().clone();
        assert_eq!(
            fired,
            vec![(
                "Spiky (Hybrid Tea Rose)".to_string(),
                "Water deeply".to_string()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_leaves_no_live_timers() {
        let dir = tempfile::tempdir().unwrap();
        let (center, notifier) = center_with_notifier(&dir).await;

        center.add(draft("soon", ChronoDuration::seconds(1))).await.unwrap();
        center.shutdown().await;

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(notifier.count(), 0);
    }
}
