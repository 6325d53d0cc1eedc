//! Reminder scheduler
//!
//! Maps each future reminder in the canonical set to exactly one live
//! countdown. Reconciliation cancels every armed timer and re-arms from
//! scratch, which keeps the mapping correct under any sequence of adds and
//! deletes without diffing; arming is cheap and O(active reminders).
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Owned scheduler struct with explicit teardown (was module state)
//! - 1.0.0: Initial one-shot countdown scheduling

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Reminder;

/// Delivery port for fired reminders.
///
/// Delivery is fire-and-forget: implementations must not block and their
/// failures must stay on their side of the trait; the elapsed timer is the
/// terminal event for a reminder either way.
pub trait Notifier: Send + Sync {
    fn notify(&self, plant_name: &str, message: &str);
}

/// Notifier used by the console front-end.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, plant_name: &str, message: &str) {
        log::info!("🔔 Reminder fired for {plant_name}: {message}");
        println!("\n🔔 Reminder for {plant_name}: {message}");
    }
}

struct ArmedTimer {
    due: DateTime<Utc>,
    handle: JoinHandle<()>,
}

/// Live countdown state for the reminder set.
///
/// Holds one armed one-shot timer per future reminder, keyed by reminder id.
/// This state is private to the process and never persisted.
pub struct ReminderScheduler {
    armed: HashMap<String, ArmedTimer>,
    notifier: Arc<dyn Notifier>,
    fired_tx: mpsc::UnboundedSender<String>,
}

impl ReminderScheduler {
    /// Create a scheduler that delivers through `notifier` and reports each
    /// fired reminder id on `fired_tx` so the owner can delete it.
    pub fn new(notifier: Arc<dyn Notifier>, fired_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            armed: HashMap::new(),
            notifier,
            fired_tx,
        }
    }

    /// Rebuild the armed set from the canonical reminder list.
    ///
    /// Cancels every live countdown first, then arms one per reminder whose
    /// time is still strictly in the future. Entries at or past their time
    /// are skipped without firing; the canonical set filters those on load,
    /// but the scheduler stays defensive about them.
    pub fn reconcile(&mut self, canonical: &[Reminder]) {
        for (_, timer) in self.armed.drain() {
            timer.handle.abort();
        }

        let now = Utc::now();
        for reminder in canonical {
            let delay = reminder.time.signed_duration_since(now);
            if delay <= TimeDelta::zero() {
                debug!("Skipping past-due reminder {}", reminder.id);
                continue;
            }
            let Ok(delay) = delay.to_std() else {
                debug!("Skipping unrepresentable delay for reminder {}", reminder.id);
                continue;
            };

            let notifier = Arc::clone(&self.notifier);
            let fired_tx = self.fired_tx.clone();
            let id = reminder.id.clone();
            let plant_name = reminder
                .plant_name
                .clone()
                .unwrap_or_else(|| "General".to_string());
            let message = reminder.message.clone();

            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                notifier.notify(&plant_name, &message);
                if fired_tx.send(id).is_err() {
                    warn!("Reminder center is gone; fired reminder not removed");
                }
            });

            self.armed.insert(
                reminder.id.clone(),
                ArmedTimer {
                    due: reminder.time,
                    handle,
                },
            );
        }

        debug!("Reconciled reminder timers: {} armed", self.armed.len());
    }

    /// Cancel every armed timer. Also runs on drop, so no countdown can
    /// outlive the scheduler.
    pub fn shutdown(&mut self) {
        for (_, timer) in self.armed.drain() {
            timer.handle.abort();
        }
    }

    pub fn armed_len(&self) -> usize {
        self.armed.len()
    }

    /// Armed reminder ids, sorted for stable comparison.
    pub fn armed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.armed.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The instant a given armed reminder will fire at.
    pub fn armed_due(&self, id: &str) -> Option<DateTime<Utc>> {
        self.armed.get(id).map(|timer| timer.due)
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Test double recording every delivery; shared with the center's tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::Notifier;
    use std::sync::{Arc, Mutex};

    pub struct RecordingNotifier {
        pub fired: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                fired: Mutex::new(Vec::new()),
            })
        }

        pub fn count(&self) -> usize {
            self.fired.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, plant_name: &str, message: &str) {
            self.fired
                .lock()
                .unwrap()
                .push((plant_name.to_string(), message.to_string()));
        }
    }
}
