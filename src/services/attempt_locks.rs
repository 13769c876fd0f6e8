use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async mutex over (student, quiz) pairs.
///
/// All mutating attempt operations for one pair hold the pair's lock across
/// their check-then-act sequence, so two concurrent `start_attempt` calls
/// cannot both observe "no open attempt" and create two. Operations on
/// different pairs never contend. The Mongo partial unique index is the
/// cross-process backstop for the same invariant.
#[derive(Default)]
pub struct AttemptLocks {
    locks: Mutex<HashMap<(String, String), Arc<Mutex<()>>>>,
}

impl AttemptLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, student_id: &str, quiz_id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            locks
                .entry((student_id.to_string(), quiz_id.to_string()))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}
