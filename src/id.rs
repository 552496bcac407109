//! Identifier generation for new records.

use serde::{Deserialize, Serialize};

/// Hands out `<prefix>-<n>` identifiers from a per-store counter.
///
/// The counter only moves forward and is saved with the board, so an id is
/// never handed out twice, even after the record holding it was deleted. Ids
/// already present in the store (seed data, imported snapshots) are skipped.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    /// Produce the next id for `prefix` that `taken` does not report as used.
    pub fn next_id(&mut self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.counter += 1;
            let id = format!("{prefix}-{}", self.counter);
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Move the counter past the numeric suffix of an existing id, so ids
    /// freed by deletions in an earlier session are not handed out again.
    pub fn observe(&mut self, id: &str) {
        if let Some(n) = id.rsplit_once('-').and_then(|(_, n)| n.parse::<u64>().ok()) {
            self.counter = self.counter.max(n);
        }
    }

    /// Use the caller's id when it is non-empty and free, otherwise generate one.
    pub fn claim(
        &mut self,
        requested: Option<String>,
        prefix: &str,
        taken: impl Fn(&str) -> bool,
    ) -> String {
        match requested {
            Some(id) if !id.trim().is_empty() && !taken(&id) => id,
            Some(id) => {
                tracing::warn!(requested = %id, prefix, "requested id unavailable, generating a new one");
                self.next_id(prefix, taken)
            }
            None => self.next_id(prefix, taken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = IdGenerator::default();
        for id in ["task-2", "task-7", "todo", "in-progress", "roadmap-x"] {
            ids.observe(id);
        }
        assert_eq!(ids.next_id("task", |_| false), "task-8");
        ids.observe("task-3");
        assert_eq!(ids.next_id("column", |_| false), "column-9");
    }

    #[test]
    fn skips_taken_ids() {
        let existing = ["task-1", "task-2"];
        let mut ids = IdGenerator::default();
        let id = ids.next_id("task", |candidate| existing.contains(&candidate));
        assert_eq!(id, "task-3");
        assert_eq!(ids.next_id("task", |_| false), "task-4");
    }

    #[test]
    fn claim_prefers_free_requested_id() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.claim(Some("todo".into()), "column", |_| false), "todo");
        assert_eq!(
            ids.claim(Some("todo".into()), "column", |c| c == "todo"),
            "column-1"
        );
        assert_eq!(ids.claim(Some("  ".into()), "column", |_| false), "column-2");
    }
}
