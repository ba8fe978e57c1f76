//! Inserted-mention records
//!
//! Every successful insertion appends a record keyed by a stable JSON
//! fingerprint of the candidate payload; duplicates are dropped. The
//! record list answers "which source items are currently present in the
//! document" by checking that a record's rendered text still occurs in
//! the surface value. Records live exactly as long as the owning engine.

use serde_json::Value;

/// One inserted mention: rendered text plus the payload it came from
#[derive(Debug, Clone, PartialEq)]
pub struct MentionRecord {
    pub rendered: String,
    pub data: Value,
    fingerprint: String,
}

/// Per-engine-instance insertion log, deduplicated by payload fingerprint
#[derive(Debug, Default)]
pub(crate) struct MentionRecords {
    records: Vec<MentionRecord>,
}

impl MentionRecords {
    /// Append a record unless an identical payload was already recorded
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` when the payload cannot be
    /// serialized into a fingerprint.
    pub fn record(&mut self, rendered: String, data: Value) -> serde_json::Result<()> {
        let fingerprint = serde_json::to_string(&data)?;
        if !self.records.iter().any(|r| r.fingerprint == fingerprint) {
            self.records.push(MentionRecord {
                rendered,
                data,
                fingerprint,
            });
        }
        Ok(())
    }

    /// Payloads of records whose rendered text still occurs in `value`,
    /// in insertion order
    pub fn present_in(&self, value: &str) -> Vec<Value> {
        self.records
            .iter()
            .filter(|r| value.contains(&r.rendered))
            .map(|r| r.data.clone())
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dedupe_by_fingerprint() {
        let mut records = MentionRecords::default();
        records
            .record("@alice".into(), json!({"text": "alice", "id": 1}))
            .unwrap();
        records
            .record("@alice".into(), json!({"text": "alice", "id": 1}))
            .unwrap();
        assert_eq!(records.len(), 1);

        records
            .record("@alice".into(), json!({"text": "alice", "id": 2}))
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_present_in_checks_rendered_substring() {
        let mut records = MentionRecords::default();
        records.record("@alice".into(), json!("alice")).unwrap();
        records.record("@bob".into(), json!("bob")).unwrap();

        assert_eq!(
            records.present_in("hello @alice and @bob"),
            vec![json!("alice"), json!("bob")]
        );
        assert_eq!(records.present_in("hello @alice"), vec![json!("alice")]);
        assert!(records.present_in("nothing here").is_empty());
    }

    #[test]
    fn test_deleted_mention_disappears_without_forgetting_record() {
        let mut records = MentionRecords::default();
        records.record("@alice".into(), json!("alice")).unwrap();

        assert!(records.present_in("").is_empty());
        // The record survives; the mention reappearing counts again.
        assert_eq!(records.present_in("@alice"), vec![json!("alice")]);
    }
}
