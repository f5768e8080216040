//! Property-based tests for cloud_logger_system using proptest

use cloud_logger_system::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn any_severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn capture() -> (Logger, MemoryAppender) {
    let memory = MemoryAppender::new();
    let logger = Logger::builder()
        .output(memory.clone())
        .include_sources(false)
        .build();
    (logger, memory)
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Severity names parse back to the same severity, in any case
    #[test]
    fn test_severity_str_roundtrip(severity in any_severity(), lower in any::<bool>()) {
        let name = if lower {
            severity.to_str().to_lowercase()
        } else {
            severity.to_str().to_string()
        };
        let parsed: Severity = name.parse().unwrap();
        prop_assert_eq!(severity, parsed);
    }

    /// Ordering follows urgency, and error-class is a threshold
    #[test]
    fn test_severity_ordering(a in any_severity(), b in any_severity()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        if a <= b && a.is_error_class() {
            prop_assert!(b.is_error_class());
        }
    }
}

// ============================================================================
// Entry Tests
// ============================================================================

proptest! {
    /// Whatever is attached to a child, the parent's output is unchanged
    #[test]
    fn test_parent_unchanged_by_children(
        parent_labels in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 0..4),
        child_labels in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 1..4),
        detail in any::<i64>(),
    ) {
        let (logger, memory) = capture();
        let parent = logger.with_labels(parent_labels.clone());
        let _child = parent
            .with_labels(child_labels)
            .with_detail("value", detail)
            .with_error(Some("child error"));

        parent.info("parent");

        let record = &memory.records()[0];
        let labels: BTreeMap<String, String> = record
            .get("logging.googleapis.com/labels")
            .map(|v| serde_json::from_value(v.clone()).unwrap())
            .unwrap_or_default();
        prop_assert_eq!(labels, parent_labels);
        prop_assert!(record.get("details").is_none());
        prop_assert!(record.get("error").is_none());
    }

    /// Every emission is exactly one JSON line holding the message verbatim
    #[test]
    fn test_one_line_per_emission(
        message in "\\PC*",
        severity in any_severity(),
    ) {
        let (logger, memory) = capture();
        logger.log(severity, &message);

        let contents = memory.contents();
        prop_assert!(contents.ends_with('\n'));
        prop_assert_eq!(contents.matches('\n').count(), 1);

        let record = &memory.records()[0];
        prop_assert_eq!(record["message"].as_str().unwrap(), message.as_str());
        prop_assert_eq!(record["severity"].as_str().unwrap(), severity.to_str());
    }

    /// Detail values survive as structured JSON
    #[test]
    fn test_detail_values_preserved(
        int in any::<i64>(),
        text in "[ -~]{0,32}",
        flags in prop::collection::vec(any::<bool>(), 0..8),
    ) {
        let (logger, memory) = capture();
        logger
            .with_detail("int", int)
            .with_detail("text", &text)
            .with_detail("flags", &flags)
            .notice("details");

        let details = &memory.records()[0]["details"];
        prop_assert_eq!(details["int"].as_i64().unwrap(), int);
        prop_assert_eq!(details["text"].as_str().unwrap(), text.as_str());
        prop_assert_eq!(details["flags"].as_array().unwrap().len(), flags.len());
    }
}
