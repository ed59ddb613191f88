//! Property-based tests for canonical_errors
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use canonical_errors::logging::MAX_FIELD_OUTPUT_LEN;
use canonical_errors::{
    inspect, join, Canonical, Cause, Extras, Flags, Group, Unwrapped, ERR_UNKNOWN,
};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use std::thread;

// ============================================================================
// STRATEGIES
// ============================================================================

prop_compose! {
    fn arb_kind()(
        namespace in "[a-z]{1,8}",
        code in "[a-z][a-z-]{0,11}",
        message in "\\PC{0,40}",
        bits in any::<u8>(),
    ) -> Canonical {
        Canonical::from_parts(namespace, code, message).with_flags(Flags::from_bits(bits))
    }
}

fn arb_kinds(max: usize) -> impl Strategy<Value = Vec<Canonical>> {
    prop::collection::vec(arb_kind(), 0..max)
}

// ============================================================================
// TRUNCATION PROPERTIES
// ============================================================================

proptest! {
    /// Log lines must always be valid UTF-8
    #[test]
    fn log_line_preserves_utf8(s in "\\PC*") {
        let err = Canonical::from_parts("svc", "op", s.clone())
            .with_extras(Extras::new().with_stack_trace(s));

        let mut buffer = String::new();
        err.log_record().write_to(&mut buffer).unwrap();

        assert!(std::str::from_utf8(buffer.as_bytes()).is_ok());
    }

    /// Every free-text field is bounded
    #[test]
    fn log_line_is_bounded(message in "\\PC{0,5000}", trace in "\\PC{0,5000}") {
        let err = Canonical::from_parts("svc", "op", message)
            .with_extras(Extras::new().with_stack_trace(trace));

        let mut buffer = String::new();
        err.log_record().write_to(&mut buffer).unwrap();

        // Two bounded fields plus fixed framing
        assert!(buffer.len() <= 2 * MAX_FIELD_OUTPUT_LEN + 128);
    }
}

// ============================================================================
// FLAG PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn set_then_has(base in any::<u8>(), bits in 1u8..) {
        let flags = Flags::from_bits(base).set(Flags::from_bits(bits));
        prop_assert!(flags.has(Flags::from_bits(bits)));
    }

    #[test]
    fn clear_removes_exactly_the_given_bits(base in any::<u8>(), bits in any::<u8>()) {
        let cleared = Flags::from_bits(base).clear(Flags::from_bits(bits));
        prop_assert_eq!(cleared.bits(), base & !bits);
    }

    #[test]
    fn toggle_twice_is_identity(base in any::<u8>(), bits in any::<u8>()) {
        let flags = Flags::from_bits(base);
        prop_assert_eq!(flags.toggle(Flags::from_bits(bits)).toggle(Flags::from_bits(bits)), flags);
    }

    #[test]
    fn text_form_parses_back(bits in any::<u8>()) {
        let flags = Flags::from_bits(bits);
        prop_assert_eq!(flags.to_string().parse::<Flags>(), Ok(flags));
    }

    #[test]
    fn with_flags_only_adds_bits(kind in arb_kind(), bits in any::<u8>()) {
        let flagged = kind.with_flags(Flags::from_bits(bits));
        prop_assert_eq!(flagged.flags().bits(), kind.flags().bits() | bits);
    }
}

// ============================================================================
// IDENTITY PROPERTIES
// ============================================================================

proptest! {
    /// Wrapping never changes what kind an error is
    #[test]
    fn wrap_preserves_identity(kind in arb_kind(), cause in "\\PC{0,40}") {
        prop_assert_eq!(kind.wrap(cause), kind);
    }

    /// A copy is equal to its original, at every link
    #[test]
    fn copy_equals_original(kinds in arb_kinds(6), kind in arb_kind()) {
        let err = kinds.into_iter().fold(kind, |inner, outer| outer.wrap(inner));
        let copy = err.copy();

        prop_assert_eq!(&copy, &err);
        let original_links: Vec<Canonical> = err.as_group().into_iter().collect();
        let copied_links: Vec<Canonical> = copy.as_group().into_iter().collect();
        prop_assert_eq!(original_links, copied_links);
    }

    /// as_group yields one entry per link of a classified chain
    #[test]
    fn as_group_matches_chain_depth(kinds in arb_kinds(8), kind in arb_kind()) {
        let depth = kinds.len();
        let err = kinds.into_iter().fold(kind, |inner, outer| outer.wrap(inner));
        prop_assert_eq!(err.as_group().len(), depth + 1);
    }

    /// A foreign root adds exactly one unknown entry
    #[test]
    fn as_group_ends_at_foreign_root(kinds in arb_kinds(8), root in "\\PC{1,20}") {
        prop_assume!(!kinds.is_empty());
        let depth = kinds.len();
        let mut iter = kinds.into_iter();
        let first = iter.next().unwrap().wrap(root);
        let err = iter.fold(first, |inner, outer| outer.wrap(inner));

        let group = err.as_group();
        prop_assert_eq!(group.len(), depth + 1);
        prop_assert_eq!(group.errors().last(), Some(&ERR_UNKNOWN));
    }
}

// ============================================================================
// GROUP PROPERTIES
// ============================================================================

proptest! {
    /// Nesting groups at any depth still produces a flat group
    #[test]
    fn nested_groups_flatten(levels in prop::collection::vec(arb_kinds(4), 1..8)) {
        let total: usize = levels.iter().map(Vec::len).sum();

        let nested = levels.into_iter().fold(Group::new(), |inner, kinds| {
            let mut outer = Group::from_errors(kinds);
            outer.push(inner);
            outer
        });

        prop_assert_eq!(nested.len(), total);
        for member in &nested {
            prop_assert!(!matches!(member.cause(), Some(Cause::Aggregate(_))));
        }
    }

    /// Join keeps the receiver group and appends in order
    #[test]
    fn join_appends_after_existing(first in arb_kinds(5), rest in arb_kinds(5)) {
        let expected: Vec<Canonical> = first.iter().chain(rest.iter()).cloned().collect();
        let joined = join(Some(Group::from_errors(first)), rest);
        prop_assert_eq!(joined.errors(), expected.as_slice());
    }

    /// The cursor visits members in insertion order
    #[test]
    fn chain_walks_in_insertion_order(kinds in arb_kinds(10)) {
        let group = Group::from_errors(kinds.clone());
        let mut visited: Vec<Canonical> = Vec::new();

        match group.unwrap_cause() {
            None => {}
            Some(Unwrapped::Member(only)) => visited.push(only.clone()),
            Some(Unwrapped::Chain(chain)) => {
                let mut cursor = Some(chain);
                while let Some(step) = cursor {
                    if let Some(head) = step.head() {
                        visited.push(head.clone());
                    }
                    cursor = step.unwrap_cause();
                }
            }
        }

        prop_assert_eq!(visited, kinds);
    }

    /// Every member is found by identity
    #[test]
    fn every_member_is_reachable(kinds in arb_kinds(10)) {
        let group = Group::from_errors(kinds.clone());
        for kind in &kinds {
            prop_assert!(inspect::is(&group, kind));
        }
    }

    /// Sorting orders members by rendered text
    #[test]
    fn sort_orders_by_text(kinds in arb_kinds(10)) {
        let mut group = Group::from_errors(kinds);
        group.sort();
        for i in 1..group.len() {
            prop_assert!(!group.less(i, i - 1));
        }
    }
}

// ============================================================================
// DISPLAY PROPERTIES
// ============================================================================

proptest! {
    /// Rendering never panics and always names the kind
    #[test]
    fn display_names_the_kind(kind in arb_kind(), cause in "\\PC{0,100}") {
        let err = kind.wrap(cause);
        let plain = err.to_string();
        let verbose = format!("{:#}", err);

        let prefix = format!("[{}:{}]", kind.namespace(), kind.code());
        prop_assert!(plain.starts_with(&prefix));
        prop_assert!(verbose.contains(&prefix));
    }

    /// Several members render as a framed bullet list
    #[test]
    fn group_display_lists_members(kinds in prop::collection::vec(arb_kind(), 2..6)) {
        let group = Group::from_errors(kinds.clone());
        let rendered = group.to_string();

        prop_assert!(rendered.starts_with("\n* "));
        prop_assert!(rendered.ends_with("\n\n"));
        for kind in &kinds {
            let bullet = format!("* {}", kind);
            prop_assert!(rendered.contains(&bullet));
        }
    }
}

// ============================================================================
// CONCURRENCY PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// A shared group collects every failure reported by workers
    #[test]
    fn concurrent_collection(workers in 1usize..8, per_worker in 1usize..16) {
        const JOB_FAILED: Canonical = Canonical::new("jobs", "failed", "job failed");
        let shared = Arc::new(Mutex::new(Group::new()));

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for job in 0..per_worker {
                        let err = JOB_FAILED.wrap(format!("worker {} job {}", worker, job));
                        shared.lock().unwrap().push(err);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let group = shared.lock().unwrap();
        prop_assert_eq!(group.len(), workers * per_worker);
        prop_assert!(group.iter().all(|member| *member == JOB_FAILED));
    }
}
