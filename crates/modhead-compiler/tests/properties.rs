//! Property tests: compilation is deterministic, skips exactly the unusable
//! profiles, and derives ids and priorities from list order.

use modhead_compiler::{compile, header_strategy, HeaderStrategy};
use modhead_types::{Header, HeaderOperation, Profile, ProfileList};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_header_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("User-Agent".to_string()),
        Just("user-agent".to_string()),
        Just("Accept".to_string()),
        Just("Cookie".to_string()),
        Just("X-Custom".to_string()),
        Just("x-custom".to_string()),
        "X-[A-Za-z]{1,6}",
    ]
}

fn arb_header() -> impl Strategy<Value = Header> {
    (arb_header_name(), "[a-z0-9=]{0,4}").prop_map(|(name, value)| Header::new(name, value))
}

fn arb_profile() -> impl Strategy<Value = Profile> {
    (
        any::<bool>(),
        prop_oneof![Just(String::new()), "[a-z.*^$]{1,10}"],
        prop::collection::vec(arb_header(), 0..6),
    )
        .prop_map(|(enabled, url_regex, headers)| Profile {
            headers,
            ..Profile::new("generated", url_regex).with_enabled(enabled)
        })
}

fn arb_profiles() -> impl Strategy<Value = ProfileList> {
    prop::collection::vec(arb_profile(), 0..8).prop_map(|profiles| {
        profiles
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.with_id(format!("p{i}").as_str()))
            .collect()
    })
}

/// Independent statement of which profiles should emit a rule.
fn retained(profiles: &ProfileList) -> Vec<(usize, &Profile)> {
    profiles
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.enabled
                && !p.url_regex.is_empty()
                && p.headers.iter().any(|h| !h.name.is_empty() && !h.value.is_empty())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Compiling the same snapshot twice yields the same batch.
    #[test]
    fn compilation_is_deterministic(profiles in arb_profiles()) {
        prop_assert_eq!(compile(&profiles), compile(&profiles));
    }

    /// One rule per retained profile, in input order, with the pattern verbatim.
    #[test]
    fn one_rule_per_retained_profile(profiles in arb_profiles()) {
        let rules = compile(&profiles);
        let kept = retained(&profiles);

        prop_assert_eq!(rules.len(), kept.len());
        for (rule, (_, profile)) in rules.iter().zip(&kept) {
            prop_assert_eq!(&rule.condition.regex_filter, &profile.url_regex);
        }
    }

    /// Ids are exactly 1..=n in output order.
    #[test]
    fn rule_ids_are_contiguous_from_one(profiles in arb_profiles()) {
        let rules = compile(&profiles);
        for (i, rule) in rules.iter().enumerate() {
            prop_assert_eq!(rule.id.get() as usize, i + 1);
        }
    }

    /// Priority counts down from the list length by input index.
    #[test]
    fn priority_follows_input_index(profiles in arb_profiles()) {
        let rules = compile(&profiles);
        let kept = retained(&profiles);

        for (rule, (index, _)) in rules.iter().zip(&kept) {
            prop_assert_eq!(rule.priority as usize, profiles.len() - index);
            prop_assert!(rule.priority >= 1);
        }
        for pair in rules.windows(2) {
            prop_assert!(pair[0].priority > pair[1].priority);
        }
    }

    /// Every complete header name shows up, each group opens with SET, and
    /// only natively appendable groups carry APPENDs.
    #[test]
    fn header_groups_are_emitted_by_strategy(profiles in arb_profiles()) {
        let rules = compile(&profiles);
        let kept = retained(&profiles);

        for (rule, (_, profile)) in rules.iter().zip(&kept) {
            let mut expected_counts: HashMap<String, usize> = HashMap::new();
            for header in profile.complete_headers() {
                *expected_counts.entry(header.name.to_ascii_lowercase()).or_default() += 1;
            }

            let emitted: BTreeSet<String> = rule
                .request_headers()
                .iter()
                .map(|op| op.header.to_ascii_lowercase())
                .collect();
            let expected: BTreeSet<String> = expected_counts.keys().cloned().collect();
            prop_assert_eq!(emitted, expected);

            let mut seen: HashMap<String, usize> = HashMap::new();
            for op in rule.request_headers() {
                let key = op.header.to_ascii_lowercase();
                let count = seen.entry(key.clone()).or_default();
                if *count == 0 {
                    prop_assert_eq!(op.operation, HeaderOperation::Set);
                } else {
                    prop_assert_eq!(op.operation, HeaderOperation::Append);
                    prop_assert_eq!(header_strategy(&op.header), HeaderStrategy::Native);
                }
                *count += 1;
            }

            for (name, count) in seen {
                let expected = match header_strategy(&name) {
                    HeaderStrategy::Native => expected_counts[&name],
                    HeaderStrategy::Merged { .. } => 1,
                };
                prop_assert_eq!(count, expected);
            }
        }
    }
}
