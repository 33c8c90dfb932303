//! Profile list to rule batch compilation

use crate::strategy::{header_strategy, HeaderStrategy};
use modhead_types::{Header, ModifyHeaderInfo, Profile, ProfileId, ProfileList, Rule, RuleId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Why a profile produced no rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    EmptyUrlRegex,
    NoCompleteHeaders,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Disabled => f.write_str("disabled"),
            SkipReason::EmptyUrlRegex => f.write_str("empty URL regex"),
            SkipReason::NoCompleteHeaders => f.write_str("no complete headers"),
        }
    }
}

/// A profile left out of the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedProfile {
    /// Position in the input list
    pub index: usize,
    pub profile_id: ProfileId,
    pub reason: SkipReason,
}

/// Rules plus an account of which profiles were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
    pub rules: Vec<Rule>,
    pub skipped: Vec<SkippedProfile>,
}

/// Compile an ordered profile list into a rule batch.
///
/// Earlier profiles get strictly higher priority. Rule ids run from 1 over
/// the emitted rules only. `url_regex` is passed through untouched; the host
/// engine rejects malformed patterns at install time.
pub fn compile(profiles: &ProfileList) -> Vec<Rule> {
    compile_with_summary(profiles).rules
}

/// Same as [`compile`], also reporting skipped profiles.
pub fn compile_with_summary(profiles: &ProfileList) -> CompileSummary {
    let total = profiles.len();
    let mut summary = CompileSummary::default();
    let mut next_id = RuleId::FIRST;

    for (index, profile) in profiles.iter().enumerate() {
        if let Some(reason) = skip_reason(profile) {
            trace!(profile_id = %profile.id, index, %reason, "Skipping profile");
            summary.skipped.push(SkippedProfile {
                index,
                profile_id: profile.id.clone(),
                reason,
            });
            continue;
        }

        let rule = Rule::modify_headers(
            next_id,
            priority_for(total, index),
            profile.url_regex.clone(),
            header_operations(profile.complete_headers()),
        );
        next_id = next_id.next();
        summary.rules.push(rule);
    }

    debug!(
        profiles = total,
        rules = summary.rules.len(),
        skipped = summary.skipped.len(),
        "Compiled profile list"
    );

    summary
}

/// Reason a profile is left out, if any.
pub fn skip_reason(profile: &Profile) -> Option<SkipReason> {
    if !profile.enabled {
        Some(SkipReason::Disabled)
    } else if profile.url_regex.is_empty() {
        Some(SkipReason::EmptyUrlRegex)
    } else if profile.complete_headers().next().is_none() {
        Some(SkipReason::NoCompleteHeaders)
    } else {
        None
    }
}

/// Priority for the profile at `index` in a list of `total` profiles.
///
/// Counts down from `total`, so the first profile always wins and the value
/// never drops below 1.
pub fn priority_for(total: usize, index: usize) -> u32 {
    u32::try_from(total.saturating_sub(index)).unwrap_or(u32::MAX)
}

/// Headers sharing a name, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup<'a> {
    /// Casing of the first occurrence
    pub name: &'a str,
    pub values: Vec<&'a str>,
}

/// Group headers by name in first-appearance order, keeping value order.
///
/// Callers pass [`Profile::complete_headers`] to see the groups `compile`
/// emits operations for.
pub fn group_headers<'a>(headers: impl Iterator<Item = &'a Header>) -> Vec<HeaderGroup<'a>> {
    let mut groups: Vec<HeaderGroup<'a>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for header in headers {
        let key = header.name.to_ascii_lowercase();
        match by_name.get(&key) {
            Some(&slot) => groups[slot].values.push(&header.value),
            None => {
                by_name.insert(key, groups.len());
                groups.push(HeaderGroup {
                    name: &header.name,
                    values: vec![&header.value],
                });
            }
        }
    }

    groups
}

fn header_operations<'a>(headers: impl Iterator<Item = &'a Header>) -> Vec<ModifyHeaderInfo> {
    let mut operations = Vec::new();

    for group in group_headers(headers) {
        match header_strategy(group.name) {
            HeaderStrategy::Native => {
                for (i, value) in group.values.iter().enumerate() {
                    operations.push(if i == 0 {
                        ModifyHeaderInfo::set(group.name, *value)
                    } else {
                        ModifyHeaderInfo::append(group.name, *value)
                    });
                }
            }
            HeaderStrategy::Merged { separator } => {
                operations.push(ModifyHeaderInfo::set(
                    group.name,
                    group.values.join(separator),
                ));
            }
        }
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhead_types::{HeaderOperation, ResourceType};

    fn profile(id: &str, regex: &str, headers: &[(&str, &str)]) -> Profile {
        headers
            .iter()
            .fold(Profile::new(id, regex).with_id(id), |p, (n, v)| {
                p.with_header(*n, *v)
            })
    }

    fn ops(rule: &Rule) -> Vec<(&str, HeaderOperation, &str)> {
        rule.request_headers()
            .iter()
            .map(|h| (h.header.as_str(), h.operation, h.value.as_str()))
            .collect()
    }

    #[test]
    fn empty_list_compiles_to_no_rules() {
        assert!(compile(&ProfileList::new()).is_empty());
    }

    #[test]
    fn single_profile_single_header() {
        let list = ProfileList::from(vec![profile("1", "example.com", &[("X-Test", "123")])]);
        let rules = compile(&list);

        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.id, RuleId::new(1));
        assert_eq!(rule.priority, 1);
        assert_eq!(rule.condition.regex_filter, "example.com");
        assert_eq!(rule.condition.resource_types, ResourceType::ALL.to_vec());
        assert_eq!(ops(rule), vec![("X-Test", HeaderOperation::Set, "123")]);
    }

    #[test]
    fn earlier_profiles_get_higher_priority() {
        let list = ProfileList::from(vec![
            profile("first", ".*", &[("A", "1")]),
            profile("second", ".*", &[("B", "2")]),
        ]);
        let rules = compile(&list);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].priority, 2);
        assert_eq!(ops(&rules[0]), vec![("A", HeaderOperation::Set, "1")]);
        assert_eq!(rules[1].priority, 1);
        assert_eq!(ops(&rules[1]), vec![("B", HeaderOperation::Set, "2")]);
    }

    #[test]
    fn native_headers_append_and_custom_headers_merge() {
        let list = ProfileList::from(vec![profile(
            "1",
            ".*",
            &[
                ("User-Agent", "ua1"),
                ("User-Agent", "ua2"),
                ("X-Custom", "c1"),
                ("X-Custom", "c2"),
            ],
        )]);
        let rules = compile(&list);

        assert_eq!(
            ops(&rules[0]),
            vec![
                ("User-Agent", HeaderOperation::Set, "ua1"),
                ("User-Agent", HeaderOperation::Append, "ua2"),
                ("X-Custom", HeaderOperation::Set, "c1, c2"),
            ]
        );
    }

    #[test]
    fn duplicated_cookie_is_merged_with_semicolons() {
        let list = ProfileList::from(vec![profile(
            "1",
            ".*",
            &[("Cookie", "a=1"), ("cookie", "b=2")],
        )]);
        let rules = compile(&list);

        assert_eq!(
            ops(&rules[0]),
            vec![("Cookie", HeaderOperation::Set, "a=1; b=2")]
        );
    }

    #[test]
    fn first_casing_wins_and_groups_keep_first_appearance_order() {
        let list = ProfileList::from(vec![profile(
            "1",
            ".*",
            &[
                ("x-env", "a"),
                ("Accept", "text/html"),
                ("X-ENV", "b"),
                ("accept", "*/*"),
            ],
        )]);
        let rules = compile(&list);

        assert_eq!(
            ops(&rules[0]),
            vec![
                ("x-env", HeaderOperation::Set, "a, b"),
                ("Accept", HeaderOperation::Set, "text/html"),
                ("Accept", HeaderOperation::Append, "*/*"),
            ]
        );
    }

    #[test]
    fn group_headers_matches_emitted_groups() {
        let p = profile(
            "1",
            ".*",
            &[("x-env", "a"), ("Accept", "text/html"), ("X-ENV", ""), ("X-ENV", "b")],
        );
        let groups = group_headers(p.complete_headers());

        assert_eq!(
            groups,
            vec![
                HeaderGroup {
                    name: "x-env",
                    values: vec!["a", "b"],
                },
                HeaderGroup {
                    name: "Accept",
                    values: vec!["text/html"],
                },
            ]
        );
    }

    #[test]
    fn skipped_profiles_keep_input_index_priority_and_do_not_use_ids() {
        let list = ProfileList::from(vec![
            profile("off", ".*", &[("A", "1")]).with_enabled(false),
            profile("no-regex", "", &[("A", "1")]),
            profile("no-headers", ".*", &[("A", ""), ("", "1")]),
            profile("kept", ".*", &[("A", "1")]),
        ]);
        let summary = compile_with_summary(&list);

        assert_eq!(summary.rules.len(), 1);
        assert_eq!(summary.rules[0].id, RuleId::FIRST);
        assert_eq!(summary.rules[0].priority, 1);

        let reasons: Vec<_> = summary.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::Disabled,
                SkipReason::EmptyUrlRegex,
                SkipReason::NoCompleteHeaders,
            ]
        );
        assert_eq!(summary.skipped[2].index, 2);
    }

    #[test]
    fn incomplete_headers_are_dropped_from_kept_profiles() {
        let list = ProfileList::from(vec![profile(
            "1",
            ".*",
            &[("X-A", ""), ("X-B", "2"), ("", "3")],
        )]);
        let rules = compile(&list);
        assert_eq!(ops(&rules[0]), vec![("X-B", HeaderOperation::Set, "2")]);
    }

    #[test]
    fn malformed_regex_is_passed_through() {
        let list = ProfileList::from(vec![profile("1", "([unclosed", &[("A", "1")])]);
        let rules = compile(&list);
        assert_eq!(rules[0].condition.regex_filter, "([unclosed");
    }

    #[test]
    fn compiled_batch_serializes_like_engine_rules() {
        let list = ProfileList::from(vec![profile("1", "example.com", &[("X-Test", "123")])]);
        let json = serde_json::to_value(compile(&list)).unwrap();
        assert_eq!(json[0]["action"]["requestHeaders"][0]["operation"], "set");
        assert_eq!(json[0]["condition"]["regexFilter"], "example.com");
    }
}
