//! Rule activation and kind-indexed dispatch

use crate::ast::Kind;
use crate::rules::Rule;
use crate::version::PhpVersion;
use std::collections::{HashMap, HashSet};

/// The configuration-filtered rule set driving one analysis run.
///
/// Built once, never mutated afterward; rebuild it when the configuration
/// changes. Immutable, so it is safely shared by reference across
/// concurrent per-file traversals.
#[derive(Debug)]
pub struct Activation {
    rules: Vec<Rule>,
    index: HashMap<Kind, Vec<usize>>,
}

impl Activation {
    /// Filter `catalogue` down to the active rules and index them by entry
    /// kind.
    ///
    /// A non-empty allow-list takes precedence over `ignored_ids` by
    /// converting to an equivalent ignore set: every identifier outside
    /// `allowed_ids` becomes ignored and the explicit ignore set is
    /// disregarded. A rule is active iff its id survives the effective
    /// ignore set and `target_version` satisfies its minimum version.
    /// Identifiers naming no known rule are ignored here without error;
    /// surfacing them is the configuration layer's job.
    pub fn new(
        catalogue: Vec<Rule>,
        ignored_ids: &HashSet<String>,
        allowed_ids: &HashSet<String>,
        target_version: PhpVersion,
    ) -> Self {
        let effective_ignore: HashSet<String> = if allowed_ids.is_empty() {
            ignored_ids.clone()
        } else {
            catalogue
                .iter()
                .map(|rule| rule.id().to_string())
                .filter(|id| !allowed_ids.contains(id))
                .collect()
        };

        let rules: Vec<Rule> = catalogue
            .into_iter()
            .filter(|rule| {
                if effective_ignore.contains(rule.id()) {
                    log::debug!("rule {} ignored by configuration", rule.id());
                    return false;
                }
                if target_version < rule.min_version() {
                    log::debug!(
                        "rule {} requires PHP {}, target is {}",
                        rule.id(),
                        rule.min_version(),
                        target_version
                    );
                    return false;
                }
                true
            })
            .collect();

        // Registration order within a kind bucket decides hint order when
        // several rules fire on the same node.
        let mut index: HashMap<Kind, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            index.entry(rule.entry_kind()).or_default().push(i);
        }

        Self { rules, index }
    }

    /// Activate the full built-in catalogue.
    pub fn with_catalogue(
        ignored_ids: &HashSet<String>,
        allowed_ids: &HashSet<String>,
        target_version: PhpVersion,
    ) -> Self {
        Self::new(Rule::catalogue(), ignored_ids, allowed_ids, target_version)
    }

    /// All active rules, in registration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Active rules registered for the given node kind, in registration
    /// order. Kinds with no rules yield an empty iterator; that is the
    /// normal case for most of a tree.
    pub fn rules_for(&self, kind: Kind) -> impl Iterator<Item = &Rule> {
        self.index
            .get(&kind)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.rules[i])
    }

    /// Whether a rule with this identifier is active.
    pub fn is_active(&self, rule_id: &str) -> bool {
        self.rules.iter().any(|r| r.id() == rule_id)
    }
}
