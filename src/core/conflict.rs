//! Chord conflict and reachability analysis
//!
//! This module implements conflict detection over assembled rules using
//! HashMap-based indexing. Two manipulators conflict when they share a
//! chord scope (condition list + key + mandatory set + optionality) while
//! specifying different actions; that is an authoring error, never a
//! tolerated first-wins ambiguity.
//!
//! Wildcard optionality is deliberately part of the grouping identity:
//! a trigger matching "any additional modifiers" and a strict trigger on
//! the same chord are distinct, non-conflicting entries.
//!
//! Two further analyses cover the ordering invariants:
//! - `find_shadowed` flags chords that can never match because a subset
//!   chord on the same key is evaluated earlier
//! - `coverage_gaps` compares a rule pair partitioned by an `(isX,
//!   unlessX)` condition and flags keys mapped in only one variant

use crate::core::types::{
    ActionTarget, ConditionExpr, KeyIdentifier, ModifierFlag, OptionalMatch, Profile, Rule,
    TriggerSpec,
};
use std::collections::HashMap;
use std::fmt;

/// Identity under which manipulators are grouped for conflict analysis.
///
/// Conditions are sorted so that declaration order inside a rule's
/// condition list never splits a scope in two.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ChordScope {
    /// Sorted, ANDed condition list of the owning rule
    pub conditions: Vec<ConditionExpr>,
    /// Triggering key
    pub key: KeyIdentifier,
    /// Normalized mandatory modifier set
    pub mandatory: Vec<ModifierFlag>,
    /// Strict vs. wildcard optional matching
    pub optional: OptionalMatch,
}

impl ChordScope {
    fn new(conditions: &[ConditionExpr], trigger: &TriggerSpec) -> Self {
        let mut conditions = conditions.to_vec();
        conditions.sort();

        Self {
            conditions,
            key: trigger.key.clone(),
            mandatory: trigger.mandatory.clone(),
            optional: trigger.optional,
        }
    }
}

impl fmt::Display for ChordScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.mandatory {
            write!(f, "{}+", m)?;
        }
        write!(f, "{}", self.key)?;
        if self.optional == OptionalMatch::Any {
            write!(f, " (optional any)")?;
        }
        if !self.conditions.is_empty() {
            let conds = self
                .conditions
                .iter()
                .map(|c| format!("{}", c))
                .collect::<Vec<_>>()
                .join(" & ");
            write!(f, " [{}]", conds)?;
        }
        Ok(())
    }
}

/// One manipulator's contribution to a chord scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChordEntry {
    /// Name of the owning rule (for diagnostics only)
    pub rule: String,
    /// Manipulator index within that rule
    pub index: usize,
    /// The action this entry specifies
    pub action: ActionTarget,
}

/// A detected conflict: one chord scope, two or more distinct actions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conflict {
    /// The contested chord scope
    pub scope: ChordScope,
    /// Every entry on that scope (including identical duplicates)
    pub entries: Vec<ChordEntry>,
}

/// Detects chord conflicts across rules using HashMap-based indexing.
///
/// Entries sharing a scope with an identical action are tolerated
/// (harmless duplication); a conflict requires at least two distinct
/// actions.
pub struct ConflictDetector {
    entries: HashMap<ChordScope, Vec<ChordEntry>>,
}

impl ConflictDetector {
    /// Creates an empty detector.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Indexes every manipulator of a rule under the rule's condition
    /// scope.
    pub fn add_rule(&mut self, rule: &Rule) {
        for (index, manipulator) in rule.manipulators.iter().enumerate() {
            let scope = ChordScope::new(&rule.conditions, &manipulator.trigger);
            self.entries.entry(scope).or_default().push(ChordEntry {
                rule: rule.name.clone(),
                index,
                action: manipulator.action.clone(),
            });
        }
    }

    /// Finds all conflicts, sorted by scope for deterministic reporting.
    pub fn find_conflicts(&self) -> Vec<Conflict> {
        let mut conflicts: Vec<Conflict> = self
            .entries
            .iter()
            .filter(|(_, entries)| {
                entries
                    .iter()
                    .any(|e| e.action != entries[0].action)
            })
            .map(|(scope, entries)| Conflict {
                scope: scope.clone(),
                entries: entries.clone(),
            })
            .collect();

        conflicts.sort_by(|a, b| a.scope.cmp(&b.scope));
        conflicts
    }

    /// Checks whether a specific scope carries conflicting actions.
    pub fn has_conflict(&self, scope: &ChordScope) -> bool {
        self.entries
            .get(scope)
            .map(|entries| entries.iter().any(|e| e.action != entries[0].action))
            .unwrap_or(false)
    }

    /// Total number of indexed manipulators.
    pub fn total_entries(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// A chord hidden behind an earlier subset chord on the same key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShadowedChord {
    /// Rule and index of the earlier, subset-chord manipulator
    pub winner_rule: String,
    pub winner_index: usize,
    pub winner_trigger: TriggerSpec,
    /// Rule and index of the unreachable superset-chord manipulator
    pub hidden_rule: String,
    pub hidden_index: usize,
    pub hidden_trigger: TriggerSpec,
}

impl fmt::Display for ShadowedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' #{} ({}) is unreachable behind '{}' #{} ({})",
            self.hidden_rule,
            self.hidden_index,
            self.hidden_trigger,
            self.winner_rule,
            self.winner_index,
            self.winner_trigger
        )
    }
}

/// Finds superset chords declared after a subset chord on the same key.
///
/// The daemon evaluates manipulators top-to-bottom across rules and stops
/// at the first structural match, so within one condition scope a chord
/// whose mandatory set strictly contains an earlier chord's set never
/// gets a turn. Evaluation order is rule order, then manipulator order.
pub fn find_shadowed(profile: &Profile) -> Vec<ShadowedChord> {
    // (scope conditions, rule, index, trigger) in evaluation order
    let mut seen: Vec<(Vec<ConditionExpr>, &str, usize, &TriggerSpec)> = Vec::new();
    let mut shadowed = Vec::new();

    for rule in &profile.rules {
        let mut conditions = rule.conditions.clone();
        conditions.sort();

        for (index, manipulator) in rule.manipulators.iter().enumerate() {
            for (earlier_conditions, earlier_rule, earlier_index, earlier_trigger) in &seen {
                if *earlier_conditions == conditions
                    && manipulator.trigger.is_superset_chord_of(earlier_trigger)
                {
                    shadowed.push(ShadowedChord {
                        winner_rule: (*earlier_rule).to_string(),
                        winner_index: *earlier_index,
                        winner_trigger: (*earlier_trigger).clone(),
                        hidden_rule: rule.name.clone(),
                        hidden_index: index,
                        hidden_trigger: manipulator.trigger.clone(),
                    });
                }
            }
            seen.push((conditions.clone(), &rule.name, index, &manipulator.trigger));
        }
    }

    shadowed
}

/// Compares a rule pair partitioned by an `(isX, unlessX)` condition and
/// returns the keys mapped in exactly one variant, minus any
/// acknowledged, deliberate omissions.
///
/// Every key in the result lacks an explicit decision in the other
/// variant and should either gain a mapping or join the acknowledged
/// list.
pub fn coverage_gaps(a: &Rule, b: &Rule, acknowledged: &[KeyIdentifier]) -> Vec<KeyIdentifier> {
    let keys_of = |rule: &Rule| -> Vec<KeyIdentifier> {
        rule.manipulators
            .iter()
            .map(|m| m.trigger.key.clone())
            .collect()
    };

    let keys_a = keys_of(a);
    let keys_b = keys_of(b);

    let mut gaps: Vec<KeyIdentifier> = keys_a
        .iter()
        .filter(|k| !keys_b.contains(k))
        .chain(keys_b.iter().filter(|k| !keys_a.contains(k)))
        .filter(|k| !acknowledged.contains(k))
        .cloned()
        .collect();

    gaps.sort();
    gaps.dedup();
    gaps
}
