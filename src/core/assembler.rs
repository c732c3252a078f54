// Copyright 2026 karabiner-chord-compiler contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rule-set assembly
//!
//! Groups manipulators into named, condition-scoped rules and assembles
//! rules into a profile. Assembly is pure and deterministic: identical
//! rule definitions always produce an identical profile, which the daemon
//! relies on because it resolves ties purely by declared order.
//!
//! Assembly is also the structural-error gate. Every manipulator is
//! validated and the whole rule set is checked for ambiguous chords
//! before a profile exists, so no partial or corrupted document can ever
//! reach the writer.

use crate::core::conflict::{ChordScope, ConflictDetector};
use crate::core::types::{ConditionExpr, Manipulator, Profile, Rule};
use crate::core::validator::{validate_manipulator, ValidationError};
use thiserror::Error;

/// Fatal compile-time errors. Either kind aborts generation before any
/// output is written.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A manipulator failed structural validation
    #[error("Invalid manipulator {index} ({manipulator}) in rule '{rule}': {source}")]
    InvalidTriggerSpec {
        /// Owning rule name
        rule: String,
        /// Manipulator index within the rule
        index: usize,
        /// Rendered manipulator, for the error report
        manipulator: String,
        #[source]
        source: ValidationError,
    },

    /// Two manipulators share a chord scope but specify different actions
    #[error("Ambiguous mapping for {scope}: {entries}")]
    AmbiguousRuleOrder {
        /// The contested chord scope
        scope: ChordScope,
        /// Rendered list of the competing entries
        entries: String,
    },
}

/// Assembles named rules into a profile, in declaration order.
///
/// # Example
///
/// ```
/// use karabiner_chord_compiler::core::assembler::RuleSetAssembler;
/// use karabiner_chord_compiler::core::types::{ActionTarget, Manipulator, TriggerSpec};
///
/// let mut assembler = RuleSetAssembler::new("Default");
/// assembler.rule(
///     "Swap escape",
///     vec![Manipulator::new(
///         TriggerSpec::bare("caps_lock"),
///         ActionTarget::key("escape"),
///     )],
/// );
///
/// let profile = assembler.assemble()?;
/// assert_eq!(profile.rules.len(), 1);
/// # Ok::<(), karabiner_chord_compiler::core::assembler::CompileError>(())
/// ```
pub struct RuleSetAssembler {
    profile_name: String,
    rules: Vec<Rule>,
}

impl RuleSetAssembler {
    /// Creates an assembler targeting the given profile name.
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            rules: Vec::new(),
        }
    }

    /// Adds an unconditional rule.
    pub fn rule(&mut self, name: impl Into<String>, manipulators: Vec<Manipulator>) -> &mut Self {
        self.rule_when(name, Vec::new(), manipulators)
    }

    /// Adds a condition-scoped rule. The conditions apply uniformly to
    /// every manipulator in the rule.
    pub fn rule_when(
        &mut self,
        name: impl Into<String>,
        conditions: Vec<ConditionExpr>,
        manipulators: Vec<Manipulator>,
    ) -> &mut Self {
        self.rules.push(Rule {
            name: name.into(),
            conditions,
            manipulators,
        });
        self
    }

    /// Validates the rule set and produces the profile.
    ///
    /// # Errors
    ///
    /// - `CompileError::InvalidTriggerSpec` for the first malformed
    ///   manipulator, naming its rule and index
    /// - `CompileError::AmbiguousRuleOrder` when any chord scope carries
    ///   two or more distinct actions
    pub fn assemble(self) -> Result<Profile, CompileError> {
        for rule in &self.rules {
            for (index, manipulator) in rule.manipulators.iter().enumerate() {
                validate_manipulator(manipulator).map_err(|source| {
                    CompileError::InvalidTriggerSpec {
                        rule: rule.name.clone(),
                        index,
                        manipulator: manipulator.to_string(),
                        source,
                    }
                })?;
            }
        }

        let mut detector = ConflictDetector::new();
        for rule in &self.rules {
            detector.add_rule(rule);
        }

        if let Some(conflict) = detector.find_conflicts().into_iter().next() {
            let entries = conflict
                .entries
                .iter()
                .map(|e| format!("rule '{}' #{} → {}", e.rule, e.index, e.action))
                .collect::<Vec<_>>()
                .join("; ");

            return Err(CompileError::AmbiguousRuleOrder {
                scope: conflict.scope,
                entries,
            });
        }

        Ok(Profile {
            name: self.profile_name,
            rules: self.rules,
        })
    }
}
