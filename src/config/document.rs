//! src/config/document.rs
//!
//! Serde schema of the emitted Karabiner document
//!
//! The document schema is owned by the daemon; this module's only
//! obligation is producing a conforming document deterministically.
//! Field order is fixed by the struct definitions and collections keep
//! declaration order, so identical profiles always render to identical
//! bytes.
//!
//! Conversion notes:
//! - Rule-scoped conditions are replicated into every manipulator
//!   document, as the daemon's schema attaches conditions per manipulator
//! - The lazy flag of a tap/hold manipulator is carried on the emitted
//!   alone events
//! - Launch actions delegate resolution to the OS (`open -a`); command
//!   actions pass through verbatim
//! - Numeric key codes serialize as numbers

use crate::core::types::{
    ActionTarget, ConditionExpr, KeyIdentifier, Manipulator, ModifierFlag, OptionalMatch, Profile,
    Rule,
};
use serde::Serialize;

/// Standalone rule-set document (`build` output).
#[derive(Clone, Debug, Serialize)]
pub struct RuleSetDocument {
    /// Document title shown by the daemon's UI
    pub title: String,
    /// Rules in evaluation order
    pub rules: Vec<RuleDocument>,
}

/// One rule: a description plus its manipulators.
#[derive(Clone, Debug, Serialize)]
pub struct RuleDocument {
    /// Human-readable rule name
    pub description: String,
    /// Manipulators in match-priority order
    pub manipulators: Vec<ManipulatorDocument>,
}

/// One manipulator entry in the daemon's schema.
#[derive(Clone, Debug, Serialize)]
pub struct ManipulatorDocument {
    /// Always `"basic"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Trigger event
    pub from: FromEvent,
    /// Held/combined effects
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<ToEvent>,
    /// Tap (alone) effects
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_if_alone: Vec<ToEvent>,
    /// Scope predicates
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionDocument>,
}

/// Trigger event: key plus modifier requirement.
#[derive(Clone, Debug, Serialize)]
pub struct FromEvent {
    /// Triggering key
    pub key_code: KeyIdentifier,
    /// Omitted entirely for bare strict triggers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<FromModifiers>,
}

/// Modifier requirement of a trigger event.
#[derive(Clone, Debug, Serialize)]
pub struct FromModifiers {
    /// Modifiers that must be held
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mandatory: Vec<ModifierFlag>,
    /// `["any"]` for wildcard triggers, omitted for strict ones
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<ModifierFlag>,
}

/// One emitted effect.
#[derive(Clone, Debug, Serialize)]
pub struct ToEvent {
    /// Key substitution target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_code: Option<KeyIdentifier>,
    /// Shell command handed verbatim to the daemon's effector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell_command: Option<String>,
    /// Modifiers held together with the key
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierFlag>,
    /// Defer this event until tap/hold resolution
    #[serde(skip_serializing_if = "is_false")]
    pub lazy: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Condition predicate in the daemon's schema.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionDocument {
    DeviceIf { identifiers: Vec<DeviceIdentifiers> },
    DeviceUnless { identifiers: Vec<DeviceIdentifiers> },
    FrontmostApplicationIf { bundle_identifiers: Vec<String> },
    FrontmostApplicationUnless { bundle_identifiers: Vec<String> },
}

/// Device identity as the daemon matches it.
#[derive(Clone, Debug, Serialize)]
pub struct DeviceIdentifiers {
    pub vendor_id: u32,
    pub product_id: u32,
}

impl From<&ConditionExpr> for ConditionDocument {
    fn from(condition: &ConditionExpr) -> Self {
        // Reduce negation to a parity so deeply nested Not chains still
        // land on the right if/unless variant
        let mut negated = false;
        let mut inner = condition;
        while let ConditionExpr::Not(next) = inner {
            negated = !negated;
            inner = next;
        }

        match inner {
            ConditionExpr::DeviceIs {
                vendor_id,
                product_id,
            } => {
                let identifiers = vec![DeviceIdentifiers {
                    vendor_id: *vendor_id,
                    product_id: *product_id,
                }];
                if negated {
                    ConditionDocument::DeviceUnless { identifiers }
                } else {
                    ConditionDocument::DeviceIf { identifiers }
                }
            }
            ConditionExpr::AppMatches { pattern } => {
                let bundle_identifiers = vec![pattern.clone()];
                if negated {
                    ConditionDocument::FrontmostApplicationUnless { bundle_identifiers }
                } else {
                    ConditionDocument::FrontmostApplicationIf { bundle_identifiers }
                }
            }
            // Unreachable: the loop above strips every Not
            ConditionExpr::Not(_) => ConditionDocument::FrontmostApplicationIf {
                bundle_identifiers: Vec::new(),
            },
        }
    }
}

impl From<&crate::core::types::TriggerSpec> for FromEvent {
    fn from(trigger: &crate::core::types::TriggerSpec) -> Self {
        let optional = match trigger.optional {
            OptionalMatch::Any => vec![ModifierFlag::Any],
            OptionalMatch::Strict => Vec::new(),
        };

        let modifiers = if trigger.mandatory.is_empty() && optional.is_empty() {
            None
        } else {
            Some(FromModifiers {
                mandatory: trigger.mandatory.clone(),
                optional,
            })
        };

        FromEvent {
            key_code: trigger.key.clone(),
            modifiers,
        }
    }
}

/// Expands an action into its emitted events. `lazy` is carried onto
/// each event (used for alone events of lazy tap/hold manipulators).
fn to_events(action: &ActionTarget, lazy: bool) -> Vec<ToEvent> {
    let event = |key_code, shell_command, modifiers| ToEvent {
        key_code,
        shell_command,
        modifiers,
        lazy,
    };

    match action {
        ActionTarget::RemapKey { key, modifiers } => {
            vec![event(Some(key.clone()), None, modifiers.clone())]
        }
        ActionTarget::LaunchApp { identifier } => {
            vec![event(
                None,
                Some(format!("open -a \"{}\".app", identifier)),
                Vec::new(),
            )]
        }
        ActionTarget::RunCommand { command } => {
            vec![event(None, Some(command.clone()), Vec::new())]
        }
        ActionTarget::None => Vec::new(),
    }
}

impl ManipulatorDocument {
    /// Compiles one manipulator under its rule's condition scope.
    pub fn compile(manipulator: &Manipulator, conditions: &[ConditionExpr]) -> Self {
        let to_if_alone = manipulator
            .alone_action
            .as_ref()
            .map(|alone| to_events(alone, manipulator.lazy))
            .unwrap_or_default();

        Self {
            kind: "basic",
            from: FromEvent::from(&manipulator.trigger),
            to: to_events(&manipulator.action, false),
            to_if_alone,
            conditions: conditions.iter().map(ConditionDocument::from).collect(),
        }
    }
}

impl From<&Rule> for RuleDocument {
    fn from(rule: &Rule) -> Self {
        Self {
            description: rule.name.clone(),
            manipulators: rule
                .manipulators
                .iter()
                .map(|m| ManipulatorDocument::compile(m, &rule.conditions))
                .collect(),
        }
    }
}

impl From<&Profile> for RuleSetDocument {
    fn from(profile: &Profile) -> Self {
        Self {
            title: profile.name.clone(),
            rules: profile.rules.iter().map(RuleDocument::from).collect(),
        }
    }
}

/// Renders the standalone rule-set document, newline-terminated.
pub fn render_rule_set(profile: &Profile) -> Result<String, serde_json::Error> {
    let document = RuleSetDocument::from(profile);
    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');
    Ok(rendered)
}

/// The `rules` array as a JSON value, for merging into an existing
/// daemon configuration.
pub fn rules_value(profile: &Profile) -> Result<serde_json::Value, serde_json::Error> {
    let rules: Vec<RuleDocument> = profile.rules.iter().map(RuleDocument::from).collect();
    serde_json::to_value(rules)
}
