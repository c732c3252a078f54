//! src/core/types.rs
//!
//! Core type definitions for rule composition
//!
//! This module defines the fundamental types used throughout the compiler:
//! - `ModifierFlag`: Keyboard modifier flags (left/right/side-neutral, plus wildcard)
//! - `KeyIdentifier`: Symbolic key names or layout-dependent numeric key codes
//! - `TriggerSpec`: A key plus its mandatory/optional modifier requirement
//! - `ActionTarget`: The effect a trigger produces (remap, launch, shell command)
//! - `ConditionExpr`: Device/application predicates scoping whole rules
//! - `Manipulator`, `Rule`, `Profile`: The assembled output hierarchy
//!
//! All types implement serialization and are designed for deterministic
//! output (normalization, consistent ordering, value semantics).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyboard modifier flags
///
/// Karabiner distinguishes left and right variants of each modifier; the
/// side-neutral forms match either side. `Any` is the wildcard used in
/// optional-modifier lists and is never a valid member of a mandatory set.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierFlag {
    LeftShift,
    LeftCommand,
    LeftOption,
    LeftControl,
    RightShift,
    RightCommand,
    RightOption,
    RightControl,
    Shift,
    Command,
    Option,
    Control,
    /// Wildcard: matches any modifier (optional lists only)
    Any,
}

impl ModifierFlag {
    /// Daemon-side name of this flag (e.g. `right_shift`)
    pub fn name(self) -> &'static str {
        match self {
            ModifierFlag::LeftShift => "left_shift",
            ModifierFlag::LeftCommand => "left_command",
            ModifierFlag::LeftOption => "left_option",
            ModifierFlag::LeftControl => "left_control",
            ModifierFlag::RightShift => "right_shift",
            ModifierFlag::RightCommand => "right_command",
            ModifierFlag::RightOption => "right_option",
            ModifierFlag::RightControl => "right_control",
            ModifierFlag::Shift => "shift",
            ModifierFlag::Command => "command",
            ModifierFlag::Option => "option",
            ModifierFlag::Control => "control",
            ModifierFlag::Any => "any",
        }
    }

    /// True for the `Any` wildcard
    pub fn is_wildcard(self) -> bool {
        self == ModifierFlag::Any
    }

    /// True for concrete left/right variants that double as key codes
    /// (a chord head must be one of these)
    pub fn is_sided(self) -> bool {
        !matches!(
            self,
            ModifierFlag::Shift
                | ModifierFlag::Command
                | ModifierFlag::Option
                | ModifierFlag::Control
                | ModifierFlag::Any
        )
    }
}

impl fmt::Display for ModifierFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A key, identified symbolically or by raw key code
///
/// Symbolic names follow the daemon's vocabulary (`caps_lock`,
/// `left_arrow`, ...). Numeric codes are layout-dependent and pass through
/// to the emitted document as numbers; they are never reinterpreted as
/// digit-key names.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum KeyIdentifier {
    /// Symbolic key name, e.g. `"h"` or `"caps_lock"`
    Name(String),
    /// Layout-dependent numeric key code
    Code(u32),
}

/// Resolves punctuation shorthand to the daemon's symbolic names,
/// so rule tables can say `"-"` instead of `"hyphen"`.
fn resolve_key_alias(name: &str) -> &str {
    match name {
        "`" => "grave_accent_and_tilde",
        "-" => "hyphen",
        "=" => "equal_sign",
        "[" => "open_bracket",
        "]" => "close_bracket",
        ";" => "semicolon",
        "'" => "quote",
        "," => "comma",
        "." => "period",
        "/" => "slash",
        "\\" => "backslash",
        other => other,
    }
}

impl From<&str> for KeyIdentifier {
    fn from(name: &str) -> Self {
        KeyIdentifier::Name(resolve_key_alias(name).to_string())
    }
}

impl From<String> for KeyIdentifier {
    fn from(name: String) -> Self {
        KeyIdentifier::from(name.as_str())
    }
}

impl From<u32> for KeyIdentifier {
    fn from(code: u32) -> Self {
        KeyIdentifier::Code(code)
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyIdentifier::Name(name) => write!(f, "{}", name),
            KeyIdentifier::Code(code) => write!(f, "keycode({})", code),
        }
    }
}

/// Optional-modifier matching mode of a trigger
///
/// `Strict` means only the mandatory set may be held. `Any` means the
/// trigger matches regardless of additional modifiers, and those extras
/// are not considered consumed by conflict analysis.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OptionalMatch {
    /// Only the mandatory modifiers may be held
    #[default]
    Strict,
    /// Any additional modifiers pass through
    Any,
}

/// A key plus its modifier requirement
///
/// Construction normalizes the mandatory set (sorted, deduplicated) so
/// that declaration order never affects chord identity. Chord identity
/// (`chord_eq`) is key + mandatory set only; the optional mode does not
/// participate, but conflict analysis keeps `Strict` and `Any` triggers
/// apart as distinct entries.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TriggerSpec {
    /// The physical key
    pub key: KeyIdentifier,
    /// Modifiers that must be held (normalized)
    pub mandatory: Vec<ModifierFlag>,
    /// How additional modifiers are treated
    pub optional: OptionalMatch,
}

impl TriggerSpec {
    /// Creates a strict trigger with a normalized mandatory set.
    pub fn new(key: impl Into<KeyIdentifier>, mut mandatory: Vec<ModifierFlag>) -> Self {
        mandatory.sort_unstable();
        mandatory.dedup();

        Self {
            key: key.into(),
            mandatory,
            optional: OptionalMatch::Strict,
        }
    }

    /// Creates a trigger with no modifier requirement.
    pub fn bare(key: impl Into<KeyIdentifier>) -> Self {
        Self::new(key, Vec::new())
    }

    /// Switches the trigger to wildcard optional matching.
    pub fn with_optional_any(mut self) -> Self {
        self.optional = OptionalMatch::Any;
        self
    }

    /// Chord identity: same key and same mandatory set.
    pub fn chord_eq(&self, other: &Self) -> bool {
        self.key == other.key && self.mandatory == other.mandatory
    }

    /// True if both triggers share a key and `self`'s mandatory set is a
    /// strict superset of `other`'s. Such a pair is order-sensitive: the
    /// superset chord must be evaluated first or it is unreachable.
    pub fn is_superset_chord_of(&self, other: &Self) -> bool {
        self.key == other.key
            && self.mandatory.len() > other.mandatory.len()
            && other.mandatory.iter().all(|m| self.mandatory.contains(m))
    }
}

impl fmt::Display for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.mandatory {
            write!(f, "{}+", m)?;
        }
        write!(f, "{}", self.key)?;
        if self.optional == OptionalMatch::Any {
            write!(f, " (optional any)")?;
        }
        Ok(())
    }
}

/// The effect a manipulator produces
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionTarget {
    /// Substitute another key, optionally with modifiers held
    RemapKey {
        key: KeyIdentifier,
        modifiers: Vec<ModifierFlag>,
    },
    /// Open an application; the identifier is opaque and resolved by the OS
    LaunchApp { identifier: String },
    /// Hand a command string verbatim to the daemon's shell effector
    RunCommand { command: String },
    /// No effect
    None,
}

impl ActionTarget {
    /// Plain key substitution.
    pub fn key(key: impl Into<KeyIdentifier>) -> Self {
        ActionTarget::RemapKey {
            key: key.into(),
            modifiers: Vec::new(),
        }
    }

    /// Key substitution with modifiers held.
    pub fn key_with(key: impl Into<KeyIdentifier>, modifiers: Vec<ModifierFlag>) -> Self {
        ActionTarget::RemapKey {
            key: key.into(),
            modifiers,
        }
    }

    /// Application launch.
    pub fn launch(identifier: impl Into<String>) -> Self {
        ActionTarget::LaunchApp {
            identifier: identifier.into(),
        }
    }

    /// Shell command execution.
    pub fn shell(command: impl Into<String>) -> Self {
        ActionTarget::RunCommand {
            command: command.into(),
        }
    }
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionTarget::RemapKey { key, modifiers } => {
                for m in modifiers {
                    write!(f, "{}+", m)?;
                }
                write!(f, "{}", key)
            }
            ActionTarget::LaunchApp { identifier } => write!(f, "open {}", identifier),
            ActionTarget::RunCommand { command } => write!(f, "$ {}", command),
            ActionTarget::None => write!(f, "(none)"),
        }
    }
}

/// Device/application predicate scoping a rule
///
/// Conditions are pure values, freely shared across rules, and combined by
/// AND within a rule's condition list. Matching happens entirely inside the
/// daemon; identifiers and patterns are opaque here.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ConditionExpr {
    /// The connected keyboard has this vendor/product identity
    DeviceIs { vendor_id: u32, product_id: u32 },
    /// The frontmost application's bundle identifier matches this pattern
    AppMatches { pattern: String },
    /// Negation of the inner predicate
    Not(Box<ConditionExpr>),
}

impl ConditionExpr {
    /// Device identity predicate.
    pub fn device(vendor_id: u32, product_id: u32) -> Self {
        ConditionExpr::DeviceIs {
            vendor_id,
            product_id,
        }
    }

    /// Frontmost application predicate.
    pub fn app(pattern: impl Into<String>) -> Self {
        ConditionExpr::AppMatches {
            pattern: pattern.into(),
        }
    }

    /// Inverts the predicate. Double negation collapses, so
    /// `c.unless().unless() == c`.
    pub fn unless(self) -> Self {
        match self {
            ConditionExpr::Not(inner) => *inner,
            other => ConditionExpr::Not(Box::new(other)),
        }
    }

    /// Derives the standard `(isX, unlessX)` pair from one predicate,
    /// the idiom for partitioning a rule family into mutually exclusive
    /// variants without duplicating the predicate literal.
    pub fn partition(self) -> (Self, Self) {
        let negated = self.clone().unless();
        (self, negated)
    }
}

impl fmt::Display for ConditionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionExpr::DeviceIs {
                vendor_id,
                product_id,
            } => write!(f, "device {}:{}", vendor_id, product_id),
            ConditionExpr::AppMatches { pattern } => write!(f, "app {}", pattern),
            ConditionExpr::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}

/// One trigger→action mapping entry, the atomic unit of the emitted document
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Manipulator {
    /// What the user presses
    pub trigger: TriggerSpec,
    /// What happens while the trigger is held
    pub action: ActionTarget,
    /// Fired instead when the key is tapped alone (tap/hold disambiguation)
    pub alone_action: Option<ActionTarget>,
    /// Defer the alone branch until key-up so a chord in progress
    /// suppresses it entirely
    pub lazy: bool,
}

impl Manipulator {
    /// Creates a plain manipulator with no alone-action.
    pub fn new(trigger: TriggerSpec, action: ActionTarget) -> Self {
        Self {
            trigger,
            action,
            alone_action: None,
            lazy: false,
        }
    }
}

impl fmt::Display for Manipulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.trigger, self.action)
    }
}

/// A named, condition-scoped group of manipulators
///
/// Conditions apply uniformly to every manipulator in the rule; a finer
/// exception requires a new rule. Names exist for human debugging only.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Rule {
    /// Human-readable description, never referenced programmatically
    pub name: String,
    /// ANDed condition list scoping every manipulator
    pub conditions: Vec<ConditionExpr>,
    /// Manipulators in match-priority order
    pub manipulators: Vec<Manipulator>,
}

/// The full ordered rule list constituting one user configuration
///
/// Rule order is match-priority order: the daemon evaluates top-to-bottom
/// and stops at the first structural match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Profile {
    /// Target profile name inside the daemon's configuration
    pub name: String,
    /// Rules in evaluation order
    pub rules: Vec<Rule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_flag_display() {
        assert_eq!(format!("{}", ModifierFlag::RightShift), "right_shift");
        assert_eq!(format!("{}", ModifierFlag::Any), "any");
    }

    #[test]
    fn test_sided_and_wildcard_classification() {
        assert!(ModifierFlag::LeftControl.is_sided());
        assert!(!ModifierFlag::Command.is_sided());
        assert!(!ModifierFlag::Any.is_sided());
        assert!(ModifierFlag::Any.is_wildcard());
    }

    #[test]
    fn test_key_alias_resolution() {
        assert_eq!(
            KeyIdentifier::from("`"),
            KeyIdentifier::Name("grave_accent_and_tilde".to_string())
        );
        assert_eq!(
            KeyIdentifier::from("-"),
            KeyIdentifier::Name("hyphen".to_string())
        );
        assert_eq!(
            KeyIdentifier::from("left_arrow"),
            KeyIdentifier::Name("left_arrow".to_string())
        );
    }

    #[test]
    fn test_numeric_keycode_is_not_reinterpreted() {
        // Code(9) serializes as the number 9, not the digit-key name "9"
        let code = KeyIdentifier::from(9u32);
        assert_eq!(serde_json::to_string(&code).unwrap(), "9");

        let name = KeyIdentifier::from("9");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"9\"");
        assert_ne!(code, name);
    }

    #[test]
    fn test_trigger_normalization() {
        // Declaration order and duplicates never affect chord identity
        let a = TriggerSpec::new(
            "k",
            vec![
                ModifierFlag::RightCommand,
                ModifierFlag::RightShift,
                ModifierFlag::RightShift,
            ],
        );
        let b = TriggerSpec::new(
            "k",
            vec![ModifierFlag::RightShift, ModifierFlag::RightCommand],
        );

        assert_eq!(a, b);
        assert!(a.chord_eq(&b));
    }

    #[test]
    fn test_optional_any_is_distinct_from_strict() {
        let strict = TriggerSpec::bare("caps_lock");
        let wildcard = TriggerSpec::bare("caps_lock").with_optional_any();

        // Same chord, but not the same trigger
        assert!(strict.chord_eq(&wildcard));
        assert_ne!(strict, wildcard);
    }

    #[test]
    fn test_superset_chord_detection() {
        let hyper = vec![
            ModifierFlag::RightShift,
            ModifierFlag::RightCommand,
            ModifierFlag::RightOption,
            ModifierFlag::RightControl,
        ];
        let mut wider = hyper.clone();
        wider.push(ModifierFlag::LeftCommand);

        let subset = TriggerSpec::new("h", hyper);
        let superset = TriggerSpec::new("h", wider);

        assert!(superset.is_superset_chord_of(&subset));
        assert!(!subset.is_superset_chord_of(&superset));
        assert!(!superset.is_superset_chord_of(&TriggerSpec::new("j", vec![])));
    }

    #[test]
    fn test_condition_double_negation_collapses() {
        let is_device = ConditionExpr::device(12951, 6519);
        assert_eq!(is_device.clone().unless().unless(), is_device);
    }

    #[test]
    fn test_condition_partition() {
        let (is_device, unless_device) = ConditionExpr::device(12951, 6519).partition();
        assert_eq!(is_device.clone().unless(), unless_device);
        assert_ne!(is_device, unless_device);
    }

    #[test]
    fn test_trigger_display() {
        let trigger = TriggerSpec::new(
            "h",
            vec![ModifierFlag::RightCommand, ModifierFlag::RightShift],
        );
        let display = format!("{}", trigger);

        assert!(display.contains("right_shift"));
        assert!(display.contains("right_command"));
        assert!(display.ends_with('h'));
    }

    #[test]
    fn test_action_display() {
        let action = ActionTarget::key_with("left_arrow", vec![ModifierFlag::LeftShift]);
        assert_eq!(format!("{}", action), "left_shift+left_arrow");

        let shell = ActionTarget::shell("/opt/homebrew/bin/aerospace fullscreen");
        assert!(format!("{}", shell).starts_with("$ "));
    }
}
