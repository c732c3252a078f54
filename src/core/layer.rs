//! src/core/layer.rs
//!
//! Layer composition: shared-modifier expansion of rule tables
//!
//! A "layer" is an ordered table of `(key, action)` pairs sharing one
//! mandatory modifier prefix (e.g. the hyper chord). The composer expands
//! the table into one strict-optional manipulator per entry, preserving
//! table order, so rule definitions never repeat the chord prefix per key.
//!
//! Two layers may reuse the same key letters under different prefixes
//! (e.g. a selection layer as the command-shifted variant of a navigation
//! layer). The superset-prefix layer must be declared before the subset
//! layer in evaluation order, or its chords become unreachable; the
//! conflict module's shadow analysis reports violations.

use crate::core::types::{ActionTarget, KeyIdentifier, Manipulator, ModifierFlag, TriggerSpec};

/// Expands a shared mandatory modifier set across a table of
/// `(key, action)` pairs.
///
/// # Example
///
/// ```
/// use karabiner_chord_compiler::core::layer::LayerComposer;
/// use karabiner_chord_compiler::core::types::{ActionTarget, ModifierFlag};
///
/// let manipulators = LayerComposer::new(vec![
///     ModifierFlag::RightShift,
///     ModifierFlag::RightCommand,
///     ModifierFlag::RightOption,
///     ModifierFlag::RightControl,
/// ])
/// .remap("h", ActionTarget::key("left_arrow"))
/// .remap("l", ActionTarget::key("right_arrow"))
/// .into_manipulators();
///
/// assert_eq!(manipulators.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct LayerComposer {
    /// Mandatory prefix shared by every entry
    mandatory: Vec<ModifierFlag>,
    /// Expanded manipulators, in table order
    manipulators: Vec<Manipulator>,
}

impl LayerComposer {
    /// Creates a composer for the given mandatory modifier set.
    pub fn new(mandatory: Vec<ModifierFlag>) -> Self {
        Self {
            mandatory,
            manipulators: Vec::new(),
        }
    }

    /// Adds one `(key, action)` entry. The trigger is strict: extra
    /// modifiers beyond the layer prefix do not match.
    pub fn remap(mut self, key: impl Into<KeyIdentifier>, action: ActionTarget) -> Self {
        let trigger = TriggerSpec::new(key, self.mandatory.clone());
        self.manipulators.push(Manipulator::new(trigger, action));
        self
    }

    /// Adds a whole `(key, action)` table at once, preserving its order.
    pub fn remap_table<K>(mut self, table: impl IntoIterator<Item = (K, ActionTarget)>) -> Self
    where
        K: Into<KeyIdentifier>,
    {
        for (key, action) in table {
            self = self.remap(key, action);
        }
        self
    }

    /// Finishes composition, yielding the manipulators in table order.
    pub fn into_manipulators(self) -> Vec<Manipulator> {
        self.manipulators
    }
}
