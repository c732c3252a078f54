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

//! Structural trigger and action validation
//!
//! Catches authoring errors at compile time, before any document is
//! produced:
//! - Empty key identifiers
//! - The `any` wildcard inside a mandatory set (it belongs to the
//!   optional side of a trigger)
//! - Empty launch identifiers and shell commands
//!
//! Deliberately NOT validated: whether referenced applications, devices,
//! or external tools actually exist. Those identifiers are opaque here
//! and only resolve inside the daemon at runtime.

use crate::core::types::{ActionTarget, KeyIdentifier, Manipulator, TriggerSpec};
use thiserror::Error;

/// Structural validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Key identifier is an empty string
    #[error("Empty key identifier")]
    EmptyKeyName,

    /// The `any` wildcard appeared in a mandatory modifier set
    #[error("Wildcard 'any' is not a valid mandatory modifier")]
    WildcardInMandatory,

    /// Launch action with an empty application identifier
    #[error("Empty application identifier")]
    EmptyAppIdentifier,

    /// Run-command action with an empty command string
    #[error("Empty shell command")]
    EmptyCommand,

    /// Hyper emulation requested with no chord flags
    #[error("Hyper chord is empty")]
    EmptyChord,

    /// The first chord flag must be a concrete left/right modifier so it
    /// can double as the held key code
    #[error("Hyper chord head '{0}' is not a concrete left/right modifier")]
    UnsidedChordHead(crate::core::types::ModifierFlag),
}

/// Validates a single trigger.
pub fn validate_trigger(trigger: &TriggerSpec) -> Result<(), ValidationError> {
    validate_key(&trigger.key)?;

    if trigger.mandatory.iter().any(|m| m.is_wildcard()) {
        return Err(ValidationError::WildcardInMandatory);
    }

    Ok(())
}

/// Validates a key identifier (symbolic names must be non-empty).
pub fn validate_key(key: &KeyIdentifier) -> Result<(), ValidationError> {
    match key {
        KeyIdentifier::Name(name) if name.is_empty() => Err(ValidationError::EmptyKeyName),
        _ => Ok(()),
    }
}

/// Validates a single action.
pub fn validate_action(action: &ActionTarget) -> Result<(), ValidationError> {
    match action {
        ActionTarget::RemapKey { key, modifiers } => {
            validate_key(key)?;
            if modifiers.iter().any(|m| m.is_wildcard()) {
                return Err(ValidationError::WildcardInMandatory);
            }
            Ok(())
        }
        ActionTarget::LaunchApp { identifier } if identifier.is_empty() => {
            Err(ValidationError::EmptyAppIdentifier)
        }
        ActionTarget::RunCommand { command } if command.is_empty() => {
            Err(ValidationError::EmptyCommand)
        }
        _ => Ok(()),
    }
}

/// Validates a complete manipulator: trigger, action, and the optional
/// alone-action.
pub fn validate_manipulator(manipulator: &Manipulator) -> Result<(), ValidationError> {
    validate_trigger(&manipulator.trigger)?;
    validate_action(&manipulator.action)?;

    if let Some(alone) = &manipulator.alone_action {
        validate_action(alone)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ModifierFlag;

    #[test]
    fn test_valid_trigger() {
        let trigger = TriggerSpec::new("h", vec![ModifierFlag::RightShift]);
        assert!(validate_trigger(&trigger).is_ok());
    }

    #[test]
    fn test_empty_key_rejected() {
        let trigger = TriggerSpec::bare("");
        assert_eq!(validate_trigger(&trigger), Err(ValidationError::EmptyKeyName));
    }

    #[test]
    fn test_numeric_keycode_accepted() {
        let trigger = TriggerSpec::bare(9u32);
        assert!(validate_trigger(&trigger).is_ok());
    }

    #[test]
    fn test_wildcard_in_mandatory_rejected() {
        let trigger = TriggerSpec::new("h", vec![ModifierFlag::Any]);
        assert_eq!(
            validate_trigger(&trigger),
            Err(ValidationError::WildcardInMandatory)
        );
    }

    #[test]
    fn test_empty_launch_identifier_rejected() {
        assert_eq!(
            validate_action(&ActionTarget::launch("")),
            Err(ValidationError::EmptyAppIdentifier)
        );
        assert!(validate_action(&ActionTarget::launch("Finder")).is_ok());
    }

    #[test]
    fn test_empty_command_rejected() {
        assert_eq!(
            validate_action(&ActionTarget::shell("")),
            Err(ValidationError::EmptyCommand)
        );
    }

    #[test]
    fn test_manipulator_alone_action_validated() {
        let mut manipulator = Manipulator::new(
            TriggerSpec::bare("caps_lock").with_optional_any(),
            ActionTarget::key("right_shift"),
        );
        manipulator.alone_action = Some(ActionTarget::key(""));

        assert_eq!(
            validate_manipulator(&manipulator),
            Err(ValidationError::EmptyKeyName)
        );
    }

    #[test]
    fn test_none_action_is_valid() {
        assert!(validate_action(&ActionTarget::None).is_ok());
    }
}
