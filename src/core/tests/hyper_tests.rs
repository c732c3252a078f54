use crate::core::hyper::HyperKeyEmulator;
use crate::core::types::{
    ActionTarget, KeyIdentifier, ModifierFlag, OptionalMatch, TriggerSpec,
};
use crate::core::validator::ValidationError;

fn hyper_chord() -> Vec<ModifierFlag> {
    vec![
        ModifierFlag::RightShift,
        ModifierFlag::RightCommand,
        ModifierFlag::RightOption,
        ModifierFlag::RightControl,
    ]
}

#[test]
fn test_primary_manipulator_shape() {
    let manipulators = HyperKeyEmulator::new("caps_lock", hyper_chord(), ActionTarget::key("escape"))
        .lazy(true)
        .manipulators()
        .unwrap();

    let primary = &manipulators[0];

    // The source key matches with wildcard optionality so unrelated
    // modifier combinations still reach chord emission
    assert_eq!(primary.trigger.key, KeyIdentifier::from("caps_lock"));
    assert!(primary.trigger.mandatory.is_empty());
    assert_eq!(primary.trigger.optional, OptionalMatch::Any);

    // Held: the chord head as key code, the remaining flags as modifiers
    assert_eq!(
        primary.action,
        ActionTarget::key_with(
            "right_shift",
            vec![
                ModifierFlag::RightCommand,
                ModifierFlag::RightOption,
                ModifierFlag::RightControl,
            ],
        )
    );

    // Tapped alone: the fallback, deferred until key-up
    assert_eq!(primary.alone_action, Some(ActionTarget::key("escape")));
    assert!(primary.lazy);
}

#[test]
fn test_inverse_manipulator_restores_source_key() {
    let manipulators = HyperKeyEmulator::new("caps_lock", hyper_chord(), ActionTarget::key("escape"))
        .manipulators()
        .unwrap();

    assert_eq!(manipulators.len(), 2);

    // escape held with the full chord produces caps_lock again
    let inverse = &manipulators[1];
    assert_eq!(inverse.trigger, TriggerSpec::new("escape", hyper_chord()));
    assert_eq!(
        inverse.action,
        ActionTarget::key_with("caps_lock", vec![ModifierFlag::LeftControl])
    );
    assert_eq!(inverse.alone_action, None);
    assert!(!inverse.lazy);
}

#[test]
fn test_restore_modifier_override() {
    let manipulators = HyperKeyEmulator::new("caps_lock", hyper_chord(), ActionTarget::key("escape"))
        .restore_with(ModifierFlag::LeftOption)
        .manipulators()
        .unwrap();

    assert_eq!(
        manipulators[1].action,
        ActionTarget::key_with("caps_lock", vec![ModifierFlag::LeftOption])
    );
}

#[test]
fn test_non_key_fallback_has_no_inverse() {
    // A shell-command fallback has no key to restore through
    let manipulators = HyperKeyEmulator::new(
        "caps_lock",
        hyper_chord(),
        ActionTarget::shell("open -a Finder.app"),
    )
    .manipulators()
    .unwrap();

    assert_eq!(manipulators.len(), 1);
}

#[test]
fn test_empty_chord_rejected() {
    let result =
        HyperKeyEmulator::new("caps_lock", Vec::new(), ActionTarget::key("escape")).manipulators();

    assert_eq!(result.unwrap_err(), ValidationError::EmptyChord);
}

#[test]
fn test_unsided_chord_head_rejected() {
    // A side-neutral flag has no key code of its own and cannot lead a chord
    let result = HyperKeyEmulator::new(
        "caps_lock",
        vec![ModifierFlag::Shift, ModifierFlag::RightCommand],
        ActionTarget::key("escape"),
    )
    .manipulators();

    assert_eq!(
        result.unwrap_err(),
        ValidationError::UnsidedChordHead(ModifierFlag::Shift)
    );
}

#[test]
fn test_chord_declaration_order_is_preserved_in_action() {
    // The head is positional: reordering the chord changes the held key code
    let manipulators = HyperKeyEmulator::new(
        "caps_lock",
        vec![ModifierFlag::RightControl, ModifierFlag::RightShift],
        ActionTarget::key("escape"),
    )
    .manipulators()
    .unwrap();

    assert_eq!(
        manipulators[0].action,
        ActionTarget::key_with("right_control", vec![ModifierFlag::RightShift])
    );
}
