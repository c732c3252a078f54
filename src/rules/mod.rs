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

//! src/rules/mod.rs
//!
//! The shipped rule definitions
//!
//! One generic construction routine per rule family, consuming the
//! parameter tables in `params`. Variants that differ only by device
//! scope, app roster, or window-manager backend share a single routine
//! instead of duplicating construction logic.
//!
//! Rule order is evaluation order. Where two chords share a key, the
//! superset chord's rule is declared first (selection before navigation,
//! launchers before symbols, the wider window-manager layer before the
//! narrower one); otherwise the subset chord would win every press and
//! the superset chord would be unreachable.

pub mod params;

pub use params::{ProfileParams, WmBackend, HYPER, SYS_HYPER};

use crate::core::assembler::{CompileError, RuleSetAssembler};
use crate::core::conflict::coverage_gaps;
use crate::core::hyper::HyperKeyEmulator;
use crate::core::layer::LayerComposer;
use crate::core::types::{
    ActionTarget, ConditionExpr, KeyIdentifier, Manipulator, ModifierFlag, Profile, Rule,
};
use params::Direction;

/// The hyper chord plus left command: the prefix of the secondary
/// (selection/launcher) layers.
fn hyper_with_command() -> Vec<ModifierFlag> {
    let mut chord = vec![ModifierFlag::LeftCommand];
    chord.extend(HYPER);
    chord
}

/// Compiles the full profile from one parameter set.
///
/// Identical parameters always produce an identical profile; the daemon
/// resolves ties purely by declared order, so determinism here is part
/// of the contract.
pub fn build_profile(params: &ProfileParams) -> Result<Profile, CompileError> {
    let (is_ortho, unless_ortho) =
        ConditionExpr::device(params.ortho_board.0, params.ortho_board.1).partition();
    let is_docs = ConditionExpr::app(params.docs_app_pattern.clone());

    let mut assembler = RuleSetAssembler::new(&params.profile_name);

    assembler.rule("Hyper CapsLock", caps_lock_emulation()?);

    // Selection is the command-shifted superset of navigation and must
    // be evaluated first
    assembler.rule_when(
        "Hyper Selection",
        vec![unless_ortho.clone()],
        selection_layer(),
    );
    assembler.rule_when(
        "Hyper Navigation",
        vec![unless_ortho.clone()],
        navigation_layer(),
    );
    assembler.rule_when(
        "Hyper Deletion",
        vec![unless_ortho.clone()],
        deletion_layer(),
    );

    // Launchers ride the command-shifted prefix on the same letters the
    // symbol layer uses, so they come first
    assembler.rule_when(
        "Hyper Apps",
        vec![unless_ortho.clone()],
        launcher_layer(hyper_with_command(), &params.launchers, &[]),
    );
    assembler.rule_when(
        "Hyper Apps: Ortho",
        vec![is_ortho.clone()],
        launcher_layer(HYPER.to_vec(), &params.launchers, &params.ortho_launcher_omits),
    );
    assembler.rule_when(
        "Hyper Symbols",
        vec![unless_ortho.clone()],
        symbols_layer(),
    );

    assembler.rule_when(
        "Window Manager",
        vec![unless_ortho.clone()],
        wm_generic(&params.wm),
    );
    assembler.rule_when(
        "Window Manager: Ortho",
        vec![is_ortho],
        wm_ortho_layers(&params.wm),
    );

    assembler.rule_when("Docs Paging", vec![is_docs], docs_paging());
    assembler.rule_when("Hyper Fn", vec![unless_ortho.clone()], function_row());
    assembler.rule("Diagnostic Guard", diagnostic_guard());

    assembler.assemble()
}

/// Keys mapped in exactly one launcher variant, minus the acknowledged
/// omissions. A non-empty result means a roster key lacks an explicit
/// decision on the other device class.
pub fn launcher_coverage(params: &ProfileParams) -> Vec<KeyIdentifier> {
    let generic = Rule {
        name: "Hyper Apps".to_string(),
        conditions: Vec::new(),
        manipulators: launcher_layer(hyper_with_command(), &params.launchers, &[]),
    };
    let ortho = Rule {
        name: "Hyper Apps: Ortho".to_string(),
        conditions: Vec::new(),
        manipulators: launcher_layer(
            HYPER.to_vec(),
            &params.launchers,
            &params.ortho_launcher_omits,
        ),
    };

    let acknowledged: Vec<KeyIdentifier> = params
        .ortho_launcher_omits
        .iter()
        .map(|k| KeyIdentifier::from(*k))
        .collect();

    coverage_gaps(&generic, &ortho, &acknowledged)
}

/// caps_lock emulates the hyper chord; tapped alone it is escape (lazy,
/// so a chord in progress never leaks an escape), and escape + chord
/// restores the literal caps_lock.
fn caps_lock_emulation() -> Result<Vec<Manipulator>, CompileError> {
    HyperKeyEmulator::new("caps_lock", HYPER.to_vec(), ActionTarget::key("escape"))
        .lazy(true)
        .manipulators()
        .map_err(|source| CompileError::InvalidTriggerSpec {
            rule: "Hyper CapsLock".to_string(),
            index: 0,
            manipulator: "caps_lock".to_string(),
            source,
        })
}

fn navigation_layer() -> Vec<Manipulator> {
    LayerComposer::new(HYPER.to_vec())
        .remap("h", ActionTarget::key("left_arrow"))
        .remap("j", ActionTarget::key("down_arrow"))
        .remap("k", ActionTarget::key("up_arrow"))
        .remap("l", ActionTarget::key("right_arrow"))
        .remap(
            "u",
            ActionTarget::key_with("left_arrow", vec![ModifierFlag::LeftCommand]),
        )
        .remap(
            "i",
            ActionTarget::key_with("left_arrow", vec![ModifierFlag::LeftOption]),
        )
        .remap(
            "o",
            ActionTarget::key_with("right_arrow", vec![ModifierFlag::LeftOption]),
        )
        .remap(
            "p",
            ActionTarget::key_with("right_arrow", vec![ModifierFlag::LeftCommand]),
        )
        .into_manipulators()
}

/// The navigation layer with left shift held: same letters, one extra
/// chord flag, selection instead of movement.
fn selection_layer() -> Vec<Manipulator> {
    LayerComposer::new(hyper_with_command())
        .remap(
            "h",
            ActionTarget::key_with("left_arrow", vec![ModifierFlag::LeftShift]),
        )
        .remap(
            "j",
            ActionTarget::key_with("down_arrow", vec![ModifierFlag::LeftShift]),
        )
        .remap(
            "k",
            ActionTarget::key_with("up_arrow", vec![ModifierFlag::LeftShift]),
        )
        .remap(
            "l",
            ActionTarget::key_with("right_arrow", vec![ModifierFlag::LeftShift]),
        )
        .remap(
            "u",
            ActionTarget::key_with(
                "left_arrow",
                vec![ModifierFlag::LeftCommand, ModifierFlag::LeftShift],
            ),
        )
        .remap(
            "i",
            ActionTarget::key_with(
                "left_arrow",
                vec![ModifierFlag::LeftOption, ModifierFlag::LeftShift],
            ),
        )
        .remap(
            "o",
            ActionTarget::key_with(
                "right_arrow",
                vec![ModifierFlag::LeftOption, ModifierFlag::LeftShift],
            ),
        )
        .remap(
            "p",
            ActionTarget::key_with(
                "right_arrow",
                vec![ModifierFlag::LeftCommand, ModifierFlag::LeftShift],
            ),
        )
        .into_manipulators()
}

/// Word/line/character deletion; the command-shifted chord is the
/// superset and leads.
fn deletion_layer() -> Vec<Manipulator> {
    let mut manipulators = LayerComposer::new(hyper_with_command())
        .remap(
            "n",
            ActionTarget::key_with("delete_or_backspace", vec![ModifierFlag::LeftCommand]),
        )
        .into_manipulators();

    manipulators.extend(
        LayerComposer::new(HYPER.to_vec())
            .remap(
                "n",
                ActionTarget::key_with("delete_or_backspace", vec![ModifierFlag::LeftOption]),
            )
            .remap("m", ActionTarget::key("delete_or_backspace"))
            .into_manipulators(),
    );

    manipulators
}

fn symbols_layer() -> Vec<Manipulator> {
    LayerComposer::new(HYPER.to_vec())
        .remap("q", ActionTarget::key("`"))
        .remap("w", ActionTarget::key_with("-", vec![ModifierFlag::LeftShift])) // _
        .remap("e", ActionTarget::key("-"))
        .remap("r", ActionTarget::key("="))
        .remap("t", ActionTarget::key_with("=", vec![ModifierFlag::LeftShift])) // +
        .remap("a", ActionTarget::key_with("[", vec![ModifierFlag::LeftShift])) // {
        .remap("s", ActionTarget::key_with("]", vec![ModifierFlag::LeftShift])) // }
        .remap("d", ActionTarget::key_with(9u32, vec![ModifierFlag::LeftShift])) // (
        .remap("f", ActionTarget::key_with(0u32, vec![ModifierFlag::LeftShift])) // )
        .remap("c", ActionTarget::key("["))
        .remap("v", ActionTarget::key("]"))
        .into_manipulators()
}

/// One launcher roster expanded under a caller-chosen prefix, with
/// per-variant omissions.
fn launcher_layer(
    mandatory: Vec<ModifierFlag>,
    roster: &[(&str, &str)],
    omit: &[&str],
) -> Vec<Manipulator> {
    let mut layer = LayerComposer::new(mandatory);
    for (key, app) in roster {
        if omit.contains(key) {
            continue;
        }
        layer = layer.remap(*key, ActionTarget::launch(*app));
    }
    layer.into_manipulators()
}

/// Generic keyboards get a single fullscreen binding; their navigation
/// needs are covered by the hyper layers.
fn wm_generic(wm: &WmBackend) -> Vec<Manipulator> {
    LayerComposer::new(vec![ModifierFlag::Command, ModifierFlag::Control])
        .remap("return_or_enter", ActionTarget::shell(wm.fullscreen()))
        .into_manipulators()
}

/// The ortho board drives the window manager directly from two thumb
/// chords. The three-modifier layer shares the arrow keys with the
/// two-modifier layer and must lead.
fn wm_ortho_layers(wm: &WmBackend) -> Vec<Manipulator> {
    let focus = vec![ModifierFlag::RightControl, ModifierFlag::RightOption];
    let mut arrange = focus.clone();
    arrange.push(ModifierFlag::RightShift);

    let mut manipulators = LayerComposer::new(arrange)
        .remap(
            "left_arrow",
            ActionTarget::shell(wm.move_to_workspace("prev")),
        )
        .remap(
            "right_arrow",
            ActionTarget::shell(wm.move_to_workspace("next")),
        )
        .remap("n", ActionTarget::shell(wm.resize(-50)))
        .remap("m", ActionTarget::shell(wm.resize(50)))
        .remap("r", ActionTarget::shell(wm.reset_layout()))
        .remap("f", ActionTarget::shell(wm.float()))
        .into_manipulators();

    let mut focus_layer = LayerComposer::new(focus)
        .remap("left_arrow", ActionTarget::shell(wm.focus_workspace("prev")))
        .remap(
            "right_arrow",
            ActionTarget::shell(wm.focus_workspace("next")),
        );
    for n in 1..=9u32 {
        let digit = n.to_string();
        focus_layer = focus_layer.remap(
            digit.as_str(),
            ActionTarget::shell(wm.focus_workspace(&digit)),
        );
    }
    let focus_layer = focus_layer
        .remap("h", ActionTarget::shell(wm.move_window(Direction::Left)))
        .remap("l", ActionTarget::shell(wm.move_window(Direction::Right)))
        .remap("j", ActionTarget::shell(wm.move_window(Direction::Down)))
        .remap("k", ActionTarget::shell(wm.move_window(Direction::Up)))
        .remap("return_or_enter", ActionTarget::shell(wm.maximize()));

    manipulators.extend(focus_layer.into_manipulators());
    manipulators
}

/// Page/line scrolling inside the docs browser; the command-shifted
/// chord is the superset and leads.
fn docs_paging() -> Vec<Manipulator> {
    let mut manipulators =
        LayerComposer::new(vec![ModifierFlag::LeftCommand, ModifierFlag::LeftShift])
            .remap(
                "j",
                ActionTarget::key_with("down_arrow", vec![ModifierFlag::LeftOption]),
            )
            .remap(
                "k",
                ActionTarget::key_with("up_arrow", vec![ModifierFlag::LeftOption]),
            )
            .into_manipulators();

    manipulators.extend(
        LayerComposer::new(vec![ModifierFlag::LeftShift])
            .remap("j", ActionTarget::key("page_down"))
            .remap("k", ActionTarget::key("page_up"))
            .into_manipulators(),
    );

    manipulators
}

fn function_row() -> Vec<Manipulator> {
    LayerComposer::new(HYPER.to_vec())
        .remap("1", ActionTarget::key("display_brightness_decrement"))
        .remap("2", ActionTarget::key("display_brightness_increment"))
        .remap("7", ActionTarget::key("rewind"))
        .remap("8", ActionTarget::key("play_or_pause"))
        .remap("9", ActionTarget::key("fastforward"))
        .remap("0", ActionTarget::key("mute"))
        .remap("-", ActionTarget::key("volume_decrement"))
        .remap("=", ActionTarget::key("volume_increment"))
        .remap(
            "spacebar",
            ActionTarget::key_with("z", vec![ModifierFlag::LeftOption]), // input language
        )
        .into_manipulators()
}

/// Reroutes macOS diagnostic chords onto dead function keys.
fn diagnostic_guard() -> Vec<Manipulator> {
    LayerComposer::new(SYS_HYPER.to_vec())
        .remap("period", ActionTarget::key("f17"))
        .remap("comma", ActionTarget::key("f18"))
        .remap("w", ActionTarget::key("f19"))
        .into_manipulators()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conflict::find_shadowed;
    use crate::core::types::{OptionalMatch, TriggerSpec};

    #[test]
    fn test_default_profile_compiles() {
        let profile = build_profile(&ProfileParams::default()).unwrap();
        assert_eq!(profile.name, "Default");
        assert_eq!(profile.rules.len(), 12);
    }

    #[test]
    fn test_no_shadowed_chords_in_default_profile() {
        let profile = build_profile(&ProfileParams::default()).unwrap();
        let shadowed = find_shadowed(&profile);
        assert!(
            shadowed.is_empty(),
            "Default profile must order superset chords first: {:?}",
            shadowed
        );
    }

    #[test]
    fn test_selection_declared_before_navigation() {
        let profile = build_profile(&ProfileParams::default()).unwrap();
        let position = |name: &str| {
            profile
                .rules
                .iter()
                .position(|r| r.name == name)
                .unwrap_or_else(|| panic!("missing rule {}", name))
        };

        assert!(position("Hyper Selection") < position("Hyper Navigation"));
        assert!(position("Hyper Apps") < position("Hyper Symbols"));
    }

    #[test]
    fn test_caps_lock_emulation_shape() {
        let manipulators = caps_lock_emulation().unwrap();
        assert_eq!(manipulators.len(), 2);

        let primary = &manipulators[0];
        assert_eq!(primary.trigger, TriggerSpec::bare("caps_lock").with_optional_any());
        assert_eq!(primary.trigger.optional, OptionalMatch::Any);
        assert_eq!(primary.alone_action, Some(ActionTarget::key("escape")));
        assert!(primary.lazy);

        // escape + hyper restores the literal caps_lock
        let inverse = &manipulators[1];
        assert_eq!(inverse.trigger, TriggerSpec::new("escape", HYPER.to_vec()));
        assert_eq!(
            inverse.action,
            ActionTarget::key_with("caps_lock", vec![ModifierFlag::LeftControl])
        );
    }

    #[test]
    fn test_navigation_h_maps_to_left_arrow() {
        // One manipulator, exactly the hyper mandatory set, exactly left_arrow
        let manipulators = navigation_layer();
        let h: Vec<_> = manipulators
            .iter()
            .filter(|m| m.trigger.key == KeyIdentifier::from("h"))
            .collect();

        assert_eq!(h.len(), 1);
        assert_eq!(h[0].trigger, TriggerSpec::new("h", HYPER.to_vec()));
        assert_eq!(h[0].action, ActionTarget::key("left_arrow"));
    }

    #[test]
    fn test_launcher_variants_share_one_roster() {
        let params = ProfileParams::default();
        let generic = launcher_layer(hyper_with_command(), &params.launchers, &[]);
        let ortho = launcher_layer(HYPER.to_vec(), &params.launchers, &params.ortho_launcher_omits);

        assert_eq!(generic.len(), params.launchers.len());
        assert_eq!(ortho.len(), params.launchers.len() - 1);

        // Omission is acknowledged, so coverage reports no gap
        assert!(launcher_coverage(&params).is_empty());
    }

    #[test]
    fn test_unacknowledged_omission_is_a_coverage_gap() {
        let params = ProfileParams::default();

        // Same rosters, but without the acknowledgement the gap surfaces
        let generic = Rule {
            name: "a".to_string(),
            conditions: Vec::new(),
            manipulators: launcher_layer(hyper_with_command(), &params.launchers, &[]),
        };
        let ortho = Rule {
            name: "b".to_string(),
            conditions: Vec::new(),
            manipulators: launcher_layer(HYPER.to_vec(), &params.launchers, &["d"]),
        };

        let gaps = coverage_gaps(&generic, &ortho, &[]);
        assert_eq!(gaps, vec![KeyIdentifier::from("d")]);
    }

    #[test]
    fn test_wm_backend_flows_into_commands() {
        let mut params = ProfileParams::default();
        params.wm = WmBackend::yabai();

        let profile = build_profile(&params).unwrap();
        let wm_rule = profile
            .rules
            .iter()
            .find(|r| r.name == "Window Manager")
            .unwrap();

        match &wm_rule.manipulators[0].action {
            ActionTarget::RunCommand { command } => {
                assert!(command.contains("yabai"), "got: {}", command);
            }
            other => panic!("expected RunCommand, got {:?}", other),
        }
    }

    #[test]
    fn test_ortho_rules_partition_on_device() {
        let profile = build_profile(&ProfileParams::default()).unwrap();
        let is_device = ConditionExpr::device(12951, 6519);

        let ortho_apps = profile
            .rules
            .iter()
            .find(|r| r.name == "Hyper Apps: Ortho")
            .unwrap();
        let generic_apps = profile.rules.iter().find(|r| r.name == "Hyper Apps").unwrap();

        assert_eq!(ortho_apps.conditions, vec![is_device.clone()]);
        assert_eq!(generic_apps.conditions, vec![is_device.unless()]);
    }

    #[test]
    fn test_identical_params_render_identical_documents() {
        let render = || {
            let profile = build_profile(&ProfileParams::default()).unwrap();
            crate::config::render_rule_set(&profile).unwrap()
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn test_symbols_use_numeric_keycodes_for_parens() {
        let manipulators = symbols_layer();
        let d = manipulators
            .iter()
            .find(|m| m.trigger.key == KeyIdentifier::from("d"))
            .unwrap();

        assert_eq!(
            d.action,
            ActionTarget::key_with(9u32, vec![ModifierFlag::LeftShift])
        );
    }
}
