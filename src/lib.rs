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

//! Karabiner Chord Compiler
//!
//! A declarative compiler for Karabiner-Elements complex modifications:
//! key-chord rules are written as Rust data, analysed for conflicts and
//! unreachable chords, and emitted as the daemon's JSON document.
//!
//! # Features
//!
//! - **Hyper-key emulation:** One key doubles as a modifier chord when
//!   held and a plain key when tapped, with an inverse mapping to keep
//!   the original key reachable
//! - **Layer composition:** Whole banks of remaps under a shared chord,
//!   built from data tables instead of hand-written entries
//! - **Conflict detection:** Two rules claiming the same chord in the
//!   same scope abort compilation before anything is written
//! - **Shadow analysis:** Superset chords declared after their subsets
//!   are reported as unreachable
//! - **Scoped rules:** Per-device and per-application conditions, with
//!   coverage analysis across device variants
//! - **Atomic installs:** Timestamped backup plus temp-file-then-rename
//!   merge into the daemon's configuration
//!
//! # Architecture
//!
//! - **`core`:** Business logic (types, hyper/layer builders, conflict
//!   detection, validation, rule-set assembly)
//! - **`config`:** File operations (document rendering, profile merge,
//!   atomic updates, backups)
//! - **`rules`:** The shipped rule definitions and their parameter tables
//!
//! # Examples
//!
//! ## Compiling the shipped rule set
//!
//! ```
//! use karabiner_chord_compiler::rules::{build_profile, ProfileParams};
//! use karabiner_chord_compiler::config::render_rule_set;
//!
//! let profile = build_profile(&ProfileParams::default())?;
//! let document = render_rule_set(&profile)?;
//! assert!(document.contains("caps_lock"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Building a custom rule set
//!
//! ```
//! use karabiner_chord_compiler::core::{
//!     ActionTarget, LayerComposer, ModifierFlag, RuleSetAssembler,
//! };
//!
//! let mut assembler = RuleSetAssembler::new("Default");
//! assembler.rule(
//!     "Vim arrows",
//!     LayerComposer::new(vec![ModifierFlag::RightOption])
//!         .remap("h", ActionTarget::key("left_arrow"))
//!         .remap("l", ActionTarget::key("right_arrow"))
//!         .into_manipulators(),
//! );
//!
//! let profile = assembler.assemble()?;
//! assert_eq!(profile.rules.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Installing into the daemon
//!
//! ```no_run
//! use karabiner_chord_compiler::config::ProfileWriter;
//! use karabiner_chord_compiler::rules::{build_profile, ProfileParams};
//!
//! let profile = build_profile(&ProfileParams::default())?;
//! let writer = ProfileWriter::new("/home/user/.config/karabiner/karabiner.json".into())?;
//! writer.install(&profile)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod rules;

// Re-export commonly used types for convenience
pub use core::{
    ActionTarget, ConditionExpr, KeyIdentifier, Manipulator, ModifierFlag, Profile, Rule,
    TriggerSpec,
};
