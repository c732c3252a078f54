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

//! src/core/mod.rs
//!
//! Rule composition and chord emulation engine
//!
//! This module contains the pure compilation core:
//! - Type definitions for triggers, actions, conditions, rules, profiles
//! - Hyper-key chord emulation with tap/hold disambiguation data
//! - Layer composition (shared-modifier expansion of rule tables)
//! - Conflict detection, shadow analysis, and condition-pair coverage
//! - Structural validation and rule-set assembly
//!
//! Everything here is isolated from I/O: the engine takes rule
//! definitions in, hands a `Profile` out, and never touches the
//! filesystem or the daemon.

pub mod assembler;
pub mod conflict;
pub mod hyper;
pub mod layer;
pub mod types;
pub mod validator;

pub use assembler::{CompileError, RuleSetAssembler};
pub use conflict::{coverage_gaps, find_shadowed, Conflict, ConflictDetector};
pub use hyper::HyperKeyEmulator;
pub use layer::LayerComposer;
pub use types::*;
pub use validator::{validate_manipulator, ValidationError};

#[cfg(test)]
mod tests;
