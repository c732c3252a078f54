//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Hyper-key emulation tests
//! - Layer composition tests
//! - Conflict detection, shadowing and coverage tests
//! - Rule-set assembly tests
//! - Tap/hold chord semantics tests

#[cfg(test)]
mod hyper_tests;
