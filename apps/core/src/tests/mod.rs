//! Test Module
//!
//! Cross-module test suites for FolioChat core.
//!
//! ## Test Categories
//! - `brain_tests`: Intent classification and reply composition properties
//! - `session_tests`: Transcript rules and the scripted turn function
//! - `actor_tests`: Supervisor driven by the HTTP completion actor
//! - `integration_tests`: Full conversations from a profile file

pub mod integration_tests;
