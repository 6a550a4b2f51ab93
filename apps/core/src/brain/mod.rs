//! # Brain Module
//!
//! Scripted, non-LLM answering for FolioChat.
//! Classifies the visitor's input and composes a reply from the profile.
//!
//! ## Components
//! - `intent`: Topic classification using keyword patterns
//! - `context`: Per-session conversation context
//! - `composer`: Reply templates and quick-reply suggestions

pub mod composer;
pub mod context;
pub mod intent;

pub use composer::{ComposedReply, ResponseComposer};
pub use context::ConversationContext;
pub use intent::{IntentClassifier, IntentPattern, IntentResult, Topic};
