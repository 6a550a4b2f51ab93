//! FolioChat core: a conversational assistant for a personal portfolio.
//!
//! Free-text questions are classified into topics by a weighted substring
//! matcher, answered from templates over a [`models::PortfolioProfile`] (or
//! by a remote chat-completion service), and paired with quick-reply
//! suggestions. The [`actors::supervisor::SupervisorHandle`] owns the session.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod profile;
pub mod reveal;
pub mod session;
pub mod telemetry;

pub use error::AppError;

#[cfg(test)]
mod tests;
