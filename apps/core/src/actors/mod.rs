pub mod llm;
pub mod messages;
pub mod supervisor;
pub mod traits;
