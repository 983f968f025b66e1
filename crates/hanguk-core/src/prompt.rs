/// Instruction pair sent with every lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub system_instruction: String,
}

/// Builds lookup instructions for one source language. Must be pure.
pub trait Prompter: Send + Sync {
    fn build(&self, query: &str, target_language: &str) -> Prompt;
}
