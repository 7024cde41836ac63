//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use crate::prompt::PromptLibrary;

/// Directory holding `.prompty` files. Defaults to the bundled `assets/`.
pub const PROMPTS_DIR: &str = "PROMPTS_DIR";

#[derive(Debug, Clone)]
pub struct GroundedChatConfig {
    pub prompts_dir: Option<PathBuf>,
}

impl GroundedChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prompts_dir = lookup(PROMPTS_DIR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        Self { prompts_dir }
    }

    pub fn prompt_library(&self) -> PromptLibrary {
        match &self.prompts_dir {
            Some(dir) => PromptLibrary::new(dir),
            None => PromptLibrary::bundled(),
        }
    }
}
