use rand::seq::IndexedRandom;

use crate::state::game::Prompt;

/// Redraw attempts before giving up on finding a different prompt. The pool
/// is tiny so a different id is found almost immediately; the cap only
/// guards against a pathological single-entry pool.
const MAX_REDRAW_ATTEMPTS: usize = 8;

/// Built-in prompts used when the configuration supplies none.
pub const DEFAULT_PROMPTS: &[&str] = &[
    "When you realize it's Monday morning",
    "That feeling when you finally finish a project",
    "Me trying to adult",
    "When someone says \"we need to talk\"",
    "How I look waiting for my code to compile",
    "My reaction to bad news",
    "When the WiFi goes out",
    "Me at 3 AM looking for snacks",
    "When someone spoils a show I'm watching",
    "How I dance when no one is watching",
];

/// Fixed set of candidate prompts with random selection.
///
/// Judge-written custom prompts bypass the pool entirely; see
/// [`Prompt::custom`].
#[derive(Debug, Clone)]
pub struct PromptPool {
    prompts: Vec<Prompt>,
}

impl PromptPool {
    /// Build a pool from prompt texts, assigning stable `p<n>` ids. Falls
    /// back to [`DEFAULT_PROMPTS`] when `texts` is empty.
    pub fn new(texts: Vec<String>) -> Self {
        let texts = if texts.is_empty() {
            DEFAULT_PROMPTS.iter().map(|t| t.to_string()).collect()
        } else {
            texts
        };

        let prompts = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Prompt {
                id: format!("p{}", index + 1),
                text,
                category: None,
                created_by: None,
            })
            .collect();

        Self { prompts }
    }

    /// Number of prompts in the pool.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the pool is empty. Never true for pools built via [`new`](Self::new).
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Uniform random draw from the pool.
    pub fn pick_random(&self) -> Prompt {
        self.prompts
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| Prompt {
                id: "p0".into(),
                text: String::new(),
                category: None,
                created_by: None,
            })
    }

    /// Draw a prompt whose id differs from `current_id`.
    ///
    /// Redraws up to a fixed cap; with a single-entry pool the same prompt
    /// comes back, which callers accept.
    pub fn pick_different_from(&self, current_id: &str) -> Prompt {
        let mut candidate = self.pick_random();
        for _ in 0..MAX_REDRAW_ATTEMPTS {
            if candidate.id != current_id {
                break;
            }
            candidate = self.pick_random();
        }
        candidate
    }
}

impl Default for PromptPool {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
