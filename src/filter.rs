use crate::models::prompt::Prompt;
use std::fmt;

/// Sentinel tag meaning "no tag restriction".
pub const ALL_TAG: &str = "All";

/// The pair of inputs that decides which prompts are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub active_tag: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            active_tag: ALL_TAG.to_string(),
        }
    }
}

impl FilterState {
    pub fn new(search_text: impl Into<String>, active_tag: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            active_tag: active_tag.into(),
        }
    }

    /// True when the active tag places no restriction.
    pub fn is_all_tags(&self) -> bool {
        self.active_tag.is_empty() || self.active_tag == ALL_TAG
    }

    /// Collapses the empty tag onto the `All` sentinel, matching what the URL
    /// can express.
    pub fn canonical(&self) -> Self {
        let active_tag = if self.is_all_tags() {
            ALL_TAG.to_string()
        } else {
            self.active_tag.clone()
        };
        Self {
            search_text: self.search_text.clone(),
            active_tag,
        }
    }

    fn matches(&self, prompt: &Prompt, needle: &str) -> bool {
        let in_tag = self.is_all_tags() || prompt.has_tag(&self.active_tag);
        if !in_tag {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        haystack(prompt).contains(needle)
    }
}

/// Lower-cases and trims text for matching.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

// Fields are newline-joined so a needle cannot straddle two fields.
fn haystack(prompt: &Prompt) -> String {
    normalize(&format!(
        "{}\n{}\n{}",
        prompt.title.as_deref().unwrap_or_default(),
        prompt.body,
        prompt.tags.join(" ")
    ))
}

/// Returns the prompts matching `state`, in their original order.
pub fn filter_prompts<'a>(prompts: &'a [Prompt], state: &FilterState) -> Vec<&'a Prompt> {
    let needle = normalize(&state.search_text);
    prompts
        .iter()
        .filter(|prompt| state.matches(prompt, &needle))
        .collect()
}

/// Counts shown by the results counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl FilterSummary {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} prompts", self.shown, self.total)
    }
}
