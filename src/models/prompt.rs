use serde::Deserialize;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_LANG: &str = "text";

/// A prompt record as it appears in the feed. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Represents a prompt with its load-time defaults applied.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(from = "PromptRecord")]
pub struct Prompt {
    pub id: String,
    pub title: Option<String>,
    pub lang: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
}

impl Prompt {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: Some(title.into()),
            lang: None,
            body: body.into(),
            tags,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Title shown on the card; empty titles fall back to "Untitled".
    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or(DEFAULT_TITLE)
    }

    /// Language label shown on the card; empty labels fall back to "text".
    pub fn display_lang(&self) -> &str {
        non_empty(self.lang.as_deref()).unwrap_or(DEFAULT_LANG)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl From<PromptRecord> for Prompt {
    fn from(record: PromptRecord) -> Self {
        // Ids are generated once here so deep links stay stable for the session.
        let id = match record.id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };
        Prompt {
            id,
            title: record.title,
            lang: record.lang,
            body: record.body.unwrap_or_default(),
            tags: record.tags.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_get_defaults() {
        let prompt: Prompt = serde_json::from_str("{}").unwrap();
        assert!(!prompt.id.is_empty());
        assert!(Uuid::parse_str(&prompt.id).is_ok());
        assert_eq!(prompt.display_title(), "Untitled");
        assert_eq!(prompt.display_lang(), "text");
        assert_eq!(prompt.body, "");
        assert!(prompt.tags.is_empty());
    }

    #[test]
    fn test_null_and_empty_fields_get_defaults() {
        let prompt: Prompt = serde_json::from_str(
            r#"{"id": "", "title": null, "lang": "", "body": null, "tags": null}"#,
        )
        .unwrap();
        assert!(!prompt.id.is_empty());
        assert_eq!(prompt.display_title(), "Untitled");
        assert_eq!(prompt.display_lang(), "text");
        assert_eq!(prompt.title, None);
    }

    #[test]
    fn test_supplied_fields_are_kept() {
        let prompt: Prompt = serde_json::from_str(
            r#"{"id": "abc", "title": "Sort", "lang": "py", "body": "x", "tags": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(prompt.id, "abc");
        assert_eq!(prompt.display_title(), "Sort");
        assert_eq!(prompt.display_lang(), "py");
        assert_eq!(prompt.body, "x");
        assert!(prompt.has_tag("b"));
        assert!(!prompt.has_tag("c"));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let prompts: Vec<Prompt> = serde_json::from_str("[{}, {}, {}]").unwrap();
        assert_ne!(prompts[0].id, prompts[1].id);
        assert_ne!(prompts[1].id, prompts[2].id);
    }
}
