use crate::filter::ALL_TAG;
use crate::models::prompt::Prompt;
use std::collections::HashSet;

/// One entry of the tag selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagButton {
    pub label: String,
    pub active: bool,
}

/// Collect `All` followed by every distinct tag in first-seen order.
pub fn compute_tags(prompts: &[Prompt]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut tags = vec![ALL_TAG.to_string()];
    seen.insert(ALL_TAG);
    for tag in prompts.iter().flat_map(|p| p.tags.iter()) {
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Build the tag selector, marking `active_tag` when present.
pub fn tag_buttons(prompts: &[Prompt], active_tag: &str) -> Vec<TagButton> {
    compute_tags(prompts)
        .into_iter()
        .map(|label| {
            let active = label == active_tag;
            TagButton { label, active }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(tags: &[&str]) -> Prompt {
        Prompt::new("t", "", tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_compute_tags_first_seen_order() {
        let prompts = vec![prompt(&["py", "js"]), prompt(&[]), prompt(&["js", "rust", "py"])];
        assert_eq!(compute_tags(&prompts), vec!["All", "py", "js", "rust"]);
    }

    #[test]
    fn test_compute_tags_empty_catalog() {
        assert_eq!(compute_tags(&[]), vec!["All"]);
    }

    #[test]
    fn test_compute_tags_dedups_all_sentinel() {
        let prompts = vec![prompt(&["All", "x"])];
        assert_eq!(compute_tags(&prompts), vec!["All", "x"]);
    }

    #[test]
    fn test_compute_tags_is_idempotent() {
        let prompts = vec![prompt(&["b", "a"]), prompt(&["a"])];
        assert_eq!(compute_tags(&prompts), compute_tags(&prompts));
    }

    #[test]
    fn test_tag_buttons_mark_active() {
        let prompts = vec![prompt(&["py", "js"])];
        let buttons = tag_buttons(&prompts, "js");
        let active: Vec<&str> = buttons.iter().filter(|b| b.active).map(|b| b.label.as_str()).collect();
        assert_eq!(active, vec!["js"]);
    }

    #[test]
    fn test_tag_buttons_unknown_active_marks_nothing() {
        let prompts = vec![prompt(&["py"])];
        assert!(tag_buttons(&prompts, "missing").iter().all(|b| !b.active));
    }
}
