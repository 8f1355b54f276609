//! Filter state <-> URL query parameters.
//!
//! `q` carries the search text and `tag` the active tag. Both are omitted when
//! they hold their default value, so a pristine catalog has a clean URL.

use crate::filter::{FilterState, ALL_TAG};
use tracing::debug;
use url::Url;

pub const SEARCH_PARAM: &str = "q";
pub const TAG_PARAM: &str = "tag";

/// Access to the page's current location and history stack.
pub trait History {
    fn current_url(&self) -> Url;

    /// Replaces the current history entry; never pushes a new one.
    fn replace_url(&mut self, url: &Url);
}

/// Reads filter state from `url`. No validation against known tags happens.
pub fn decode(url: &Url) -> FilterState {
    let mut search_text = None;
    let mut active_tag = None;
    for (key, value) in url.query_pairs() {
        if key == SEARCH_PARAM && search_text.is_none() {
            search_text = Some(value.into_owned());
        } else if key == TAG_PARAM && active_tag.is_none() {
            active_tag = Some(value.into_owned());
        }
    }

    FilterState {
        search_text: search_text.unwrap_or_default(),
        active_tag: active_tag
            .filter(|tag| !tag.is_empty())
            .unwrap_or_else(|| ALL_TAG.to_string()),
    }
}

/// Returns a copy of `url` whose `q`/`tag` parameters reflect `state`.
/// Other parameters and the fragment are kept.
pub fn encode(url: &Url, state: &FilterState) -> Url {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    let search = Some(state.search_text.as_str()).filter(|q| !q.is_empty());
    let tag = Some(state.active_tag.as_str()).filter(|_| !state.is_all_tags());
    set_param(&mut pairs, SEARCH_PARAM, search);
    set_param(&mut pairs, TAG_PARAM, tag);

    let mut next = url.clone();
    if pairs.is_empty() {
        next.set_query(None);
    } else {
        next.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    next
}

/// Writes `state` into the current history entry and returns the new URL.
pub fn apply<H: History + ?Sized>(history: &mut H, state: &FilterState) -> Url {
    let next = encode(&history.current_url(), state);
    debug!(url = %next, "Replacing history entry");
    history.replace_url(&next);
    next
}

// Mirrors URLSearchParams::set/delete: the first occurrence is updated in
// place, later duplicates are dropped, and a missing key is appended.
fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    let Some(value) = value else {
        pairs.retain(|(k, _)| k != key);
        return;
    };

    let mut seen = false;
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        *v = value.to_string();
        true
    });
    if !seen {
        pairs.push((key.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_decode_defaults() {
        assert_eq!(decode(&url("https://x/")), FilterState::default());
        assert_eq!(decode(&url("https://x/?q=&tag=")), FilterState::default());
    }

    #[test]
    fn test_decode_reads_params() {
        let state = decode(&url("https://x/?q=merge+sort&tag=py%20lang"));
        assert_eq!(state, FilterState::new("merge sort", "py lang"));
    }

    #[test]
    fn test_decode_keeps_unknown_tag() {
        assert_eq!(decode(&url("https://x/?tag=nope")).active_tag, "nope");
    }

    #[test]
    fn test_encode_omits_defaults() {
        let encoded = encode(&url("https://x/?q=foo&tag=py"), &FilterState::default());
        assert_eq!(encoded.as_str(), "https://x/");
    }

    #[test]
    fn test_encode_preserves_other_params_and_fragment() {
        let encoded = encode(
            &url("https://x/page?utm=1&q=old#card-7"),
            &FilterState::new("new", "py"),
        );
        assert_eq!(encoded.as_str(), "https://x/page?utm=1&q=new&tag=py#card-7");
    }

    #[test]
    fn test_encode_drops_duplicate_keys() {
        let encoded = encode(&url("https://x/?tag=a&b=1&tag=c"), &FilterState::new("", "py"));
        assert_eq!(encoded.as_str(), "https://x/?tag=py&b=1");
    }

    #[test]
    fn test_encode_all_tag_removes_param() {
        let encoded = encode(&url("https://x/?tag=py&keep=1"), &FilterState::new("", ALL_TAG));
        assert_eq!(encoded.as_str(), "https://x/?keep=1");
    }

    #[test]
    fn test_round_trip() {
        let base = url("https://x/catalog?ref=home#top");
        let states = [
            FilterState::default(),
            FilterState::new("sort", ALL_TAG),
            FilterState::new("", "py"),
            FilterState::new("a&b=c #frag", "c++"),
            FilterState::new("  spaced  ", "tag with space"),
            FilterState::new("ünïcödé ✓", "日本語"),
            FilterState::new("100%", ""),
        ];
        for state in states {
            let decoded = decode(&encode(&base, &state));
            assert_eq!(decoded, state.canonical(), "state {state:?}");
        }
    }

    struct FakeHistory {
        url: Url,
        replaced: usize,
    }

    impl History for FakeHistory {
        fn current_url(&self) -> Url {
            self.url.clone()
        }

        fn replace_url(&mut self, url: &Url) {
            self.url = url.clone();
            self.replaced += 1;
        }
    }

    #[test]
    fn test_apply_replaces_entry() {
        let mut history = FakeHistory {
            url: url("https://x/"),
            replaced: 0,
        };
        let next = apply(&mut history, &FilterState::new("foo", "py"));
        assert_eq!(next.as_str(), "https://x/?q=foo&tag=py");
        assert_eq!(history.url, next);
        assert_eq!(history.replaced, 1);
    }
}
