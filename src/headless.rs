//! An in-memory page that stands in for the browser.
//!
//! `HeadlessPage` is a cheap, cloneable handle: every clone sees the same page.
//! It implements every host trait, so one page can be passed to [`App::new`]
//! as surface, history and clipboard backend at once.
//!
//! [`App::new`]: crate::app::App::new

use crate::app::UiEvent;
use crate::clipboard::{ClipboardAdapter, ClipboardError, LegacyCopyTarget, PrivilegedClipboard};
use crate::query::History;
use crate::render::{Affordance, ButtonKey, CardBinding, Surface};
use crate::scroll::ScrollMetrics;
use crate::tags::TagButton;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;
use url::Url;

pub type HeadlessClipboard = ClipboardAdapter<HeadlessPage, HeadlessPage>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ButtonState {
    label: String,
    copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CopyContainer {
    id: u64,
    text: String,
}

#[derive(Debug)]
struct PageState {
    url: Url,
    search_value: String,
    tags: Vec<TagButton>,
    count: String,
    grid_markup: String,
    card_order: Vec<String>,
    bindings: HashMap<ButtonKey, UiEvent>,
    buttons: HashMap<ButtonKey, ButtonState>,
    scrolled_to: Option<String>,
    scroll_metrics: ScrollMetrics,
    scroll_percent: String,

    secure_context: bool,
    clipboard_api: bool,
    deny_clipboard_api: bool,
    reject_legacy_copy: bool,
    clipboard: Option<String>,
    containers: Vec<CopyContainer>,
    selection: Option<String>,
    next_container_id: u64,
}

#[derive(Debug, Clone)]
pub struct HeadlessPage {
    inner: Rc<RefCell<PageState>>,
}

impl HeadlessPage {
    /// A secure page with a working clipboard API, opened at `url`.
    pub fn new(url: Url) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PageState {
                url,
                search_value: String::new(),
                tags: Vec::new(),
                count: String::new(),
                grid_markup: String::new(),
                card_order: Vec::new(),
                bindings: HashMap::new(),
                buttons: HashMap::new(),
                scrolled_to: None,
                scroll_metrics: ScrollMetrics::default(),
                scroll_percent: String::new(),
                secure_context: true,
                clipboard_api: true,
                deny_clipboard_api: false,
                reject_legacy_copy: false,
                clipboard: None,
                containers: Vec::new(),
                selection: None,
                next_container_id: 1,
            })),
        }
    }

    pub fn with_secure_context(self, secure: bool) -> Self {
        self.inner.borrow_mut().secure_context = secure;
        self
    }

    /// Where the page is scrolled to when the catalog starts.
    pub fn with_scroll_metrics(self, metrics: ScrollMetrics) -> Self {
        self.inner.borrow_mut().scroll_metrics = metrics;
        self
    }

    pub fn with_clipboard_api(self, available: bool) -> Self {
        self.inner.borrow_mut().clipboard_api = available;
        self
    }

    /// Makes privileged writes fail as if permission were refused.
    pub fn deny_clipboard_api(self) -> Self {
        self.inner.borrow_mut().deny_clipboard_api = true;
        self
    }

    /// Makes the legacy copy command report failure.
    pub fn reject_legacy_copy(self) -> Self {
        self.inner.borrow_mut().reject_legacy_copy = true;
        self
    }

    /// Builds the clipboard adapter the way the page's capabilities dictate.
    pub fn clipboard(&self) -> HeadlessClipboard {
        let (api, secure) = {
            let state = self.inner.borrow();
            (state.clipboard_api, state.secure_context)
        };
        ClipboardAdapter::new(api.then(|| self.clone()), secure, self.clone())
    }

    /// Simulates a click; returns the wired event, or `None` for a button that
    /// is not on the page.
    pub fn click(&self, button: &ButtonKey) -> Option<UiEvent> {
        self.inner.borrow().bindings.get(button).cloned()
    }

    /// Simulates a click on a tag-selector button.
    pub fn click_tag(&self, label: &str) -> Option<UiEvent> {
        let state = self.inner.borrow();
        state
            .tags
            .iter()
            .find(|tag| tag.label == label)
            .map(|tag| UiEvent::SelectTag(tag.label.clone()))
    }

    /// Simulates typing into the search box.
    pub fn type_search(&self, text: &str) -> UiEvent {
        self.inner.borrow_mut().search_value = text.to_string();
        UiEvent::SearchInput(text.to_string())
    }

    pub fn url(&self) -> Url {
        self.inner.borrow().url.clone()
    }

    pub fn search_value(&self) -> String {
        self.inner.borrow().search_value.clone()
    }

    pub fn tags(&self) -> Vec<TagButton> {
        self.inner.borrow().tags.clone()
    }

    pub fn active_tag(&self) -> Option<String> {
        self.inner
            .borrow()
            .tags
            .iter()
            .find(|tag| tag.active)
            .map(|tag| tag.label.clone())
    }

    pub fn count_text(&self) -> String {
        self.inner.borrow().count.clone()
    }

    pub fn grid_markup(&self) -> String {
        self.inner.borrow().grid_markup.clone()
    }

    pub fn card_ids(&self) -> Vec<String> {
        self.inner.borrow().card_order.clone()
    }

    pub fn label(&self, button: &ButtonKey) -> Option<String> {
        self.inner.borrow().buttons.get(button).map(|b| b.label.clone())
    }

    pub fn is_copied(&self, button: &ButtonKey) -> bool {
        self.inner
            .borrow()
            .buttons
            .get(button)
            .map_or(false, |b| b.copied)
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.inner.borrow().clipboard.clone()
    }

    /// Number of legacy copy containers still attached to the page.
    pub fn attached_containers(&self) -> usize {
        self.inner.borrow().containers.len()
    }

    pub fn scrolled_to(&self) -> Option<String> {
        self.inner.borrow().scrolled_to.clone()
    }

    pub fn scroll_percent(&self) -> String {
        self.inner.borrow().scroll_percent.clone()
    }

    /// Plain-text rendering of the page for terminals and logs.
    pub fn snapshot(&self) -> String {
        let state = self.inner.borrow();
        let mut out = String::new();
        let _ = writeln!(out, "url:    {}", state.url);
        let _ = writeln!(out, "search: {:?}", state.search_value);
        let tags: Vec<String> = state
            .tags
            .iter()
            .map(|tag| {
                if tag.active {
                    format!("[{}]", tag.label)
                } else {
                    tag.label.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "tags:   {}", tags.join(" "));
        let _ = writeln!(out, "count:  {}", state.count);
        for id in &state.card_order {
            let label = |affordance: Affordance| {
                state
                    .buttons
                    .get(&ButtonKey::new(id.clone(), affordance))
                    .map(|b| b.label.clone())
                    .unwrap_or_default()
            };
            let _ = writeln!(
                out,
                "  - {id}  ({} | {})",
                label(Affordance::CopyCode),
                label(Affordance::CopyLink)
            );
        }
        if let Some(text) = &state.clipboard {
            let _ = writeln!(out, "clipboard: {text:?}");
        }
        let _ = write!(out, "scroll: {}", state.scroll_percent);
        out
    }
}

impl History for HeadlessPage {
    fn current_url(&self) -> Url {
        self.url()
    }

    fn replace_url(&mut self, url: &Url) {
        self.inner.borrow_mut().url = url.clone();
    }
}

impl Surface for HeadlessPage {
    fn set_search_value(&mut self, value: &str) {
        self.inner.borrow_mut().search_value = value.to_string();
    }

    fn show_tags(&mut self, tags: &[TagButton]) {
        self.inner.borrow_mut().tags = tags.to_vec();
    }

    fn show_count(&mut self, text: &str) {
        self.inner.borrow_mut().count = text.to_string();
    }

    fn replace_grid(&mut self, markup: String, bindings: Vec<CardBinding>) {
        let mut state = self.inner.borrow_mut();
        state.grid_markup = markup;
        state.card_order.clear();
        state.bindings.clear();
        state.buttons.clear();
        for binding in bindings {
            let CardBinding { button, on_click } = binding;
            if state.card_order.last() != Some(&button.card_id) {
                state.card_order.push(button.card_id.clone());
            }
            state.buttons.insert(
                button.clone(),
                ButtonState {
                    label: button.affordance.idle_label().to_string(),
                    copied: false,
                },
            );
            state.bindings.insert(button, on_click);
        }
    }

    fn set_button_label(&mut self, button: &ButtonKey, label: &str, copied: bool) {
        if let Some(state) = self.inner.borrow_mut().buttons.get_mut(button) {
            state.label = label.to_string();
            state.copied = copied;
        }
    }

    fn scroll_into_view(&mut self, card_id: &str) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.card_order.iter().any(|id| id == card_id) {
            state.scrolled_to = Some(card_id.to_string());
            true
        } else {
            false
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.inner.borrow().scroll_metrics
    }

    fn show_scroll_percent(&mut self, text: &str) {
        self.inner.borrow_mut().scroll_percent = text.to_string();
    }
}

#[async_trait(?Send)]
impl PrivilegedClipboard for HeadlessPage {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.inner.borrow_mut();
        if !state.clipboard_api {
            return Err(ClipboardError::Unavailable);
        }
        if state.deny_clipboard_api {
            return Err(ClipboardError::Denied("write permission refused".to_string()));
        }
        state.clipboard = Some(text.to_string());
        Ok(())
    }
}

impl LegacyCopyTarget for HeadlessPage {
    type Container = u64;

    fn insert_container(&mut self, text: &str) -> Result<u64, ClipboardError> {
        let mut state = self.inner.borrow_mut();
        let id = state.next_container_id;
        state.next_container_id += 1;
        state.containers.push(CopyContainer {
            id,
            text: text.to_string(),
        });
        Ok(id)
    }

    fn select_contents(&mut self, container: &u64) {
        let mut state = self.inner.borrow_mut();
        let selected = state
            .containers
            .iter()
            .find(|c| c.id == *container)
            .map(|c| c.text.clone());
        state.selection = selected;
    }

    fn exec_copy(&mut self) -> Result<(), ClipboardError> {
        let mut state = self.inner.borrow_mut();
        if state.reject_legacy_copy {
            return Err(ClipboardError::CommandRejected);
        }
        let selection = state.selection.clone().ok_or(ClipboardError::CommandRejected)?;
        state.clipboard = Some(selection);
        Ok(())
    }

    fn remove_container(&mut self, container: u64) {
        let mut state = self.inner.borrow_mut();
        state.containers.retain(|c| c.id != container);
        state.selection = None;
    }
}
