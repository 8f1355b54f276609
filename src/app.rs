//! The event-loop driver tying filter state, URL, clipboard and surface
//! together.

use crate::clipboard::Clipboard;
use crate::filter::{filter_prompts, FilterState, FilterSummary, ALL_TAG};
use crate::labels::ConfirmationTimers;
use crate::models::prompt::Prompt;
use crate::query::{self, History};
use crate::render::{Affordance, ButtonKey, CardRenderer, CardView, RenderError, Surface, COPIED_LABEL};
use crate::scroll::{format_percent, scroll_percent, ScrollMetrics};
use crate::tags::tag_buttons;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

/// Discrete inputs processed by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SearchInput(String),
    SelectTag(String),
    Clear,
    Copy(ButtonKey),
    RevertLabel { button: ButtonKey, generation: u64 },
    Scrolled(ScrollMetrics),
}

/// The record set plus the filter state applied to it.
#[derive(Debug, Clone)]
pub struct AppState {
    prompts: Arc<[Prompt]>,
    filter: FilterState,
}

impl AppState {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self {
            prompts: prompts.into(),
            filter: FilterState::default(),
        }
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible(&self) -> Vec<&Prompt> {
        filter_prompts(&self.prompts, &self.filter)
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary::new(self.visible().len(), self.prompts.len())
    }
}

// Copied links carry the id percent-encoded; fall back to the raw fragment
// when it does not decode to UTF-8.
fn fragment_card_id(fragment: &str) -> Cow<'_, str> {
    percent_decode_str(fragment)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(fragment))
}

pub struct App<S, H, C> {
    state: AppState,
    surface: S,
    history: H,
    clipboard: C,
    renderer: CardRenderer,
    timers: ConfirmationTimers,
    rendered: Vec<CardView>,
}

impl<S, H, C> App<S, H, C>
where
    S: Surface,
    H: History,
    C: Clipboard,
{
    /// `events` is the sender side of the channel later passed to
    /// [`App::run`]; label reverts are posted through it.
    pub fn new(
        prompts: Vec<Prompt>,
        surface: S,
        history: H,
        clipboard: C,
        events: &UnboundedSender<UiEvent>,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            state: AppState::new(prompts),
            surface,
            history,
            clipboard,
            renderer: CardRenderer::new()?,
            timers: ConfirmationTimers::new(events),
            rendered: Vec::new(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// First paint: restores filter state from the URL, draws everything and
    /// honors a `#<card-id>` fragment.
    pub fn start(&mut self) -> Result<(), RenderError> {
        let url = self.history.current_url();
        self.state.filter = query::decode(&url);
        info!(
            prompts = self.state.prompts.len(),
            search = %self.state.filter.search_text,
            tag = %self.state.filter.active_tag,
            "Starting catalog"
        );

        self.surface.set_search_value(&self.state.filter.search_text);
        self.render_tags();
        self.render()?;
        let metrics = self.surface.scroll_metrics();
        self.surface.show_scroll_percent(&format_percent(scroll_percent(&metrics)));

        if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
            let card_id = fragment_card_id(fragment);
            if !self.surface.scroll_into_view(&card_id) {
                debug!(card = %card_id, "Deep-linked card is not on the page");
            }
        }
        Ok(())
    }

    pub async fn handle(&mut self, event: UiEvent) -> Result<(), RenderError> {
        match event {
            UiEvent::SearchInput(text) => {
                self.state.filter.search_text = text;
                query::apply(&mut self.history, &self.state.filter);
                self.render()?;
            }
            UiEvent::SelectTag(tag) => {
                self.state.filter.active_tag = tag;
                query::apply(&mut self.history, &self.state.filter);
                self.render()?;
                self.render_tags();
            }
            UiEvent::Clear => {
                self.state.filter = FilterState::new("", ALL_TAG);
                self.surface.set_search_value("");
                query::apply(&mut self.history, &self.state.filter);
                self.render_tags();
                self.render()?;
            }
            UiEvent::Copy(button) => self.copy(button).await,
            UiEvent::RevertLabel { button, generation } => {
                if self.timers.take_if_current(&button, generation) {
                    let label = button.affordance.idle_label();
                    self.surface.set_button_label(&button, label, false);
                }
            }
            UiEvent::Scrolled(metrics) => {
                let label = format_percent(scroll_percent(&metrics));
                self.surface.show_scroll_percent(&label);
            }
        }
        Ok(())
    }

    /// Processes events until the channel closes. Render failures are logged
    /// and do not stop the loop.
    pub async fn run(mut self, mut events: UnboundedReceiver<UiEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle(event).await {
                error!(error = %e, "Failed to handle UI event");
            }
        }
        debug!("Event channel closed");
    }

    async fn copy(&mut self, button: ButtonKey) {
        let Some(text) = self.copy_payload(&button) else {
            debug!(card = %button.card_id, "Ignoring click on a card that is no longer rendered");
            return;
        };

        let outcome = self.clipboard.copy(&text).await;
        debug!(card = %button.card_id, affordance = ?button.affordance, ?outcome, "Copy finished");
        if !outcome.is_copied() {
            return;
        }
        // Without a pending revert the label would stay "Copied" for good.
        if self.timers.schedule(button.clone()).is_some() {
            self.surface.set_button_label(&button, COPIED_LABEL, true);
        }
    }

    fn copy_payload(&self, button: &ButtonKey) -> Option<String> {
        let card = self.rendered.iter().find(|card| card.id == button.card_id)?;
        match button.affordance {
            Affordance::CopyCode => Some(card.body.clone()),
            Affordance::CopyLink => {
                let mut url = self.history.current_url();
                url.set_fragment(Some(&card.id));
                Some(url.to_string())
            }
        }
    }

    fn render_tags(&mut self) {
        let buttons = tag_buttons(&self.state.prompts, &self.state.filter.active_tag);
        self.surface.show_tags(&buttons);
    }

    fn render(&mut self) -> Result<(), RenderError> {
        let cards: Vec<CardView> = self.state.visible().into_iter().map(CardView::from).collect();
        let summary = FilterSummary::new(cards.len(), self.state.prompts.len());
        let markup = self.renderer.render_grid(&cards)?;
        let bindings = cards.iter().flat_map(CardView::bindings).collect();

        // Pending reverts belong to the buttons being replaced.
        self.timers.cancel_all();
        self.surface.show_count(&summary.to_string());
        self.surface.replace_grid(markup, bindings);
        debug!(shown = summary.shown, total = summary.total, "Rendered cards");
        self.rendered = cards;
        Ok(())
    }
}
