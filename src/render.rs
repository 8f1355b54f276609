//! Card view-models, their markup, and the surface they are drawn onto.

use crate::app::UiEvent;
use crate::models::prompt::Prompt;
use crate::scroll::ScrollMetrics;
use crate::tags::TagButton;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

const CARD_TEMPLATE_NAME: &str = "card.html";
const CARD_TEMPLATE: &str = include_str!("../templates/card.html");

pub const COPY_CODE_LABEL: &str = "Copy code";
pub const COPY_LINK_LABEL: &str = "Copy link";
pub const COPIED_LABEL: &str = "Copied";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile card template: {0}")]
    Template(#[source] tera::Error),
    #[error("failed to render card '{id}': {source}")]
    Card {
        id: String,
        #[source]
        source: tera::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Affordance {
    CopyCode,
    CopyLink,
}

impl Affordance {
    pub fn idle_label(self) -> &'static str {
        match self {
            Affordance::CopyCode => COPY_CODE_LABEL,
            Affordance::CopyLink => COPY_LINK_LABEL,
        }
    }
}

/// Addresses one copy button on one card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ButtonKey {
    pub card_id: String,
    pub affordance: Affordance,
}

impl ButtonKey {
    pub fn new(card_id: impl Into<String>, affordance: Affordance) -> Self {
        Self {
            card_id: card_id.into(),
            affordance,
        }
    }

    pub fn copy_code(card_id: impl Into<String>) -> Self {
        Self::new(card_id, Affordance::CopyCode)
    }

    pub fn copy_link(card_id: impl Into<String>) -> Self {
        Self::new(card_id, Affordance::CopyLink)
    }
}

/// What a card shows. `body` is the literal text; escaping happens only in
/// the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub lang: String,
    pub body: String,
}

impl From<&Prompt> for CardView {
    fn from(prompt: &Prompt) -> Self {
        Self {
            id: prompt.id.clone(),
            title: prompt.display_title().to_string(),
            lang: prompt.display_lang().to_string(),
            body: prompt.body.clone(),
        }
    }
}

/// Click wiring for one rendered button.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBinding {
    pub button: ButtonKey,
    pub on_click: UiEvent,
}

impl CardView {
    pub fn bindings(&self) -> [CardBinding; 2] {
        [Affordance::CopyCode, Affordance::CopyLink].map(|affordance| {
            let button = ButtonKey::new(self.id.clone(), affordance);
            CardBinding {
                on_click: UiEvent::Copy(button.clone()),
                button,
            }
        })
    }
}

/// The visible page, as far as the catalog is concerned.
pub trait Surface {
    fn set_search_value(&mut self, value: &str);
    fn show_tags(&mut self, tags: &[TagButton]);
    fn show_count(&mut self, text: &str);

    /// Replaces every card. Buttons start on their idle labels and only the
    /// given bindings are clickable afterwards.
    fn replace_grid(&mut self, markup: String, bindings: Vec<CardBinding>);
    fn set_button_label(&mut self, button: &ButtonKey, label: &str, copied: bool);

    /// Returns false when no card with `card_id` is on the page.
    fn scroll_into_view(&mut self, card_id: &str) -> bool;
    fn scroll_metrics(&self) -> ScrollMetrics;
    fn show_scroll_percent(&mut self, text: &str);
}

/// Renders cards through an auto-escaping Tera template.
pub struct CardRenderer {
    tera: Tera,
}

impl CardRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(CARD_TEMPLATE_NAME, CARD_TEMPLATE)
            .map_err(RenderError::Template)?;
        Ok(Self { tera })
    }

    pub fn render_card(&self, card: &CardView) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("card", card);
        context.insert("copy_code_label", COPY_CODE_LABEL);
        context.insert("copy_link_label", COPY_LINK_LABEL);
        self.tera
            .render(CARD_TEMPLATE_NAME, &context)
            .map_err(|source| RenderError::Card {
                id: card.id.clone(),
                source,
            })
    }

    pub fn render_grid(&self, cards: &[CardView]) -> Result<String, RenderError> {
        cards.iter().map(|card| self.render_card(card)).collect()
    }
}
