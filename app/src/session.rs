//! Per-connection chat state: emotes, amount display and user colours.

use chat_tokens::{ChatToken, UserColors, is_emote_only, tokenize};
use display_amount::AmountFormatter;
use emote_client::{EmoteRepository, EmoteSetFetcher};
use serde::Serialize;

/// A chat line ready for the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub username: String,
    pub color: String,
    pub tokens: Vec<ChatToken>,
    pub emote_only: bool,
}

pub struct ChatSession<F> {
    emotes: EmoteRepository<F>,
    amounts: AmountFormatter,
    colors: UserColors,
}

impl<F: EmoteSetFetcher> ChatSession<F> {
    pub fn new(emotes: EmoteRepository<F>, amounts: AmountFormatter) -> Self {
        Self {
            emotes,
            amounts,
            colors: UserColors::new(),
        }
    }

    pub fn emotes(&self) -> &EmoteRepository<F> {
        &self.emotes
    }

    pub fn amounts(&self) -> &AmountFormatter {
        &self.amounts
    }

    pub fn amounts_mut(&mut self) -> &mut AmountFormatter {
        &mut self.amounts
    }

    /// Tokenize `text` against the current emote index and attach the
    /// sender's colour.
    pub fn render_message(&mut self, username: &str, text: &str) -> RenderedMessage {
        let index = self.emotes.snapshot();
        let tokens = tokenize(text, &index);
        let emote_only = is_emote_only(&tokens);
        RenderedMessage {
            username: username.to_string(),
            color: self.colors.color_for(username).to_string(),
            tokens,
            emote_only,
        }
    }
}
