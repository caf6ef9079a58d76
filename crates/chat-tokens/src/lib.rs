//! Chat message tokenization.
//!
//! Splits table chat text into text, emote and mention tokens for the chat
//! panel and the on-table overlay, and assigns stable colours to usernames.

pub mod colors;
pub mod tokenizer;

pub use colors::UserColors;
pub use tokenizer::{ChatToken, is_emote_only, reconstruct, tokenize};
