//! Message to token conversion.
//!
//! Whitespace runs are kept as their own text tokens, so joining every
//! token's [`ChatToken::source_text`] gives back the original message.

use std::borrow::Cow;
use std::sync::LazyLock;

use emote_client::EmoteIndex;
use regex::Regex;
use serde::Serialize;

/// Word separators: the ECMAScript `\s` set, which differs from Unicode
/// `White_Space` on U+0085 (not a separator) and U+FEFF (a separator).
const WHITESPACE_CLASS: &str =
    r"[\t\n\x0B\f\r \u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}]";

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{WHITESPACE_CLASS}+")).unwrap());
static RE_ONLY_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{WHITESPACE_CLASS}+$")).unwrap());

/// A renderable piece of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatToken {
    /// Literal text, including whitespace runs.
    Text { content: String },
    /// A resolved emote. `text` is the word as typed, e.g. `:kekw:`.
    Emote {
        id: String,
        url: String,
        name: String,
        text: String,
    },
    /// An `@name` reference. The user id is never resolved here.
    Mention {
        username: String,
        #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
}

impl ChatToken {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn mention(username: impl Into<String>) -> Self {
        Self::Mention {
            username: username.into(),
            user_id: None,
        }
    }

    /// The substring of the original message this token was built from.
    pub fn source_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text { content } => Cow::Borrowed(content.as_str()),
            Self::Emote { text, .. } => Cow::Borrowed(text.as_str()),
            Self::Mention { username, .. } => Cow::Owned(format!("@{username}")),
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text { content } if RE_ONLY_WHITESPACE.is_match(content))
    }
}

/// Split a message into tokens, resolving emotes against `emotes`.
///
/// For each non-whitespace word: a `:name:` wrapper is stripped before the
/// emote lookup (exact name, then case-insensitive). Words that are not
/// emotes and start with `@` followed by at least one character become
/// mentions. Everything else is literal text.
pub fn tokenize(message: &str, emotes: &EmoteIndex) -> Vec<ChatToken> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for ws in RE_WHITESPACE.find_iter(message) {
        if ws.start() > last {
            tokens.push(classify_word(&message[last..ws.start()], emotes));
        }
        tokens.push(ChatToken::text(ws.as_str()));
        last = ws.end();
    }
    if last < message.len() {
        tokens.push(classify_word(&message[last..], emotes));
    }

    tokens
}

fn classify_word(word: &str, emotes: &EmoteIndex) -> ChatToken {
    let candidate = word
        .strip_prefix(':')
        .and_then(|inner| inner.strip_suffix(':'))
        .filter(|inner| !inner.is_empty())
        .unwrap_or(word);

    if let Some(emote) = emotes.lookup(candidate) {
        return ChatToken::Emote {
            id: emote.id.clone(),
            url: emote.url.clone(),
            name: emote.name.clone(),
            text: word.to_string(),
        };
    }

    match word.strip_prefix('@') {
        Some(username) if !username.is_empty() => ChatToken::mention(username),
        _ => ChatToken::text(word),
    }
}

/// Rebuild the original message from its tokens.
pub fn reconstruct(tokens: &[ChatToken]) -> String {
    tokens.iter().map(|t| t.source_text()).collect()
}

/// True when the message has at least one emote and nothing but whitespace besides.
///
/// The overlay draws such messages with enlarged emotes.
pub fn is_emote_only(tokens: &[ChatToken]) -> bool {
    tokens
        .iter()
        .any(|t| matches!(t, ChatToken::Emote { .. }))
        && tokens
            .iter()
            .all(|t| matches!(t, ChatToken::Emote { .. }) || t.is_whitespace())
}
