//! Line commands for the preview binary.
//!
//! Lines starting with `/` are commands; anything else is a chat message,
//! optionally prefixed with `name: ` to set the sender.

use display_amount::DisplayMode;
use emote_client::{EmoteSetFetcher, RefreshOutcome};
use serde_json::{Value, json};

use crate::session::ChatSession;

const SEARCH_LIMIT: usize = 10;
const DEFAULT_SENDER: &str = "you";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat { username: String, text: String },
    Format(u64),
    Parse(String),
    Mode(DisplayMode),
    BigBlind(u64),
    Use(String),
    Recent,
    Refresh,
    Search(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(parse_chat(line));
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let required = |what: &str| {
            if arg.is_empty() {
                Err(format!("/{name} needs {what}"))
            } else {
                Ok(arg.to_string())
            }
        };

        match name {
            "fmt" => required("a chip amount")?
                .parse()
                .map(Self::Format)
                .map_err(|_| format!("not a chip amount: {arg}")),
            "parse" => required("an amount").map(Self::Parse),
            "mode" => required("a display mode")?
                .parse()
                .map(Self::Mode)
                .map_err(|e: display_amount::AmountError| e.to_string()),
            "bb" => required("a big blind")?
                .parse()
                .map(Self::BigBlind)
                .map_err(|_| format!("not a chip amount: {arg}")),
            "use" => required("an emote id").map(Self::Use),
            "recent" => Ok(Self::Recent),
            "refresh" => Ok(Self::Refresh),
            "search" => Ok(Self::Search(arg.to_string())),
            _ => Err(format!("unknown command: /{name}")),
        }
    }
}

fn parse_chat(line: &str) -> Command {
    match line.split_once(": ") {
        Some((name, text)) if !name.is_empty() && !name.contains(char::is_whitespace) => {
            Command::Chat {
                username: name.to_string(),
                text: text.to_string(),
            }
        }
        _ => Command::Chat {
            username: DEFAULT_SENDER.to_string(),
            text: line.to_string(),
        },
    }
}

/// Run one command and return its JSON reply.
pub async fn execute<F: EmoteSetFetcher>(session: &mut ChatSession<F>, command: Command) -> Value {
    match command {
        Command::Chat { username, text } => {
            serde_json::to_value(session.render_message(&username, &text))
                .unwrap_or_else(|e| json!({ "error": e.to_string() }))
        }
        Command::Format(chips) => json!({
            "chips": chips,
            "mode": session.amounts().mode(),
            "display": session.amounts().format(chips),
        }),
        Command::Parse(input) => match session.amounts().parse_input(&input) {
            Ok(chips) => json!({ "input": input, "chips": chips }),
            Err(e) => json!({ "input": input, "error": e.to_string() }),
        },
        Command::Mode(mode) => {
            session.amounts_mut().set_requested_mode(mode);
            mode_reply(session)
        }
        Command::BigBlind(big_blind) => {
            session.amounts_mut().set_big_blind(big_blind);
            mode_reply(session)
        }
        Command::Use(id) => match session.emotes().get(&id) {
            Some(emote) => {
                session.emotes().record_usage(&id);
                json!({ "used": emote })
            }
            None => json!({ "error": format!("unknown emote id: {id}") }),
        },
        Command::Recent => json!({ "recent": session.emotes().recent_emotes() }),
        Command::Refresh => {
            let outcome = session.emotes().refresh(true).await;
            let mut reply = json!({
                "outcome": outcome_label(&outcome),
                "emotes": session.emotes().len(),
            });
            if let Some(error) = session.emotes().error() {
                reply["error"] = json!(error);
            }
            reply
        }
        Command::Search(prefix) => {
            json!({ "matches": session.emotes().search(&prefix, SEARCH_LIMIT) })
        }
    }
}

fn mode_reply<F: EmoteSetFetcher>(session: &ChatSession<F>) -> Value {
    let amounts = session.amounts();
    json!({
        "requested": amounts.requested_mode(),
        "mode": amounts.mode(),
        "bigBlind": amounts.big_blind(),
    })
}

fn outcome_label(outcome: &RefreshOutcome) -> &'static str {
    match outcome {
        RefreshOutcome::AlreadyInFlight => "already_in_flight",
        RefreshOutcome::Fresh => "fresh",
        RefreshOutcome::Refreshed { .. } => "refreshed",
        RefreshOutcome::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use display_amount::AmountFormatter;
    use emote_client::{EmoteError, EmoteRepository, EmoteSource, RawEmote, RepositoryOptions};

    use super::*;

    struct StaticFetcher(HashMap<String, Vec<RawEmote>>);

    impl EmoteSetFetcher for StaticFetcher {
        async fn fetch_set(&self, source: &EmoteSource) -> Result<Vec<RawEmote>, EmoteError> {
            self.0
                .get(source.label())
                .cloned()
                .ok_or_else(|| EmoteError::InvalidSource(source.label().to_string()))
        }
    }

    fn raw(id: &str, name: &str) -> RawEmote {
        RawEmote {
            id: Some(id.into()),
            name: Some(name.into()),
            url: None,
        }
    }

    fn session() -> ChatSession<StaticFetcher> {
        let fetcher = StaticFetcher(HashMap::from([(
            "global".to_string(),
            vec![raw("e1", "KEKW"), raw("e2", "Kappa"), raw("e3", "PogChamp")],
        )]));
        let options = RepositoryOptions {
            url_template: "https://cdn.example/{id}".into(),
            ..RepositoryOptions::default()
        };
        ChatSession::new(
            EmoteRepository::new(fetcher, options),
            AmountFormatter::new(DisplayMode::BigBlinds, 200, false),
        )
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/fmt 1500"), Ok(Command::Format(1500)));
        assert_eq!(Command::parse("/parse 2.5bb"), Ok(Command::Parse("2.5bb".into())));
        assert_eq!(Command::parse("/mode usdc"), Ok(Command::Mode(DisplayMode::Usdc)));
        assert_eq!(Command::parse("/bb 50"), Ok(Command::BigBlind(50)));
        assert_eq!(Command::parse("/use e1"), Ok(Command::Use("e1".into())));
        assert_eq!(Command::parse("/recent"), Ok(Command::Recent));
        assert_eq!(Command::parse("/refresh"), Ok(Command::Refresh));
        assert_eq!(Command::parse("/search ke"), Ok(Command::Search("ke".into())));
        assert!(Command::parse("/fmt").is_err());
        assert!(Command::parse("/fmt lots").is_err());
        assert!(Command::parse("/mode yen").is_err());
        assert!(Command::parse("/nope").is_err());
    }

    #[test]
    fn parses_chat_lines() {
        assert_eq!(
            Command::parse("alice: gg KEKW"),
            Ok(Command::Chat {
                username: "alice".into(),
                text: "gg KEKW".into()
            })
        );
        assert_eq!(
            Command::parse("nice hand: really"),
            Ok(Command::Chat {
                username: DEFAULT_SENDER.into(),
                text: "nice hand: really".into()
            })
        );
    }

    #[tokio::test]
    async fn chat_line_renders_tokens() {
        let mut session = session();
        assert_eq!(
            execute(&mut session, Command::Refresh).await["outcome"],
            "refreshed"
        );

        let reply = execute(
            &mut session,
            Command::Chat {
                username: "alice".into(),
                text: "kekw @bob".into(),
            },
        )
        .await;
        assert_eq!(reply["username"], "alice");
        assert_eq!(reply["emoteOnly"], false);
        assert_eq!(reply["tokens"][0]["type"], "emote");
        assert_eq!(reply["tokens"][0]["text"], "kekw");
        assert_eq!(reply["tokens"][2]["type"], "mention");
        assert!(reply["color"].as_str().is_some_and(|c| c.starts_with('#')));
    }

    #[tokio::test]
    async fn use_and_recent() {
        let mut session = session();
        execute(&mut session, Command::Refresh).await;

        execute(&mut session, Command::Use("e1".into())).await;
        execute(&mut session, Command::Use("e3".into())).await;
        let reply = execute(&mut session, Command::Recent).await;
        assert_eq!(reply["recent"][0]["id"], "e3");
        assert_eq!(reply["recent"][1]["id"], "e1");

        let reply = execute(&mut session, Command::Use("missing".into())).await;
        assert!(reply["error"].is_string());
    }

    #[tokio::test]
    async fn amounts_follow_mode_changes() {
        let mut session = session();
        let reply = execute(&mut session, Command::Format(500)).await;
        assert_eq!(reply["mode"], "big_blinds");
        assert_eq!(reply["display"], "2.5bb");

        let reply = execute(&mut session, Command::BigBlind(0)).await;
        assert_eq!(reply["requested"], "big_blinds");
        assert_eq!(reply["mode"], "chips");

        let reply = execute(&mut session, Command::Parse("abc".into())).await;
        assert!(reply["error"].is_string());
    }
}
