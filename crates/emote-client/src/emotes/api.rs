use std::future::Future;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{EmoteSource, RawEmote};
use crate::EmoteError;

/// Proxy response for one emote set. Only `emotes` is read.
#[derive(Debug, Deserialize)]
pub(super) struct EmoteSetResponse {
    #[serde(default)]
    pub(super) emotes: Vec<Value>,
}

impl EmoteSetResponse {
    pub(super) fn into_raw(self) -> Vec<RawEmote> {
        self.emotes.iter().map(RawEmote::from_upstream).collect()
    }
}

/// Source of raw emote records, one call per upstream set.
pub trait EmoteSetFetcher {
    fn fetch_set(
        &self,
        source: &EmoteSource,
    ) -> impl Future<Output = Result<Vec<RawEmote>, EmoteError>> + Send;
}

/// Fetches emote sets from the HTTP proxy.
pub struct HttpEmoteFetcher {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpEmoteFetcher {
    /// `base_url` is the proxy root, e.g. `https://table.example/api/emotes`.
    pub fn new(base_url: &str) -> Result<Self, EmoteError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(EmoteError::InvalidSource(format!(
                "proxy URL cannot be a base: {base_url}"
            )));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Proxy endpoint for a source: `{base}/emote-sets/global` or `{base}/emote-sets/{id}`.
    pub fn endpoint(&self, source: &EmoteSource) -> Result<Url, EmoteError> {
        let segment = match source {
            EmoteSource::Global => "global",
            EmoteSource::Set(id) if id.trim().is_empty() => {
                return Err(EmoteError::InvalidSource("empty set id".into()));
            }
            EmoteSource::Set(id) => id.as_str(),
        };
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EmoteError::InvalidSource(self.base_url.to_string()))?
            .pop_if_empty()
            .push("emote-sets")
            .push(segment);
        Ok(url)
    }

    /// Send a GET request to the proxy.
    async fn fetch(&self, url: Url) -> Result<String, EmoteError> {
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(EmoteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}

impl EmoteSetFetcher for HttpEmoteFetcher {
    async fn fetch_set(&self, source: &EmoteSource) -> Result<Vec<RawEmote>, EmoteError> {
        let url = self.endpoint(source)?;
        let body = self.fetch(url).await?;
        let resp: EmoteSetResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            count = resp.emotes.len(),
            source = source.label(),
            "Fetched emote set"
        );
        Ok(resp.into_raw())
    }
}
