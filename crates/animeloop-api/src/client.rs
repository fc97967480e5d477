use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::AnimeloopError;
use crate::model::{Episode, Loop, Series, Tag};
use crate::query::{
    merge_query_params, EpisodeCountQuery, EpisodeQuery, LoopCountQuery, LoopQuery, ParamValue,
    RandomLoopQuery, SeriesCountQuery, SeriesQuery, TagQuery,
};
use crate::types::{
    ApiEnvelope, CountPayload, EpisodePayload, LoopPayload, SeriesPayload, TagPayload,
};

const BASE_URL: &str = "https://animeloop.org/api/v2/";

/// Animeloop API v2 client.
///
/// Stateless between calls: each method performs a single GET awaited to
/// completion, with no internal retries, caching or shared mutable state.
/// Cloning shares the underlying connection pool, so a clone per task is
/// cheap.
#[derive(Debug, Clone)]
pub struct AnimeloopClient {
    http: Client,
    base_url: Url,
}

impl AnimeloopClient {
    /// Client against the production animeloop.org endpoint.
    pub fn new() -> Self {
        Self::with_base_url(Url::parse(BASE_URL).expect("static base URL parses"))
    }

    /// Client against a custom endpoint root, e.g. a local test server.
    /// Query parameters already present on `base_url` are preserved.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        // Extending the path by segment keeps any query string on the base
        // intact, unlike Url::join.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url
    }

    /// One round trip: build the query string, GET, validate the envelope
    /// and surrender its payload.
    async fn fetch(
        &self,
        path: &str,
        params: Vec<(&str, ParamValue)>,
    ) -> Result<Value, AnimeloopError> {
        let mut url = self.endpoint(path);
        merge_query_params(&mut url, params);

        tracing::debug!(%url, "animeloop request");
        let resp = self.http.get(url.clone()).send().await?;
        let envelope: ApiEnvelope = resp.json().await?;

        match envelope.into_data() {
            Ok(data) => Ok(data),
            Err(err) => {
                if matches!(err, AnimeloopError::Api(_)) {
                    tracing::warn!(%url, error = %err, "animeloop API error");
                }
                Err(err)
            }
        }
    }

    // ── Loops ────────────────────────────────────────────────────

    /// Fetch a single loop by id.
    pub async fn loop_by_id(&self, id: &str) -> Result<Loop, AnimeloopError> {
        let data = self
            .fetch("loop", vec![("id", ParamValue::Text(id.to_string()))])
            .await?;
        let payload: LoopPayload = serde_json::from_value(data)?;
        payload.into_model()
    }

    /// List loops matching `query`.
    pub async fn loops(&self, query: &LoopQuery) -> Result<Vec<Loop>, AnimeloopError> {
        let data = self.fetch("loop", query.params()).await?;
        let payloads: Vec<LoopPayload> = serde_json::from_value(data)?;
        payloads.into_iter().map(LoopPayload::into_model).collect()
    }

    /// Count loops matching `query`.
    pub async fn loop_count(&self, query: &LoopCountQuery) -> Result<u64, AnimeloopError> {
        let data = self.fetch("loop/count", query.params()).await?;
        let payload: CountPayload = serde_json::from_value(data)?;
        Ok(payload.count)
    }

    /// List loops matching `query` in server-randomized order.
    pub async fn random_loops(
        &self,
        query: &RandomLoopQuery,
    ) -> Result<Vec<Loop>, AnimeloopError> {
        let data = self.fetch("rand/loop", query.params()).await?;
        let payloads: Vec<LoopPayload> = serde_json::from_value(data)?;
        payloads.into_iter().map(LoopPayload::into_model).collect()
    }

    // ── Episodes ─────────────────────────────────────────────────

    /// Fetch a single episode by id.
    pub async fn episode_by_id(&self, id: &str) -> Result<Episode, AnimeloopError> {
        let data = self
            .fetch("episode", vec![("id", ParamValue::Text(id.to_string()))])
            .await?;
        let payload: EpisodePayload = serde_json::from_value(data)?;
        Ok(payload.into_model())
    }

    /// List episodes matching `query`.
    pub async fn episodes(&self, query: &EpisodeQuery) -> Result<Vec<Episode>, AnimeloopError> {
        let data = self.fetch("episode", query.params()).await?;
        let payloads: Vec<EpisodePayload> = serde_json::from_value(data)?;
        Ok(payloads
            .into_iter()
            .map(EpisodePayload::into_model)
            .collect())
    }

    /// Count episodes matching `query`.
    pub async fn episode_count(&self, query: &EpisodeCountQuery) -> Result<u64, AnimeloopError> {
        let data = self.fetch("episode/count", query.params()).await?;
        let payload: CountPayload = serde_json::from_value(data)?;
        Ok(payload.count)
    }

    // ── Series ───────────────────────────────────────────────────

    /// Fetch a single series by id.
    pub async fn series_by_id(&self, id: &str) -> Result<Series, AnimeloopError> {
        let data = self
            .fetch("series", vec![("id", ParamValue::Text(id.to_string()))])
            .await?;
        let payload: SeriesPayload = serde_json::from_value(data)?;
        Ok(payload.into_model())
    }

    /// List series matching `query`.
    pub async fn series(&self, query: &SeriesQuery) -> Result<Vec<Series>, AnimeloopError> {
        let data = self.fetch("series", query.params()).await?;
        let payloads: Vec<SeriesPayload> = serde_json::from_value(data)?;
        Ok(payloads.into_iter().map(SeriesPayload::into_model).collect())
    }

    /// Count series matching `query`.
    pub async fn series_count(&self, query: &SeriesCountQuery) -> Result<u64, AnimeloopError> {
        let data = self.fetch("series/count", query.params()).await?;
        let payload: CountPayload = serde_json::from_value(data)?;
        Ok(payload.count)
    }

    /// Search series by name.
    pub async fn search_series(&self, value: &str) -> Result<Vec<Series>, AnimeloopError> {
        let data = self
            .fetch(
                "search/series",
                vec![("value", ParamValue::Text(value.to_string()))],
            )
            .await?;
        let payloads: Vec<SeriesPayload> = serde_json::from_value(data)?;
        Ok(payloads.into_iter().map(SeriesPayload::into_model).collect())
    }

    // ── Tags ─────────────────────────────────────────────────────

    /// List tags matching `query`.
    pub async fn tags(&self, query: &TagQuery) -> Result<Vec<Tag>, AnimeloopError> {
        let data = self.fetch("tag", query.params()).await?;
        let payloads: Vec<TagPayload> = serde_json::from_value(data)?;
        Ok(payloads.into_iter().map(TagPayload::into_model).collect())
    }
}

impl Default for AnimeloopClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_query() {
        let client = AnimeloopClient::with_base_url(
            Url::parse("http://127.0.0.1:9000/api/v2/?debug=1").unwrap(),
        );
        let url = client.endpoint("loop/count");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/v2/loop/count?debug=1");
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let client =
            AnimeloopClient::with_base_url(Url::parse("http://127.0.0.1:9000/api/v2").unwrap());
        assert_eq!(
            client.endpoint("rand/loop").as_str(),
            "http://127.0.0.1:9000/api/v2/rand/loop"
        );
    }
}
