//! Query-string construction for the Animeloop API.
//!
//! Each operation has its own query struct enumerating every recognized
//! option. `None` filters are never sent; the listing defaults (`full=true`,
//! `page=1`, `limit=30`) always are.

use std::fmt;

use url::Url;

// ── Parameter values ─────────────────────────────────────────────

/// A single query-parameter value.
///
/// Booleans and structured values render as canonical JSON text (`true`,
/// `{"k":"v"}`), never language-specific strings. `Many` repeats the key
/// once per value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(u32),
    Bool(bool),
    Json(serde_json::Value),
    Many(Vec<String>),
}

impl ParamValue {
    /// Encoded values for this parameter, one per repeated key.
    fn values(&self) -> Vec<String> {
        match self {
            ParamValue::Text(s) => vec![s.clone()],
            ParamValue::Int(n) => vec![n.to_string()],
            ParamValue::Bool(b) => vec![serde_json::Value::Bool(*b).to_string()],
            ParamValue::Json(v) => vec![v.to_string()],
            ParamValue::Many(items) => items.clone(),
        }
    }
}

/// Merge `params` into the query string already present on `url`.
///
/// Pre-existing parameters are kept; a new value with the same name
/// overrides the old one in place. The existing query is read back through
/// `query_pairs` (decoded) and re-encoded once, so `%XX` sequences already
/// present are never encoded twice. Duplicate pre-existing keys collapse to
/// their last occurrence.
pub fn merge_query_params(url: &mut Url, params: Vec<(&str, ParamValue)>) {
    let existing: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    let mut merged: Vec<(String, ParamValue)> = Vec::new();
    for (name, value) in existing {
        match merged.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = ParamValue::Text(value),
            None => merged.push((name, ParamValue::Text(value))),
        }
    }
    for (name, value) in params {
        match merged.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => merged.push((name.to_string(), value)),
        }
    }

    if merged.is_empty() {
        url.set_query(None);
        return;
    }
    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (name, value) in &merged {
        for rendered in value.values() {
            pairs.append_pair(name, &rendered);
        }
    }
}

// ── Filter values ────────────────────────────────────────────────

/// Series catalogue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Tv,
    Ova,
    Movie,
}

impl SeriesKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SeriesKind::Tv => "TV",
            SeriesKind::Ova => "OVA",
            SeriesKind::Movie => "Movie",
        }
    }
}

/// How a loop entered the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSource {
    Automator,
    Upload,
}

impl LoopSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LoopSource::Automator => "automator",
            LoopSource::Upload => "upload",
        }
    }
}

/// Tag classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    General,
    Character,
    Safe,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::General => "general",
            TagKind::Character => "character",
            TagKind::Safe => "safe",
        }
    }
}

/// An inclusive numeric range, sent to the API as `"min,max"`.
///
/// `NumberRange::new(1.0, 2.0)` matches loops one to two seconds long;
/// `NumberRange::new(0.85, 0.9)` matches tag confidences in that band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl NumberRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

// ── Per-operation queries ────────────────────────────────────────

/// Filters for [`AnimeloopClient::loops`](crate::AnimeloopClient::loops).
///
/// The server ignores `series_id` when `episode_id` is set; both are passed
/// through as given.
#[derive(Debug, Clone)]
pub struct LoopQuery {
    /// Only loops from this series.
    pub series_id: Option<String>,
    /// Only loops from this episode.
    pub episode_id: Option<String>,
    /// Only loops in this collection.
    pub collection_id: Option<String>,
    /// Only loops whose length falls in this range, in seconds.
    pub duration: Option<NumberRange>,
    /// Only loops from this origin.
    pub source_from: Option<LoopSource>,
    /// Embed full series and episode details. Default `true`.
    pub full: bool,
    /// Results page. Default `1`.
    pub page: u32,
    /// Maximum number of results. Default `30`.
    pub limit: u32,
}

impl Default for LoopQuery {
    fn default() -> Self {
        Self {
            series_id: None,
            episode_id: None,
            collection_id: None,
            duration: None,
            source_from: None,
            full: true,
            page: 1,
            limit: 30,
        }
    }
}

impl LoopQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(ref id) = self.series_id {
            params.push(("seriesid", ParamValue::Text(id.clone())));
        }
        if let Some(ref id) = self.episode_id {
            params.push(("episodeid", ParamValue::Text(id.clone())));
        }
        if let Some(ref id) = self.collection_id {
            params.push(("collectionid", ParamValue::Text(id.clone())));
        }
        if let Some(range) = self.duration {
            params.push(("duration", ParamValue::Text(range.to_string())));
        }
        if let Some(source) = self.source_from {
            params.push(("source_from", ParamValue::Text(source.as_str().to_string())));
        }
        params.push(("full", ParamValue::Bool(self.full)));
        params.push(("page", ParamValue::Int(self.page)));
        params.push(("limit", ParamValue::Int(self.limit)));
        params
    }
}

/// Filters for [`AnimeloopClient::loop_count`](crate::AnimeloopClient::loop_count).
#[derive(Debug, Clone, Default)]
pub struct LoopCountQuery {
    pub series_id: Option<String>,
    pub episode_id: Option<String>,
    pub collection_id: Option<String>,
    pub duration: Option<NumberRange>,
    pub source_from: Option<LoopSource>,
}

impl LoopCountQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(ref id) = self.series_id {
            params.push(("seriesid", ParamValue::Text(id.clone())));
        }
        if let Some(ref id) = self.episode_id {
            params.push(("episodeid", ParamValue::Text(id.clone())));
        }
        if let Some(ref id) = self.collection_id {
            params.push(("collectionid", ParamValue::Text(id.clone())));
        }
        if let Some(range) = self.duration {
            params.push(("duration", ParamValue::Text(range.to_string())));
        }
        if let Some(source) = self.source_from {
            params.push(("source_from", ParamValue::Text(source.as_str().to_string())));
        }
        params
    }
}

/// Filters for [`AnimeloopClient::random_loops`](crate::AnimeloopClient::random_loops).
///
/// The random endpoint has no `page`: the server shuffles instead of
/// paginating.
#[derive(Debug, Clone)]
pub struct RandomLoopQuery {
    pub series_id: Option<String>,
    pub episode_id: Option<String>,
    pub collection_id: Option<String>,
    pub duration: Option<NumberRange>,
    pub source_from: Option<LoopSource>,
    /// Embed full series and episode details. Default `true`.
    pub full: bool,
    /// Maximum number of results. Default `30`.
    pub limit: u32,
}

impl Default for RandomLoopQuery {
    fn default() -> Self {
        Self {
            series_id: None,
            episode_id: None,
            collection_id: None,
            duration: None,
            source_from: None,
            full: true,
            limit: 30,
        }
    }
}

impl RandomLoopQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(ref id) = self.series_id {
            params.push(("seriesid", ParamValue::Text(id.clone())));
        }
        if let Some(ref id) = self.episode_id {
            params.push(("episodeid", ParamValue::Text(id.clone())));
        }
        if let Some(ref id) = self.collection_id {
            params.push(("collectionid", ParamValue::Text(id.clone())));
        }
        if let Some(range) = self.duration {
            params.push(("duration", ParamValue::Text(range.to_string())));
        }
        if let Some(source) = self.source_from {
            params.push(("source_from", ParamValue::Text(source.as_str().to_string())));
        }
        params.push(("full", ParamValue::Bool(self.full)));
        params.push(("limit", ParamValue::Int(self.limit)));
        params
    }
}

/// Filters for [`AnimeloopClient::episodes`](crate::AnimeloopClient::episodes).
#[derive(Debug, Clone)]
pub struct EpisodeQuery {
    /// Only episodes of this series.
    pub series_id: Option<String>,
    /// Episode number: `"01"`, `"Movie"`, `"OVA"`, …
    pub no: Option<String>,
    /// Embed full series details. Default `true`.
    pub full: bool,
    /// Results page. Default `1`.
    pub page: u32,
    /// Maximum number of results. Default `30`.
    pub limit: u32,
}

impl Default for EpisodeQuery {
    fn default() -> Self {
        Self {
            series_id: None,
            no: None,
            full: true,
            page: 1,
            limit: 30,
        }
    }
}

impl EpisodeQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(ref id) = self.series_id {
            params.push(("seriesid", ParamValue::Text(id.clone())));
        }
        if let Some(ref no) = self.no {
            params.push(("no", ParamValue::Text(no.clone())));
        }
        params.push(("full", ParamValue::Bool(self.full)));
        params.push(("page", ParamValue::Int(self.page)));
        params.push(("limit", ParamValue::Int(self.limit)));
        params
    }
}

/// Filters for [`AnimeloopClient::episode_count`](crate::AnimeloopClient::episode_count).
#[derive(Debug, Clone, Default)]
pub struct EpisodeCountQuery {
    pub series_id: Option<String>,
    pub no: Option<String>,
}

impl EpisodeCountQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(ref id) = self.series_id {
            params.push(("seriesid", ParamValue::Text(id.clone())));
        }
        if let Some(ref no) = self.no {
            params.push(("no", ParamValue::Text(no.clone())));
        }
        params
    }
}

/// Filters for [`AnimeloopClient::series`](crate::AnimeloopClient::series).
#[derive(Debug, Clone)]
pub struct SeriesQuery {
    pub kind: Option<SeriesKind>,
    /// Season label, e.g. `"2016-10"`.
    pub season: Option<String>,
    /// Results page. Default `1`.
    pub page: u32,
    /// Maximum number of results. Default `30`.
    pub limit: u32,
}

impl Default for SeriesQuery {
    fn default() -> Self {
        Self {
            kind: None,
            season: None,
            page: 1,
            limit: 30,
        }
    }
}

impl SeriesQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(kind) = self.kind {
            params.push(("type", ParamValue::Text(kind.as_str().to_string())));
        }
        if let Some(ref season) = self.season {
            params.push(("season", ParamValue::Text(season.clone())));
        }
        params.push(("page", ParamValue::Int(self.page)));
        params.push(("limit", ParamValue::Int(self.limit)));
        params
    }
}

/// Filters for [`AnimeloopClient::series_count`](crate::AnimeloopClient::series_count).
#[derive(Debug, Clone, Default)]
pub struct SeriesCountQuery {
    pub kind: Option<SeriesKind>,
    pub season: Option<String>,
}

impl SeriesCountQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(kind) = self.kind {
            params.push(("type", ParamValue::Text(kind.as_str().to_string())));
        }
        if let Some(ref season) = self.season {
            params.push(("season", ParamValue::Text(season.clone())));
        }
        params
    }
}

/// Filters for [`AnimeloopClient::tags`](crate::AnimeloopClient::tags).
#[derive(Debug, Clone)]
pub struct TagQuery {
    /// Only tags on this loop.
    pub loop_id: Option<String>,
    pub kind: Option<TagKind>,
    /// Tagging algorithm, e.g. `"illustration2vec"`.
    pub source: Option<String>,
    /// Only tags whose confidence falls in this range.
    pub confidence: Option<NumberRange>,
    /// Results page. Default `1`.
    pub page: u32,
    /// Maximum number of results. Default `30`.
    pub limit: u32,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self {
            loop_id: None,
            kind: None,
            source: None,
            confidence: None,
            page: 1,
            limit: 30,
        }
    }
}

impl TagQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = Vec::new();
        if let Some(ref id) = self.loop_id {
            params.push(("loopid", ParamValue::Text(id.clone())));
        }
        if let Some(kind) = self.kind {
            params.push(("type", ParamValue::Text(kind.as_str().to_string())));
        }
        if let Some(ref source) = self.source {
            params.push(("source", ParamValue::Text(source.clone())));
        }
        if let Some(range) = self.confidence {
            params.push(("confidence", ParamValue::Text(range.to_string())));
        }
        params.push(("page", ParamValue::Int(self.page)));
        params.push(("limit", ParamValue::Int(self.limit)));
        params
    }
}
