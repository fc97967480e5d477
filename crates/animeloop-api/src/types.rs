//! Wire-format types: the response envelope and the entity payloads, plus
//! their conversions into the public models.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AnimeloopError;
use crate::model::{Episode, Loop, LoopFiles, Series, Tag};

// ── Response envelope ────────────────────────────────────────────

/// The outer object wrapping every API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    pub status: String,
    pub code: i64,
    pub message: Option<String>,
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// Validate the envelope and surrender its payload.
    ///
    /// Failure envelopes carry the server `message` verbatim when present,
    /// otherwise `Error {code}`. A success envelope whose `data` is an empty
    /// array (or missing entirely) matched nothing; an object payload such
    /// as `{"count": 0}` is a valid result.
    pub fn into_data(self) -> Result<Value, AnimeloopError> {
        if self.status != "success" || self.code != 200 {
            let message = self
                .message
                .unwrap_or_else(|| format!("Error {}", self.code));
            return Err(AnimeloopError::Api(message));
        }
        match self.data {
            Some(Value::Array(items)) if items.is_empty() => Err(AnimeloopError::NoResults),
            Some(data) => Ok(data),
            None => Err(AnimeloopError::NoResults),
        }
    }
}

/// `data` payload of the `*/count` endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct CountPayload {
    pub count: u64,
}

// ── Entity payloads ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeriesPayload {
    pub id: Option<String>,
    pub title: Option<String>,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub description: Option<String>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub total_episodes: Option<u32>,
    pub anilist_id: Option<u64>,
    pub season: Option<String>,
    pub image_url_large: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EpisodePayload {
    pub id: Option<String>,
    pub no: Option<String>,
    #[serde(rename = "seriesid")]
    pub series_id: Option<String>,
    pub series: Option<SeriesPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoopPayload {
    pub id: Option<String>,
    pub duration: Option<f64>,
    pub period: Option<PeriodPayload>,
    pub frame: Option<FramePayload>,
    #[serde(rename = "sourceFrom")]
    pub source_from: Option<String>,
    #[serde(rename = "uploadDate")]
    pub upload_date: Option<String>,
    pub files: Option<LoopFiles>,
    #[serde(rename = "episodeid")]
    pub episode_id: Option<String>,
    #[serde(rename = "seriesid")]
    pub series_id: Option<String>,
    pub episode: Option<EpisodePayload>,
    pub series: Option<SeriesPayload>,
}

/// `begin`/`end` are required once the outer key is present; a missing half
/// is a malformed payload, not a partial entity.
#[derive(Debug, Deserialize)]
pub(crate) struct PeriodPayload {
    pub begin: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FramePayload {
    pub begin: i64,
    pub end: i64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TagPayload {
    pub id: Option<String>,
    pub confidence: Option<f64>,
    pub value: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "loopid")]
    pub loop_id: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

/// Fractional-second timecode, tried first: `00:00:01.500`.
const PERIOD_FRACTIONAL: &str = "%H:%M:%S%.f";
/// Whole-second fallback: `00:00:01`.
const PERIOD_WHOLE: &str = "%H:%M:%S";
/// Upload timestamps are millisecond-precision UTC: `2017-01-09T01:32:19.000Z`.
const UPLOAD_DATE: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn parse_timecode(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, PERIOD_FRACTIONAL)
        .or_else(|_| NaiveTime::parse_from_str(raw, PERIOD_WHOLE))
}

impl SeriesPayload {
    pub fn into_model(self) -> Series {
        Series {
            id: self.id,
            title: self.title,
            title_romaji: self.title_romaji,
            title_english: self.title_english,
            title_japanese: self.title_japanese,
            description: self.description,
            genres: self
                .genres
                .map(|genres| genres.into_iter().filter(|g| !g.is_empty()).collect()),
            kind: self.kind,
            total_episodes: self.total_episodes,
            anilist_id: self.anilist_id,
            season: self.season,
            image_url_large: self.image_url_large,
        }
    }
}

impl EpisodePayload {
    pub fn into_model(self) -> Episode {
        Episode {
            id: self.id,
            no: self.no,
            series_id: self.series_id,
            series: self.series.map(SeriesPayload::into_model),
        }
    }
}

impl LoopPayload {
    pub fn into_model(self) -> Result<Loop, AnimeloopError> {
        let mut duration = self.duration;
        let period = match self.period {
            Some(p) => {
                let begin = parse_timecode(&p.begin)?;
                let end = parse_timecode(&p.end)?;
                // The period pair is authoritative: derive the duration from
                // it even when the API also sent one.
                let span = end.signed_duration_since(begin);
                duration = Some(span.num_microseconds().unwrap_or_default() as f64 / 1e6);
                Some((begin, end))
            }
            None => None,
        };
        let upload_date = match self.upload_date {
            Some(raw) => Some(NaiveDateTime::parse_from_str(&raw, UPLOAD_DATE)?),
            None => None,
        };

        Ok(Loop {
            id: self.id,
            duration,
            period,
            frame: self.frame.map(|f| (f.begin, f.end)),
            source_from: self.source_from,
            upload_date,
            files: self.files,
            episode_id: self.episode_id,
            series_id: self.series_id,
            episode: self.episode.map(EpisodePayload::into_model),
            series: self.series.map(SeriesPayload::into_model),
        })
    }
}

impl TagPayload {
    pub fn into_model(self) -> Tag {
        Tag {
            id: self.id,
            confidence: self.confidence,
            value: self.value,
            source: self.source,
            kind: self.kind,
            loop_id: self.loop_id,
        }
    }
}
