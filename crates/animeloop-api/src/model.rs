//! Public entity types for the Animeloop catalogue.
//!
//! Every field is optional: the API omits fields freely (notably on
//! `full=false` responses), and a mapped entity carries exactly what the
//! payload carried. Embedded values (`Episode::series`, `Loop::episode`,
//! `Loop::series`) are owned copies of the inline JSON, never shared
//! between sibling results.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A TV/OVA/Movie anime title ("bangumi"), the top-level catalogue entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub id: Option<String>,
    pub title: Option<String>,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub description: Option<String>,
    /// Genre labels in server order, empty entries dropped.
    pub genres: Option<Vec<String>>,
    /// `"TV"`, `"OVA"` or `"Movie"`.
    pub kind: Option<String>,
    pub total_episodes: Option<u32>,
    pub anilist_id: Option<u64>,
    /// Season label, e.g. `"2016-10"`.
    pub season: Option<String>,
    pub image_url_large: Option<String>,
}

/// One numbered installment of a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Episode {
    pub id: Option<String>,
    /// Episode number as served: `"01"`, `"Movie"`, `"OVA"`, …
    pub no: Option<String>,
    pub series_id: Option<String>,
    /// Present only on full-detail responses.
    pub series: Option<Series>,
}

/// A short looping clip cut from an episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Loop {
    pub id: Option<String>,
    /// Length in seconds. Derived from `period` when that pair is present,
    /// overriding any duration the API supplied alongside it.
    pub duration: Option<f64>,
    /// `[begin, end]` timestamps within the episode.
    pub period: Option<(NaiveTime, NaiveTime)>,
    /// `[begin, end]` frame indices within the episode.
    pub frame: Option<(i64, i64)>,
    /// `"automator"` or `"upload"`.
    pub source_from: Option<String>,
    pub upload_date: Option<NaiveDateTime>,
    pub files: Option<LoopFiles>,
    pub episode_id: Option<String>,
    pub series_id: Option<String>,
    /// Present only on full-detail responses.
    pub episode: Option<Episode>,
    /// Present only on full-detail responses.
    pub series: Option<Series>,
}

/// URLs of the rendered file variants of a loop. Variants the server has
/// not generated are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopFiles {
    pub jpg_360p: Option<String>,
    pub mp4_360p: Option<String>,
    pub gif_360p: Option<String>,
    pub jpg_720p: Option<String>,
    pub mp4_720p: Option<String>,
    pub jpg_1080p: Option<String>,
    pub mp4_1080p: Option<String>,
}

/// A classification label attached to a loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tag {
    pub id: Option<String>,
    pub confidence: Option<f64>,
    pub value: Option<String>,
    /// Tagging algorithm, e.g. `"illustration2vec"`.
    pub source: Option<String>,
    /// `"general"`, `"character"` or `"safe"`.
    pub kind: Option<String>,
    pub loop_id: Option<String>,
}
