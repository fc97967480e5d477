//! Client library for the [animeloop.org](https://animeloop.org) REST API.
//!
//! Animeloop catalogues short looping clips ("loops") cut from anime
//! episodes, together with their episodes, series metadata and descriptive
//! tags. This crate wraps the v2 JSON API: one async method per endpoint,
//! typed filters, and typed failures.
//!
//! ```no_run
//! use animeloop_api::{AnimeloopClient, AnimeloopError, LoopQuery, NumberRange};
//!
//! # async fn demo() -> Result<(), AnimeloopError> {
//! let client = AnimeloopClient::new();
//! let loops = client
//!     .loops(&LoopQuery {
//!         series_id: Some("5842a485b1744e3a9f227a33".to_string()),
//!         duration: Some(NumberRange::new(1.0, 2.0)),
//!         ..LoopQuery::default()
//!     })
//!     .await?;
//! for l in &loops {
//!     println!("{:?} {:?}", l.id, l.duration);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod query;
mod types;

pub use client::AnimeloopClient;
pub use error::AnimeloopError;
pub use model::{Episode, Loop, LoopFiles, Series, Tag};
pub use query::{
    EpisodeCountQuery, EpisodeQuery, LoopCountQuery, LoopQuery, LoopSource, NumberRange,
    RandomLoopQuery, SeriesCountQuery, SeriesKind, SeriesQuery, TagKind, TagQuery,
};
