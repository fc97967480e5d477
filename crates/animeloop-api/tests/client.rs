//! End-to-end tests against the in-process animeloop mock server.
//!
//! Starts the mock API on a random local port and drives every client
//! operation over real HTTP, so URL construction, envelope validation and
//! payload mapping are exercised together.

use animeloop_api::{
    AnimeloopClient, AnimeloopError, EpisodeCountQuery, EpisodeQuery, LoopCountQuery, LoopQuery,
    LoopSource, RandomLoopQuery, SeriesCountQuery, SeriesKind, SeriesQuery, TagKind, TagQuery,
};
use mock_server::{
    EPISODE_NEW_GAME_01, EPISODE_SHELTER, LOOP_NEW_GAME_A, SERIES_NEW_GAME, SERIES_SHELTER,
};
use url::Url;

async fn start_client() -> AnimeloopClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        mock_server::run(listener).await.expect("mock server");
    });

    AnimeloopClient::with_base_url(Url::parse(&format!("http://{addr}/")).expect("base url"))
}

#[tokio::test]
async fn loop_count_returns_count_field() {
    let client = start_client().await;

    let total = client.loop_count(&LoopCountQuery::default()).await.unwrap();
    assert_eq!(total, 5);

    let per_series = client
        .loop_count(&LoopCountQuery {
            series_id: Some(SERIES_NEW_GAME.to_string()),
            ..LoopCountQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(per_series, 3);

    let per_episode = client
        .loop_count(&LoopCountQuery {
            episode_id: Some(EPISODE_NEW_GAME_01.to_string()),
            ..LoopCountQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(per_episode, 2);
}

#[tokio::test]
async fn loop_by_id_derives_duration_from_period() {
    let client = start_client().await;

    let looped = client.loop_by_id(LOOP_NEW_GAME_A).await.unwrap();
    assert_eq!(looped.id.as_deref(), Some(LOOP_NEW_GAME_A));
    // The mock serves duration 99 next to a 1.5s period; the period wins.
    assert_eq!(looped.duration, Some(1.5));
    assert_eq!(looped.frame, Some((14436, 14472)));
    assert_eq!(looped.source_from.as_deref(), Some("automator"));
    assert!(looped.files.unwrap().gif_360p.is_some());
}

#[tokio::test]
async fn loop_by_id_unknown_is_api_error_with_server_message() {
    let client = start_client().await;

    let err = client
        .loop_by_id("000000000000000000000000")
        .await
        .unwrap_err();
    assert!(matches!(err, AnimeloopError::Api(_)));
    assert_eq!(err.to_string(), "Loop not found.");
}

#[tokio::test]
async fn loops_full_toggles_embedded_entities() {
    let client = start_client().await;

    let full = client
        .loops(&LoopQuery {
            episode_id: Some(EPISODE_NEW_GAME_01.to_string()),
            ..LoopQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(full.len(), 2);
    let embedded_series = full[0].series.as_ref().unwrap();
    assert_eq!(embedded_series.title.as_deref(), Some("NEW GAME!"));
    assert_eq!(full[0].episode.as_ref().unwrap().no.as_deref(), Some("01"));

    let bare = client
        .loops(&LoopQuery {
            episode_id: Some(EPISODE_NEW_GAME_01.to_string()),
            full: false,
            ..LoopQuery::default()
        })
        .await
        .unwrap();
    assert!(bare[0].series.is_none());
    assert!(bare[0].episode.is_none());
    assert_eq!(bare[0].episode_id.as_deref(), Some(EPISODE_NEW_GAME_01));
}

#[tokio::test]
async fn loops_unmatched_filter_is_no_results() {
    let client = start_client().await;

    let err = client
        .loops(&LoopQuery {
            series_id: Some("ffffffffffffffffffffffff".to_string()),
            ..LoopQuery::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AnimeloopError::NoResults));
    assert_eq!(err.to_string(), "no results found");
}

#[tokio::test]
async fn loops_filter_by_source() {
    let client = start_client().await;

    let uploads = client
        .loops(&LoopQuery {
            source_from: Some(LoopSource::Upload),
            ..LoopQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(uploads.len(), 2);
    assert!(uploads
        .iter()
        .all(|l| l.source_from.as_deref() == Some("upload")));
}

#[tokio::test]
async fn loops_limit_truncates() {
    let client = start_client().await;

    let limited = client
        .loops(&LoopQuery {
            limit: 2,
            ..LoopQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn random_loops_map_like_listing() {
    let client = start_client().await;

    let loops = client
        .random_loops(&RandomLoopQuery {
            series_id: Some(SERIES_SHELTER.to_string()),
            ..RandomLoopQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(loops.len(), 2);
    assert!(loops.iter().all(|l| l.duration == Some(1.5)));
}

#[tokio::test]
async fn episode_queries_round_trip() {
    let client = start_client().await;

    let episodes = client
        .episodes(&EpisodeQuery {
            series_id: Some(SERIES_NEW_GAME.to_string()),
            ..EpisodeQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(
        episodes[0].series.as_ref().unwrap().id.as_deref(),
        Some(SERIES_NEW_GAME)
    );

    let movie = client
        .episodes(&EpisodeQuery {
            no: Some("Movie".to_string()),
            ..EpisodeQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(movie[0].id.as_deref(), Some(EPISODE_SHELTER));

    let count = client
        .episode_count(&EpisodeCountQuery {
            series_id: Some(SERIES_NEW_GAME.to_string()),
            ..EpisodeCountQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(count, 2);

    let by_id = client.episode_by_id(EPISODE_SHELTER).await.unwrap();
    assert_eq!(by_id.no.as_deref(), Some("Movie"));
    assert_eq!(by_id.series_id.as_deref(), Some(SERIES_SHELTER));
}

#[tokio::test]
async fn series_queries_round_trip() {
    let client = start_client().await;

    let tv_only = client
        .series(&SeriesQuery {
            kind: Some(SeriesKind::Tv),
            ..SeriesQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(tv_only.len(), 1);
    assert_eq!(tv_only[0].kind.as_deref(), Some("TV"));

    let autumn = client
        .series_count(&SeriesCountQuery {
            season: Some("2016-10".to_string()),
            ..SeriesCountQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(autumn, 1);

    let shelter = client.series_by_id(SERIES_SHELTER).await.unwrap();
    assert_eq!(shelter.title.as_deref(), Some("Shelter"));
    assert_eq!(shelter.genres, Some(vec!["Music".to_string()]));
    assert_eq!(shelter.anilist_id, Some(21829));
}

#[tokio::test]
async fn search_series_matches_by_name() {
    let client = start_client().await;

    let hits = client.search_series("new game").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.as_deref(), Some(SERIES_NEW_GAME));

    let err = client.search_series("cowboy bebop").await.unwrap_err();
    assert!(matches!(err, AnimeloopError::NoResults));
}

#[tokio::test]
async fn tags_filter_by_loop_kind_and_confidence() {
    let client = start_client().await;

    let on_loop = client
        .tags(&TagQuery {
            loop_id: Some(LOOP_NEW_GAME_A.to_string()),
            ..TagQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(on_loop.len(), 2);

    let characters = client
        .tags(&TagQuery {
            loop_id: Some(LOOP_NEW_GAME_A.to_string()),
            kind: Some(TagKind::Character),
            ..TagQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].value.as_deref(), Some("suzukaze aoba"));

    let confident = client
        .tags(&TagQuery {
            confidence: Some(animeloop_api::NumberRange::new(0.85, 1.0)),
            ..TagQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(confident.len(), 2);
    assert!(confident.iter().all(|t| t.confidence.unwrap() >= 0.85));
}

#[tokio::test]
async fn unreachable_server_is_connection_error() {
    // Bind then drop to find a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        AnimeloopClient::with_base_url(Url::parse(&format!("http://{addr}/")).unwrap());
    let err = client.loop_count(&LoopCountQuery::default()).await.unwrap_err();
    assert!(matches!(err, AnimeloopError::Connection(_)));
    assert_eq!(err.to_string(), "cannot fetch JSON data");
}
