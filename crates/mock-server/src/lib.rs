//! In-process stand-in for the animeloop.org v2 API.
//!
//! Serves a small fixed catalogue (two series, three episodes, five loops,
//! three tags) behind the real endpoint surface: envelope wrapping, id
//! lookups, list filtering, count endpoints, name search and `full=true`
//! embedding. Integration tests point an `AnimeloopClient` at a random
//! local port running this router.

use std::collections::HashMap;

use axum::{extract::Query, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub fn app() -> Router {
    Router::new()
        .route("/loop", get(loop_index))
        .route("/loop/count", get(loop_count))
        .route("/rand/loop", get(rand_loop_index))
        .route("/episode", get(episode_index))
        .route("/episode/count", get(episode_count))
        .route("/series", get(series_index))
        .route("/series/count", get(series_count))
        .route("/search/series", get(search_series))
        .route("/tag", get(tag_index))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ── Envelope helpers ─────────────────────────────────────────────

fn success(data: Value) -> Json<Value> {
    Json(json!({"status": "success", "code": 200, "data": data}))
}

fn not_found(message: &str) -> Json<Value> {
    Json(json!({"status": "error", "code": 404, "message": message}))
}

// ── Fixed catalogue ──────────────────────────────────────────────

pub const SERIES_NEW_GAME: &str = "5842a485b1744e3a9f227a33";
pub const SERIES_SHELTER: &str = "57e76fc2e0bb0e7e69ecacbd";
pub const EPISODE_NEW_GAME_01: &str = "5842a485b1744e3a9f227a34";
pub const EPISODE_NEW_GAME_02: &str = "5843b123b1744e3a9f22aa01";
pub const EPISODE_SHELTER: &str = "57e7706fe0bb0e7e69ecacbe";
pub const LOOP_NEW_GAME_A: &str = "5842a485b1744e3a9f227a35";

fn series_data() -> Vec<Value> {
    vec![
        json!({
            "id": SERIES_NEW_GAME,
            "title": "NEW GAME!",
            "title_romaji": "New Game!",
            "title_english": "New Game!",
            "title_japanese": "ニューゲーム!",
            "description": "Aoba joins the game studio behind her favorite childhood game.",
            "genres": ["Comedy", "Slice of Life"],
            "type": "TV",
            "total_episodes": 12,
            "anilist_id": 21455,
            "season": "2016-07",
            "image_url_large": "https://animeloop.org/files/cover/21455.jpg"
        }),
        json!({
            "id": SERIES_SHELTER,
            "title": "Shelter",
            "title_romaji": "Shelter",
            "title_english": "Shelter",
            "title_japanese": "シェルター",
            "description": "Rin lives alone inside a simulation.",
            "genres": ["Music"],
            "type": "Movie",
            "total_episodes": 1,
            "anilist_id": 21829,
            "season": "2016-10",
            "image_url_large": "https://animeloop.org/files/cover/21829.jpg"
        }),
    ]
}

fn episode_data() -> Vec<Value> {
    let series = series_data();
    vec![
        json!({
            "id": EPISODE_NEW_GAME_01,
            "no": "01",
            "seriesid": SERIES_NEW_GAME,
            "series": series[0]
        }),
        json!({
            "id": EPISODE_NEW_GAME_02,
            "no": "02",
            "seriesid": SERIES_NEW_GAME,
            "series": series[0]
        }),
        json!({
            "id": EPISODE_SHELTER,
            "no": "Movie",
            "seriesid": SERIES_SHELTER,
            "series": series[1]
        }),
    ]
}

fn loop_data() -> Vec<Value> {
    let series = series_data();
    let episodes = episode_data();
    vec![
        json!({
            "id": LOOP_NEW_GAME_A,
            // Deliberately wrong: the period below is authoritative and a
            // client must derive 1.5 seconds from it.
            "duration": 99,
            "period": {"begin": "00:10:01.500", "end": "00:10:03.000"},
            "frame": {"begin": 14436, "end": 14472},
            "sourceFrom": "automator",
            "uploadDate": "2017-01-09T01:32:19.000Z",
            "files": {
                "jpg_360p": "https://animeloop.org/files/jpg_360p/5842a485b1744e3a9f227a35.jpg",
                "mp4_360p": "https://animeloop.org/files/mp4_360p/5842a485b1744e3a9f227a35.mp4",
                "gif_360p": "https://animeloop.org/files/gif_360p/5842a485b1744e3a9f227a35.gif",
                "mp4_1080p": "https://animeloop.org/files/mp4_1080p/5842a485b1744e3a9f227a35.mp4"
            },
            "episodeid": EPISODE_NEW_GAME_01,
            "seriesid": SERIES_NEW_GAME,
            "episode": episodes[0],
            "series": series[0]
        }),
        json!({
            "id": "5842a486b1744e3a9f227a38",
            "period": {"begin": "00:02:11.000", "end": "00:02:12.250"},
            "frame": {"begin": 3144, "end": 3174},
            "sourceFrom": "automator",
            "uploadDate": "2017-01-09T01:32:20.000Z",
            "episodeid": EPISODE_NEW_GAME_01,
            "seriesid": SERIES_NEW_GAME,
            "episode": episodes[0],
            "series": series[0]
        }),
        json!({
            "id": "5843b200b1744e3a9f22aa10",
            "period": {"begin": "00:05:00", "end": "00:05:02"},
            "sourceFrom": "upload",
            "uploadDate": "2017-02-14T08:05:44.000Z",
            "episodeid": EPISODE_NEW_GAME_02,
            "seriesid": SERIES_NEW_GAME,
            "episode": episodes[1],
            "series": series[0]
        }),
        json!({
            "id": "57e77070e0bb0e7e69ecacc1",
            "period": {"begin": "00:01:30.500", "end": "00:01:32.000"},
            "sourceFrom": "automator",
            "uploadDate": "2016-10-18T12:00:01.000Z",
            "episodeid": EPISODE_SHELTER,
            "seriesid": SERIES_SHELTER,
            "episode": episodes[2],
            "series": series[1]
        }),
        json!({
            "id": "57e77071e0bb0e7e69ecacc4",
            "period": {"begin": "00:03:10.000", "end": "00:03:11.500"},
            "sourceFrom": "upload",
            "uploadDate": "2016-10-18T12:00:02.000Z",
            "episodeid": EPISODE_SHELTER,
            "seriesid": SERIES_SHELTER,
            "episode": episodes[2],
            "series": series[1]
        }),
    ]
}

fn tag_data() -> Vec<Value> {
    vec![
        json!({
            "id": "58786a41e0d6a2c45c6d268e",
            "confidence": 0.9,
            "value": "1girl",
            "source": "illustration2vec",
            "type": "general",
            "loopid": LOOP_NEW_GAME_A
        }),
        json!({
            "id": "58786a41e0d6a2c45c6d268f",
            "confidence": 0.62,
            "value": "suzukaze aoba",
            "source": "illustration2vec",
            "type": "character",
            "loopid": LOOP_NEW_GAME_A
        }),
        json!({
            "id": "58786a42e0d6a2c45c6d2690",
            "confidence": 0.97,
            "value": "safe",
            "source": "illustration2vec",
            "type": "safe",
            "loopid": "5842a486b1744e3a9f227a38"
        }),
    ]
}

// ── Filtering helpers ────────────────────────────────────────────

fn field_eq(item: &Value, field: &str, expected: &str) -> bool {
    item[field].as_str() == Some(expected)
}

/// Keep `item` when `param` is absent or matches `field`.
fn passes(item: &Value, params: &HashMap<String, String>, param: &str, field: &str) -> bool {
    match params.get(param) {
        Some(expected) => field_eq(item, field, expected),
        None => true,
    }
}

fn within_range(item: &Value, params: &HashMap<String, String>, param: &str, field: &str) -> bool {
    let Some(raw) = params.get(param) else {
        return true;
    };
    let (Some((min, max)), Some(value)) = (
        raw.split_once(',')
            .and_then(|(a, b)| Some((a.parse::<f64>().ok()?, b.parse::<f64>().ok()?))),
        item[field].as_f64(),
    ) else {
        return false;
    };
    min <= value && value <= max
}

fn full_requested(params: &HashMap<String, String>) -> bool {
    params.get("full").map(String::as_str) == Some("true")
}

fn strip_embeds(mut item: Value, keys: &[&str]) -> Value {
    if let Some(map) = item.as_object_mut() {
        for key in keys {
            map.remove(*key);
        }
    }
    item
}

fn truncate(items: Vec<Value>, params: &HashMap<String, String>) -> Vec<Value> {
    let limit = params
        .get("limit")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    items.into_iter().take(limit).collect()
}

fn filter_loops(params: &HashMap<String, String>) -> Vec<Value> {
    loop_data()
        .into_iter()
        .filter(|l| passes(l, params, "seriesid", "seriesid"))
        .filter(|l| passes(l, params, "episodeid", "episodeid"))
        .filter(|l| passes(l, params, "collectionid", "collectionid"))
        .filter(|l| passes(l, params, "source_from", "sourceFrom"))
        .collect()
}

fn filter_episodes(params: &HashMap<String, String>) -> Vec<Value> {
    episode_data()
        .into_iter()
        .filter(|e| passes(e, params, "seriesid", "seriesid"))
        .filter(|e| passes(e, params, "no", "no"))
        .collect()
}

fn filter_series(params: &HashMap<String, String>) -> Vec<Value> {
    series_data()
        .into_iter()
        .filter(|s| passes(s, params, "type", "type"))
        .filter(|s| passes(s, params, "season", "season"))
        .collect()
}

// ── Handlers ─────────────────────────────────────────────────────

async fn loop_index(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if let Some(id) = params.get("id") {
        return match loop_data().into_iter().find(|l| field_eq(l, "id", id)) {
            Some(found) => success(strip_embeds(found, &["episode", "series"])),
            None => not_found("Loop not found."),
        };
    }

    let mut loops = filter_loops(&params);
    if !full_requested(&params) {
        loops = loops
            .into_iter()
            .map(|l| strip_embeds(l, &["episode", "series"]))
            .collect();
    }
    success(Value::Array(truncate(loops, &params)))
}

async fn loop_count(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    success(json!({"count": filter_loops(&params).len()}))
}

async fn rand_loop_index(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    // Same selection as /loop; "random" order is the server's business and
    // a fixed order keeps tests deterministic.
    loop_index(Query(params)).await
}

async fn episode_index(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if let Some(id) = params.get("id") {
        return match episode_data().into_iter().find(|e| field_eq(e, "id", id)) {
            Some(found) => success(strip_embeds(found, &["series"])),
            None => not_found("Episode not found."),
        };
    }

    let mut episodes = filter_episodes(&params);
    if !full_requested(&params) {
        episodes = episodes
            .into_iter()
            .map(|e| strip_embeds(e, &["series"]))
            .collect();
    }
    success(Value::Array(truncate(episodes, &params)))
}

async fn episode_count(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    success(json!({"count": filter_episodes(&params).len()}))
}

async fn series_index(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if let Some(id) = params.get("id") {
        return match series_data().into_iter().find(|s| field_eq(s, "id", id)) {
            Some(found) => success(found),
            None => not_found("Series not found."),
        };
    }

    success(Value::Array(truncate(filter_series(&params), &params)))
}

async fn series_count(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    success(json!({"count": filter_series(&params).len()}))
}

async fn search_series(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let needle = params.get("value").cloned().unwrap_or_default().to_lowercase();
    let hits: Vec<Value> = series_data()
        .into_iter()
        .filter(|s| {
            ["title", "title_romaji", "title_english"].iter().any(|field| {
                s[*field]
                    .as_str()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
        })
        .collect();
    success(Value::Array(hits))
}

async fn tag_index(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let tags: Vec<Value> = tag_data()
        .into_iter()
        .filter(|t| passes(t, &params, "loopid", "loopid"))
        .filter(|t| passes(t, &params, "type", "type"))
        .filter(|t| passes(t, &params, "source", "source"))
        .filter(|t| within_range(t, &params, "confidence", "confidence"))
        .collect();
    success(Value::Array(truncate(tags, &params)))
}
