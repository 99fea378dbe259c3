use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::http_client::http_client;
use crate::model::{AffinityRecord, PlayerIdentity};

/// Result of a fetch once transport and decode errors have been absorbed at
/// the fetch boundary. `Failed` still reads as an empty list through
/// [`FetchOutcome::items`], but the view can tell it apart from "no data".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn from_result(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => FetchOutcome::Loaded(items),
            Err(err) => FetchOutcome::Failed(format!("{err:#}")),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            FetchOutcome::Loaded(items) => items,
            FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            FetchOutcome::Loaded(items) => items,
            FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchOutcome::Loaded(_) => None,
            FetchOutcome::Failed(err) => Some(err),
        }
    }
}

/// Joins `path` onto `base` with exactly one `/` between them.
pub fn endpoint_url(base: &str, path: &str) -> String {
    let mut url = base.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(path.strip_prefix('/').unwrap_or(path));
    url
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    timeout_secs: u64,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /summaries?steamids=a,b,c`
    pub fn fetch_summaries(&self, steam_ids: &[String]) -> FetchOutcome<PlayerIdentity> {
        FetchOutcome::from_result(
            self.get("summaries", &[("steamids", steam_ids.join(","))])
                .and_then(|body| parse_players_json(&body))
                .context("failed to get player summaries"),
        )
    }

    /// `GET /friends?steamid=<id>`: the friend list as identities.
    pub fn fetch_friends(&self, steam_id: &str) -> FetchOutcome<PlayerIdentity> {
        FetchOutcome::from_result(
            self.get("friends", &[("steamid", steam_id.to_string())])
                .and_then(|body| parse_players_json(&body))
                .context("failed to get friends list"),
        )
    }

    /// `GET /friends/ranking?steamid=<id>&listGames=true`
    pub fn fetch_ranking(&self, steam_id: &str) -> FetchOutcome<AffinityRecord> {
        FetchOutcome::from_result(
            self.get(
                "friends/ranking",
                &[
                    ("steamid", steam_id.to_string()),
                    ("listGames", "true".to_string()),
                ],
            )
            .and_then(|body| parse_ranking_json(&body))
            .context("failed to get affinity ranking"),
        )
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let client = http_client(self.timeout_secs)?;
        fetch_body(client, &endpoint_url(&self.base_url, path), query)
    }
}

fn fetch_body(client: &Client, url: &str, query: &[(&str, String)]) -> Result<String> {
    let resp = client.get(url).query(query).send().context("request failed")?;
    let status = resp.status();
    if status.as_u16() >= 400 {
        return Err(anyhow!("failed http request with status {status}"));
    }
    resp.text().context("failed reading body")
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    #[serde(default)]
    players: Option<Vec<PlayerIdentity>>,
}

#[derive(Debug, Deserialize)]
struct RankingResponse {
    #[serde(default)]
    ranking: Option<Vec<AffinityRecord>>,
}

/// Parses `{ "players": [...] }`. A missing or null list is empty.
pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerIdentity>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let resp: PlayersResponse = serde_json::from_str(trimmed).context("invalid players json")?;
    Ok(resp.players.unwrap_or_default())
}

/// Parses `{ "ranking": [...] }`. A missing or null list is empty.
pub fn parse_ranking_json(raw: &str) -> Result<Vec<AffinityRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let resp: RankingResponse = serde_json::from_str(trimmed).context("invalid ranking json")?;
    Ok(resp.ranking.unwrap_or_default())
}
