use serde::{Deserialize, Deserializer, Serialize};

const STORE_APP_URL: &str = "https://store.steampowered.com/app";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    #[serde(rename = "personaname", default)]
    pub display_name: String,
    #[serde(
        rename = "communityvisibilitystate",
        alias = "communityvisibilityState",
        default
    )]
    pub visibility_state: i32,
    #[serde(rename = "avatar", default)]
    pub avatar_small_url: String,
    #[serde(rename = "avatarmedium", default)]
    pub avatar_medium_url: String,
    #[serde(rename = "avatarfull", default)]
    pub avatar_full_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "appid")]
    pub app_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "img_icon_url", default)]
    pub icon_url: String,
}

impl Game {
    pub fn store_url(&self) -> String {
        format!("{STORE_APP_URL}/{}/", self.app_id)
    }
}

/// One ranked (source, target) friend pair as computed by the backend.
///
/// Game lists are only present when the ranking was requested with
/// `listGames=true`; absent or `null` lists decode as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityRecord {
    #[serde(rename = "player1ID")]
    pub source_player_id: String,
    #[serde(rename = "player2ID")]
    pub target_player_id: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub affinity: f64,
    #[serde(rename = "player1Ratio", default)]
    pub source_ownership_ratio: f64,
    #[serde(rename = "player2Ratio", default)]
    pub target_ownership_ratio: f64,
    #[serde(rename = "matches", default)]
    pub match_count: u32,
    #[serde(rename = "player2GamesCount", default)]
    pub target_library_size: u32,
    #[serde(rename = "matching_games", default, deserialize_with = "null_as_empty")]
    pub matching_games: Vec<Game>,
    #[serde(rename = "player2OnlyGames", default, deserialize_with = "null_as_empty")]
    pub target_only_games: Vec<Game>,
}

impl AffinityRecord {
    /// `false` when the backend had no library data for the friend.
    pub fn has_library(&self) -> bool {
        self.target_library_size > 0
    }

    pub fn target_owned_percent(&self) -> f64 {
        self.target_ownership_ratio * 100.0
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
