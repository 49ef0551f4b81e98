//! Data model types for a BG Stats export.
//!
//! Only the fields the merge engine reads or rewrites are typed. Everything
//! else an export carries (durations, ranks, designers, board names, ...) is
//! kept in a passthrough map on each entity and written back untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields of an entity the merge does not interpret.
pub type Passthrough = Map<String, Value>;

// ── Export ──────────────────────────────────────────────────────────────────

/// The root document of one export file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub plays: Vec<Play>,
    #[serde(default)]
    pub challenges: Vec<Value>,
    #[serde(default)]
    pub user_info: UserInfo,
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Export {
    /// The player this export belongs to, per `userInfo.meRefId`.
    pub fn owner(&self) -> Option<&Player> {
        let id = self.user_info.me_ref_id?;
        self.player(id)
    }

    pub fn game(&self, id: u32) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn location(&self, id: u32) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// Identifies the owner of an export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me_ref_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_username: Option<String>,
    #[serde(flatten)]
    pub extra: Passthrough,
}

// ── Game ────────────────────────────────────────────────────────────────────

/// A game from the owner's collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: u32,
    /// BoardGameGeek id. `0` is used by the app for custom games.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_base_game: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_expansion: bool,
    #[serde(default)]
    pub copies: Vec<Value>,
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Game {
    /// The catalog key usable for cross-file matching, if the game has one.
    pub fn catalog_id(&self) -> Option<u64> {
        self.bgg_id.filter(|&id| id != 0)
    }
}

// ── Location ────────────────────────────────────────────────────────────────

/// A place where plays happen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: u32,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Passthrough,
}

// ── Player ──────────────────────────────────────────────────────────────────

/// A person who took part in plays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_username: Option<String>,
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Player {
    /// BGG username when set, otherwise the player's name.
    pub fn display_name(&self) -> &str {
        match self.bgg_username.as_deref() {
            Some(username) if !username.is_empty() => username,
            _ => &self.name,
        }
    }
}

// ── Play ────────────────────────────────────────────────────────────────────

/// One recorded play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    #[serde(default)]
    pub uuid: String,
    pub game_ref_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_ref_id: Option<u32>,
    #[serde(default)]
    pub play_date: String,
    #[serde(default)]
    pub player_scores: Vec<PlayerScore>,
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Play {
    /// The referenced location. The app writes `0` for "no location".
    pub fn location_id(&self) -> Option<u32> {
        self.location_ref_id.filter(|&id| id != 0)
    }

    /// Whether the given player took part in this play.
    pub fn has_player(&self, player_id: u32) -> bool {
        self.player_scores
            .iter()
            .any(|s| s.player_ref_id == player_id)
    }
}

/// A player's participation in a play.
///
/// `score` is kept as raw JSON: exports contain numbers, numeric strings,
/// formulas such as `"12+7+3"`, and empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub player_ref_id: u32,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub score: Value,
    #[serde(flatten)]
    pub extra: Passthrough,
}

/// Render a raw score for display.
pub fn score_text(score: &Value) -> String {
    match score {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accept booleans, 0/1 numbers, strings and null for the game flags.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    })
}
