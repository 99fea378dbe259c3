use std::cmp::Ordering;
use std::collections::HashMap;

use crate::boundaries::{BoundaryPolicy, compute_boundaries_with_policy};
use crate::color::{Color, Palette};
use crate::model::{AffinityRecord, PlayerIdentity};

pub const PLACEHOLDER_NAME: &str = "Unknown player";
pub const PLACEHOLDER_AVATAR: &str = "";

/// A ranked friend ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub identity: PlayerIdentity,
    pub record: AffinityRecord,
    pub color: Color,
    /// `true` when no identity came back for the friend and `identity` is a
    /// placeholder.
    pub placeholder: bool,
}

impl RosterEntry {
    pub fn steam_id(&self) -> &str {
        &self.record.target_player_id
    }
}

pub fn placeholder_identity(steam_id: &str) -> PlayerIdentity {
    PlayerIdentity {
        steam_id: steam_id.to_string(),
        display_name: PLACEHOLDER_NAME.to_string(),
        visibility_state: 0,
        avatar_small_url: PLACEHOLDER_AVATAR.to_string(),
        avatar_medium_url: PLACEHOLDER_AVATAR.to_string(),
        avatar_full_url: PLACEHOLDER_AVATAR.to_string(),
    }
}

/// Identity lists arrive in any order; later duplicates win.
pub fn index_identities(players: Vec<PlayerIdentity>) -> HashMap<String, PlayerIdentity> {
    players
        .into_iter()
        .map(|p| (p.steam_id.clone(), p))
        .collect()
}

/// Joins ranked records with identities. Output order is exactly the input
/// order and every record yields one entry.
pub fn assemble(
    records: Vec<AffinityRecord>,
    identities: &HashMap<String, PlayerIdentity>,
    palette: Palette,
    policy: BoundaryPolicy,
) -> Vec<RosterEntry> {
    let boundaries = compute_boundaries_with_policy(&records, policy);

    records
        .into_iter()
        .map(|record| {
            let (identity, placeholder) = match identities.get(&record.target_player_id) {
                Some(identity) => (identity.clone(), false),
                None => (placeholder_identity(&record.target_player_id), true),
            };
            let color = match boundaries {
                Some(b) => palette.color_at(record.affinity, b),
                None => palette.high,
            };
            RosterEntry {
                identity,
                record,
                color,
                placeholder,
            }
        })
        .collect()
}

pub fn is_ranked_descending(records: &[AffinityRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].affinity.total_cmp(&pair[1].affinity) != Ordering::Less)
}

/// Stable descending sort by affinity; ties keep their incoming order.
pub fn sort_by_affinity_desc(records: &mut [AffinityRecord]) {
    records.sort_by(|a, b| b.affinity.total_cmp(&a.affinity));
}
