use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::backend::FetchOutcome;
use crate::model::{AffinityRecord, Game, PlayerIdentity};
use crate::provider::RosterFetch;
use crate::roster::sort_by_affinity_desc;

const DEMO_FRIENDS: [&str; 8] = [
    "Gordon", "Alyx", "Chell", "Wheatley", "Zagreus", "Madeline", "Isaac", "Hornet",
];

static CATALOG: Lazy<Vec<Game>> = Lazy::new(|| {
    [
        (220, "Half-Life 2"),
        (400, "Portal"),
        (620, "Portal 2"),
        (1145360, "Hades"),
        (504230, "Celeste"),
        (250900, "The Binding of Isaac: Rebirth"),
        (367520, "Hollow Knight"),
        (413150, "Stardew Valley"),
        (105600, "Terraria"),
        (646570, "Slay the Spire"),
        (570, "Dota 2"),
        (730, "Counter-Strike 2"),
        (292030, "The Witcher 3: Wild Hunt"),
        (1086940, "Baldur's Gate 3"),
        (588650, "Dead Cells"),
        (753640, "Outer Wilds"),
    ]
    .into_iter()
    .map(|(app_id, name)| Game {
        app_id,
        name: name.to_string(),
        icon_url: String::new(),
    })
    .collect()
});

/// Synthetic roster for running without a backend. The second-to-last friend
/// has no summary and the last one has an empty library.
pub fn demo_fetch(steam_id: &str) -> RosterFetch {
    let mut rng = rand::thread_rng();

    let mut own = CATALOG.clone();
    own.shuffle(&mut rng);
    own.truncate(rng.gen_range(6..=12));

    let mut ranking = Vec::new();
    let mut friends = Vec::new();
    for (idx, name) in DEMO_FRIENDS.iter().enumerate() {
        let friend_id = format!("{steam_id}{idx:02}");
        let empty_library = idx == DEMO_FRIENDS.len() - 1;

        let mut theirs = CATALOG.clone();
        theirs.shuffle(&mut rng);
        if empty_library {
            theirs.clear();
        } else {
            theirs.truncate(rng.gen_range(3..=14));
        }
        ranking.push(demo_record(steam_id, &friend_id, &own, theirs, &mut rng));

        if idx != DEMO_FRIENDS.len() - 2 {
            friends.push(demo_identity(&friend_id, name));
        }
    }
    sort_by_affinity_desc(&mut ranking);

    RosterFetch {
        profile: FetchOutcome::Loaded(vec![demo_identity(steam_id, "You")]),
        ranking: FetchOutcome::Loaded(ranking),
        friends: FetchOutcome::Loaded(friends),
    }
}

fn demo_record(
    source: &str,
    target: &str,
    own: &[Game],
    theirs: Vec<Game>,
    rng: &mut impl Rng,
) -> AffinityRecord {
    let (matching, missing): (Vec<Game>, Vec<Game>) =
        theirs.iter().cloned().partition(|g| own.contains(g));
    let library = theirs.len() as u32;
    let (similarity, weight) = if library == 0 {
        (0.0, 0.0)
    } else {
        (rng.gen_range(0.0..0.5), rng.gen_range(1.0..40.0))
    };
    let matches = matching.len();
    let ratio = |n: usize| if n == 0 { 0.0 } else { matches as f64 / n as f64 };
    AffinityRecord {
        source_player_id: source.to_string(),
        target_player_id: target.to_string(),
        similarity,
        weight,
        affinity: similarity * weight,
        source_ownership_ratio: ratio(own.len()),
        target_ownership_ratio: ratio(theirs.len()),
        match_count: matches as u32,
        target_library_size: library,
        matching_games: matching,
        target_only_games: missing,
    }
}

fn demo_identity(steam_id: &str, name: &str) -> PlayerIdentity {
    PlayerIdentity {
        steam_id: steam_id.to_string(),
        display_name: name.to_string(),
        visibility_state: 3,
        avatar_small_url: String::new(),
        avatar_medium_url: String::new(),
        avatar_full_url: String::new(),
    }
}
