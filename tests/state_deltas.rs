use std::fs;
use std::path::PathBuf;

use steam_affinity::backend::{FetchOutcome, parse_players_json, parse_ranking_json};
use steam_affinity::config::Config;
use steam_affinity::provider::{RosterFetch, build_roster_delta};
use steam_affinity::selection::{CardState, GameList};
use steam_affinity::state::{AppState, Delta, RosterStatus, apply_delta};

const ME: &str = "76561197960287930";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_fetch() -> RosterFetch {
    RosterFetch {
        profile: FetchOutcome::Loaded(
            parse_players_json(&read_fixture("summaries.json")).expect("summaries"),
        ),
        ranking: FetchOutcome::Loaded(
            parse_ranking_json(&read_fixture("ranking.json")).expect("ranking"),
        ),
        friends: FetchOutcome::Loaded(
            parse_players_json(&read_fixture("friends.json")).expect("friends"),
        ),
    }
}

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    let generation = state.begin_load(ME);
    let (delta, _logs) = build_roster_delta(&Config::default(), generation, ME, fixture_fetch());
    apply_delta(&mut state, delta);
    state
}

#[test]
fn fixture_roster_loads_with_placeholder_for_unknown_friend() {
    let state = loaded_state();
    assert_eq!(state.status, RosterStatus::Loaded);
    assert_eq!(state.roster.len(), 3);
    assert_eq!(state.cards, vec![CardState::Collapsed; 3]);
    assert_eq!(
        state.profile.as_ref().map(|p| p.display_name.as_str()),
        Some("Gordon")
    );
    assert_eq!(state.roster[0].identity.display_name, "Alyx");
    assert_eq!(state.roster[1].identity.display_name, "Chell");
    assert!(state.roster[2].placeholder);
    assert!(state.logs.iter().any(|l| l.contains("without player summary")));
}

#[test]
fn stale_roster_is_discarded() {
    let mut state = AppState::new();
    let old = state.begin_load(ME);
    let (old_delta, _) = build_roster_delta(&Config::default(), old, ME, fixture_fetch());
    let current = state.begin_load("76561197960287999");
    assert_ne!(old, current);

    apply_delta(&mut state, old_delta);
    assert_eq!(state.status, RosterStatus::Loading);
    assert!(state.roster.is_empty());
    assert!(state.logs.iter().any(|l| l.contains("Discarded stale roster")));
}

#[test]
fn reload_resets_card_states() {
    let mut state = loaded_state();
    state.activate_selected();
    assert_eq!(state.card_state(0), CardState::ExpandedMatching);

    let generation = state.begin_load(ME);
    assert!(state.cards.is_empty());
    let (delta, _) = build_roster_delta(&Config::default(), generation, ME, fixture_fetch());
    apply_delta(&mut state, delta);
    assert_eq!(state.card_state(0), CardState::Collapsed);
}

#[test]
fn cards_toggle_independently() {
    let mut state = loaded_state();
    state.activate_selected();
    state.select_tab(GameList::Missing);
    state.select_next();
    state.activate_selected();

    assert_eq!(state.card_state(0), CardState::ExpandedMissing);
    assert_eq!(state.card_state(1), CardState::ExpandedMatching);
    assert_eq!(state.card_state(2), CardState::Collapsed);

    let names: Vec<&str> = state
        .displayed_games(0)
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    assert_eq!(names, vec!["Celeste", "Hades"]);
}

#[test]
fn empty_library_card_stays_collapsed() {
    let mut state = loaded_state();
    state.select_prev();
    assert_eq!(state.selected, 2);
    state.activate_selected();
    assert_eq!(state.card_state(2), CardState::Collapsed);
    assert!(state.displayed_games(2).is_empty());
    assert!(state.logs.iter().any(|l| l.contains("No library data")));
}

#[test]
fn matching_tab_lists_sorted_games() {
    let mut state = loaded_state();
    state.activate_selected();
    let names: Vec<&str> = state
        .displayed_games(0)
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    assert_eq!(names, vec!["Half-Life 2", "Portal", "Portal 2"]);
    state.cycle_tab();
    assert_eq!(state.card_state(0), CardState::ExpandedMissing);
}

#[test]
fn failed_ranking_is_distinct_from_empty() {
    let mut state = AppState::new();
    let generation = state.begin_load(ME);
    let fetched = RosterFetch {
        profile: FetchOutcome::Loaded(Vec::new()),
        ranking: FetchOutcome::Failed("failed to get affinity ranking: request failed".to_string()),
        friends: FetchOutcome::Loaded(Vec::new()),
    };
    let (delta, logs) = build_roster_delta(&Config::default(), generation, ME, fetched);
    assert!(logs.iter().any(|l| l.starts_with("[WARN] failed to get affinity ranking")));
    apply_delta(&mut state, delta);

    assert!(matches!(state.status, RosterStatus::Failed(_)));
    let message = state.empty_roster_message().expect("empty roster");
    assert!(message.starts_with("Could not load friends"));
    assert!(state.profile.is_none());

    let generation = state.begin_load(ME);
    let fetched = RosterFetch {
        profile: FetchOutcome::Loaded(Vec::new()),
        ranking: FetchOutcome::Loaded(Vec::new()),
        friends: FetchOutcome::Loaded(Vec::new()),
    };
    let (delta, _) = build_roster_delta(&Config::default(), generation, ME, fetched);
    apply_delta(&mut state, delta);
    assert_eq!(state.empty_roster_message().as_deref(), Some("No friends found"));
}

#[test]
fn unsorted_ranking_is_flagged_and_optionally_resorted() {
    let mut ranking = parse_ranking_json(&read_fixture("ranking.json")).expect("ranking");
    ranking.reverse();
    let fetch = |ranking: Vec<_>| RosterFetch {
        profile: FetchOutcome::Loaded(Vec::new()),
        ranking: FetchOutcome::Loaded(ranking),
        friends: FetchOutcome::Loaded(Vec::new()),
    };

    let (delta, logs) = build_roster_delta(&Config::default(), 1, ME, fetch(ranking.clone()));
    assert!(logs.iter().any(|l| l.contains("not sorted")));
    let Delta::SetRoster { entries, .. } = delta else {
        panic!("expected roster delta");
    };
    assert_eq!(entries[0].steam_id(), "76561197960287933");

    let config = Config {
        resort_ranking: true,
        ..Config::default()
    };
    let (delta, _) = build_roster_delta(&config, 1, ME, fetch(ranking));
    let Delta::SetRoster { entries, .. } = delta else {
        panic!("expected roster delta");
    };
    assert_eq!(entries[0].steam_id(), "76561197960287931");
    assert_eq!(entries[2].steam_id(), "76561197960287933");
}
