use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::backend::{BackendClient, FetchOutcome};
use crate::config::{Config, RosterSource};
use crate::demo_feed;
use crate::model::{AffinityRecord, PlayerIdentity};
use crate::roster::{assemble, index_identities, is_ranked_descending, sort_by_affinity_desc};
use crate::state::{Delta, ProviderCommand};

/// Everything one roster load fetched, before assembly.
#[derive(Debug, Clone)]
pub struct RosterFetch {
    pub profile: FetchOutcome<PlayerIdentity>,
    pub ranking: FetchOutcome<AffinityRecord>,
    pub friends: FetchOutcome<PlayerIdentity>,
}

pub fn spawn_provider(config: Config, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let backend = BackendClient::new(config.api_url.clone(), config.http_timeout_secs);

        while let Ok(cmd) = cmd_rx.recv() {
            // Only the newest queued request matters; older ones would be
            // discarded by generation anyway.
            let mut latest = cmd;
            while let Ok(next) = cmd_rx.try_recv() {
                latest = next;
            }

            match latest {
                ProviderCommand::LoadRoster {
                    steam_id,
                    generation,
                } => {
                    let fetched = match config.source {
                        RosterSource::Backend => fetch_from_backend(&backend, &steam_id, &tx),
                        RosterSource::Demo => Some(demo_feed::demo_fetch(&steam_id)),
                    };
                    let Some(fetched) = fetched else {
                        return;
                    };
                    let (delta, logs) = build_roster_delta(&config, generation, &steam_id, fetched);
                    for msg in logs {
                        let _ = tx.send(Delta::Log(msg));
                    }
                    if tx.send(delta).is_err() {
                        return;
                    }
                }
            }
        }
    });
}

/// Ranking and identities are independent, so both go out at once; the
/// profile summary rides alongside the friend list. `None` when the UI side
/// of `tx` is gone, before any request is made.
pub fn fetch_from_backend(
    backend: &BackendClient,
    steam_id: &str,
    tx: &Sender<Delta>,
) -> Option<RosterFetch> {
    tx.send(Delta::Log(format!(
        "[INFO] Fetching ranking for {steam_id} from {}",
        backend.base_url()
    )))
    .ok()?;
    let (ranking, (friends, profile)) = rayon::join(
        || backend.fetch_ranking(steam_id),
        || {
            rayon::join(
                || backend.fetch_friends(steam_id),
                || backend.fetch_summaries(&[steam_id.to_string()]),
            )
        },
    );

    // Second chance for identities: ask for the ranked ids directly.
    let retry_ids = match (&friends, &ranking) {
        (FetchOutcome::Failed(err), FetchOutcome::Loaded(records)) if !records.is_empty() => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] {err}; retrying with player summaries"
            )));
            Some(
                records
                    .iter()
                    .map(|r| r.target_player_id.clone())
                    .collect::<Vec<_>>(),
            )
        }
        _ => None,
    };
    let friends = match retry_ids {
        Some(ids) => backend.fetch_summaries(&ids),
        None => friends,
    };

    Some(RosterFetch {
        profile,
        ranking,
        friends,
    })
}

/// Join point of a load: applies the ordering fallback, assembles the roster
/// and reports what went wrong along the way.
pub fn build_roster_delta(
    config: &Config,
    generation: u64,
    steam_id: &str,
    fetched: RosterFetch,
) -> (Delta, Vec<String>) {
    let mut logs = Vec::new();
    let RosterFetch {
        profile,
        ranking,
        friends,
    } = fetched;

    for err in [profile.error(), friends.error(), ranking.error()]
        .into_iter()
        .flatten()
    {
        logs.push(format!("[WARN] {err}"));
    }

    let ranking_error = ranking.error().map(str::to_string);
    let mut records = ranking.into_items();
    if !is_ranked_descending(&records) {
        if config.resort_ranking {
            logs.push("[WARN] Ranking not sorted by affinity; re-sorting".to_string());
            sort_by_affinity_desc(&mut records);
        } else {
            logs.push("[WARN] Ranking not sorted by affinity".to_string());
        }
    }

    let identities = index_identities(friends.into_items());
    let entries = assemble(records, &identities, config.palette, config.boundary_policy);
    let profile = profile
        .into_items()
        .into_iter()
        .find(|p| p.steam_id == steam_id);

    (
        Delta::SetRoster {
            generation,
            steam_id: steam_id.to_string(),
            profile,
            entries,
            ranking_error,
        },
        logs,
    )
}
