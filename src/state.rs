use std::collections::VecDeque;

use chrono::Local;

use crate::model::{Game, PlayerIdentity};
use crate::roster::RosterEntry;
use crate::selection::{CardEvent, CardState, GameList};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub steam_id: Option<String>,
    /// Bumped on every load request; roster deltas carrying an older value
    /// are dropped.
    pub generation: u64,
    pub profile: Option<PlayerIdentity>,
    pub roster: Vec<RosterEntry>,
    /// One state per roster entry, same index.
    pub cards: Vec<CardState>,
    pub status: RosterStatus,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    /// Input buffer while the Steam ID prompt is open.
    pub prompt: Option<String>,
    pub prompt_error: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            steam_id: None,
            generation: 0,
            profile: None,
            roster: Vec::new(),
            cards: Vec::new(),
            status: RosterStatus::Idle,
            selected: 0,
            logs: VecDeque::new(),
            help_overlay: false,
            prompt: None,
            prompt_error: false,
        }
    }

    /// Starts a new load for `steam_id` and returns its generation. The old
    /// roster and every card state go away immediately.
    pub fn begin_load(&mut self, steam_id: &str) -> u64 {
        self.generation += 1;
        self.steam_id = Some(steam_id.to_string());
        self.profile = None;
        self.roster.clear();
        self.cards.clear();
        self.selected = 0;
        self.status = RosterStatus::Loading;
        self.generation
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn select_next(&mut self) {
        if self.roster.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % self.roster.len();
    }

    pub fn select_prev(&mut self) {
        if self.roster.is_empty() {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = self.roster.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn selected_entry(&self) -> Option<&RosterEntry> {
        self.roster.get(self.selected)
    }

    pub fn card_state(&self, idx: usize) -> CardState {
        self.cards.get(idx).copied().unwrap_or_default()
    }

    /// Feeds one gesture to the selected card only.
    pub fn card_event(&mut self, event: CardEvent) {
        let idx = self.selected;
        let (Some(entry), Some(card)) = (self.roster.get(idx), self.cards.get_mut(idx)) else {
            return;
        };
        let next = card.transition(event, &entry.record);
        if event == CardEvent::Activate && next == *card && !entry.record.has_library() {
            let name = entry.identity.display_name.clone();
            self.push_log(format!("[INFO] No library data for {name}"));
            return;
        }
        *card = next;
    }

    pub fn activate_selected(&mut self) {
        self.card_event(CardEvent::Activate);
    }

    pub fn select_tab(&mut self, list: GameList) {
        self.card_event(CardEvent::Select(list));
    }

    pub fn cycle_tab(&mut self) {
        if let Some(list) = self.card_state(self.selected).active_list() {
            self.select_tab(list.other());
        }
    }

    pub fn displayed_games(&self, idx: usize) -> Vec<&Game> {
        match self.roster.get(idx) {
            Some(entry) => self.card_state(idx).displayed_games(&entry.record),
            None => Vec::new(),
        }
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
        self.prompt_error = false;
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
        self.prompt_error = false;
    }

    /// Message for an empty roster, or `None` while there is something to
    /// show.
    pub fn empty_roster_message(&self) -> Option<String> {
        if !self.roster.is_empty() {
            return None;
        }
        Some(match &self.status {
            RosterStatus::Idle => "Press / to enter a Steam ID".to_string(),
            RosterStatus::Loading => "Loading friends...".to_string(),
            RosterStatus::Loaded => "No friends found".to_string(),
            RosterStatus::Failed(err) => format!("Could not load friends: {err}"),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetRoster {
        generation: u64,
        steam_id: String,
        profile: Option<PlayerIdentity>,
        entries: Vec<RosterEntry>,
        ranking_error: Option<String>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadRoster { steam_id: String, generation: u64 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetRoster {
            generation,
            steam_id,
            profile,
            entries,
            ranking_error,
        } => {
            if generation != state.generation {
                state.push_log(format!("[INFO] Discarded stale roster for {steam_id}"));
                return;
            }
            if profile.is_none() {
                state.push_log(format!("[WARN] Invalid id {steam_id}"));
            }
            let placeholders = entries.iter().filter(|e| e.placeholder).count();
            if placeholders > 0 {
                state.push_log(format!(
                    "[WARN] {placeholders} friend(s) without player summary"
                ));
            }
            state.status = match ranking_error {
                Some(err) => RosterStatus::Failed(err),
                None => RosterStatus::Loaded,
            };
            state.push_log(format!(
                "[INFO] Loaded {} friend(s) for {steam_id}",
                entries.len()
            ));
            state.profile = profile;
            state.cards = vec![CardState::Collapsed; entries.len()];
            state.roster = entries;
            state.selected = 0;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
