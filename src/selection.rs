use crate::model::{AffinityRecord, Game};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameList {
    Matching,
    Missing,
}

impl GameList {
    pub fn label(self) -> &'static str {
        match self {
            GameList::Matching => "Matching Games",
            GameList::Missing => "Missing Games",
        }
    }

    pub fn other(self) -> Self {
        match self {
            GameList::Matching => GameList::Missing,
            GameList::Missing => GameList::Matching,
        }
    }
}

/// User gestures on a friend card. Activating the card and picking a tab are
/// separate events, so a tab pick can never also collapse the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Activate,
    Select(GameList),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardState {
    #[default]
    Collapsed,
    ExpandedMatching,
    ExpandedMissing,
}

impl CardState {
    pub fn is_expanded(self) -> bool {
        !matches!(self, CardState::Collapsed)
    }

    pub fn active_list(self) -> Option<GameList> {
        match self {
            CardState::Collapsed => None,
            CardState::ExpandedMatching => Some(GameList::Matching),
            CardState::ExpandedMissing => Some(GameList::Missing),
        }
    }

    pub fn transition(self, event: CardEvent, record: &AffinityRecord) -> CardState {
        match (self, event) {
            (CardState::Collapsed, CardEvent::Activate) if record.has_library() => {
                CardState::ExpandedMatching
            }
            (CardState::Collapsed, _) => CardState::Collapsed,
            (_, CardEvent::Activate) => CardState::Collapsed,
            (_, CardEvent::Select(GameList::Matching)) => CardState::ExpandedMatching,
            (_, CardEvent::Select(GameList::Missing)) => CardState::ExpandedMissing,
        }
    }

    /// Games for the active tab, sorted by name. Collapsed cards show none.
    pub fn displayed_games<'a>(self, record: &'a AffinityRecord) -> Vec<&'a Game> {
        let games = match self.active_list() {
            None => return Vec::new(),
            Some(GameList::Matching) => &record.matching_games,
            Some(GameList::Missing) => &record.target_only_games,
        };
        let mut sorted: Vec<&Game> = games.iter().collect();
        sort_games_by_name(&mut sorted);
        sorted
    }
}

/// Case-sensitive lexicographic order on `name`; stable, so equal names keep
/// their backend order.
pub fn sort_games_by_name(games: &mut [&Game]) {
    games.sort_by(|a, b| a.name.cmp(&b.name));
}
