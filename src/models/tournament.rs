//! TournamentState (the shared snapshot) and TournamentError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of seats in the bracket (byes fill the rest).
pub const BRACKET_SIZE: usize = 16;
/// Round number of the semifinals (matches 13 and 14).
pub const SEMIFINAL_ROUND: u8 = 3;
/// Round number shared by the final and the third-place match.
pub const FINAL_ROUND: u8 = 4;
pub const FINAL_MATCH_ID: MatchId = 15;
pub const THIRD_PLACE_MATCH_ID: MatchId = 16;

/// Reasons an action is refused. The engine turns these into no-ops; the HTTP API reports them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Registration is closed (tournament already started).
    RegistrationClosed,
    /// All 16 slots are taken.
    RosterFull,
    /// The input contained no names to register.
    NothingToRegister,
    /// Start requested while the bracket already exists.
    AlreadyStarted,
    /// No more player ids can be assigned (highest id is at the top of the range).
    PlayerIdsExhausted,
    /// No match with this id.
    MatchNotFound(MatchId),
    /// The match does not have both seats filled yet.
    MatchNotReady(MatchId),
    /// Player is not seated in the given match.
    PlayerNotSeated { match_id: MatchId, player_id: PlayerId },
    /// Bye slots cannot score points.
    ByeCannotScore(PlayerId),
    /// The match already has a winner (or a player already at two points).
    MatchAlreadyDecided(MatchId),
    /// Neither player has reached two points and the match is not a bye.
    NoDecidedWinner(MatchId),
    /// No match is currently selected.
    NoCurrentMatch,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::RegistrationClosed => write!(f, "Registration is closed"),
            TournamentError::RosterFull => write!(f, "All {} slots are taken", BRACKET_SIZE),
            TournamentError::NothingToRegister => write!(f, "No player names given"),
            TournamentError::AlreadyStarted => write!(f, "Tournament has already started"),
            TournamentError::PlayerIdsExhausted => write!(f, "No player ids left to assign"),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::MatchNotReady(id) => write!(f, "Match {} is waiting for a player", id),
            TournamentError::PlayerNotSeated { match_id, player_id } => {
                write!(f, "Player {} is not seated in match {}", player_id, match_id)
            }
            TournamentError::ByeCannotScore(id) => write!(f, "Player {} is a bye and cannot score", id),
            TournamentError::MatchAlreadyDecided(id) => write!(f, "Match {} is already decided", id),
            TournamentError::NoDecidedWinner(id) => write!(f, "Match {} has no winner yet", id),
            TournamentError::NoCurrentMatch => write!(f, "No current match"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Anything stored in an id-keyed map but exchanged as a JSON array.
pub trait Keyed {
    fn key(&self) -> u32;
}

impl Keyed for Player {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for GameMatch {
    fn key(&self) -> u32 {
        self.id
    }
}

/// (De)serialize an id-keyed map as an array ordered by id.
mod by_id {
    use super::Keyed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S, T>(map: &BTreeMap<u32, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeMap<u32, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Keyed,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|item| (item.key(), item)).collect())
    }
}

fn default_registration_open() -> bool {
    true
}

/// The single unit of shared truth broadcast to every client.
///
/// Players and matches are keyed by id; on the wire they are arrays ordered by id, which is
/// registration order for players since ids only ever increase.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    #[serde(default, with = "by_id")]
    pub players: BTreeMap<PlayerId, Player>,
    #[serde(default, with = "by_id")]
    pub matches: BTreeMap<MatchId, GameMatch>,
    #[serde(default = "default_registration_open")]
    pub registration_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_match_id: Option<MatchId>,
}

impl Default for TournamentState {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentState {
    /// Empty tournament with registration open.
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            matches: BTreeMap::new(),
            registration_open: true,
            current_match_id: None,
        }
    }

    /// Build a state from players in registration order (registration still open).
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            ..Self::new()
        }
    }

    /// Id the next registered player gets: highest existing id + 1, or 1. None on overflow.
    pub fn next_player_id(&self) -> Option<PlayerId> {
        match self.players.keys().next_back() {
            Some(id) => id.checked_add(1),
            None => Some(1),
        }
    }

    /// `count` consecutive fresh player ids, or an error if they would overflow.
    pub fn allocate_player_ids(&self, count: usize) -> Result<Vec<PlayerId>, TournamentError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let first = self
            .next_player_id()
            .ok_or(TournamentError::PlayerIdsExhausted)?;
        (0..count)
            .map(|offset| {
                PlayerId::try_from(offset)
                    .ok()
                    .and_then(|offset| first.checked_add(offset))
                    .ok_or(TournamentError::PlayerIdsExhausted)
            })
            .collect()
    }

    /// Slots still free in the 16-seat roster.
    pub fn open_slots(&self) -> usize {
        BRACKET_SIZE.saturating_sub(self.players.len())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.get(&id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.get_mut(&id)
    }

    /// Match currently presented to the operator.
    pub fn current_match(&self) -> Option<&GameMatch> {
        self.current_match_id.and_then(|id| self.matches.get(&id))
    }

    pub fn is_current_match_bye(&self) -> bool {
        self.current_match().is_some_and(|m| m.is_bye_match)
    }

    /// Points a player holds in a match (0 if unknown).
    pub fn points(&self, match_id: MatchId, player_id: PlayerId) -> u32 {
        self.matches
            .get(&match_id)
            .map_or(0, |m| m.points_for(player_id))
    }

    /// Bracket matches of a round, lowest id first. The third-place match is listed separately.
    pub fn matches_in_round(&self, round: u8) -> Vec<&GameMatch> {
        self.matches
            .values()
            .filter(|m| m.round == round && !m.is_third_place)
            .collect()
    }

    pub fn third_place_match(&self) -> Option<&GameMatch> {
        self.matches.values().find(|m| m.is_third_place)
    }

    pub fn final_match(&self) -> Option<&GameMatch> {
        self.matches.get(&FINAL_MATCH_ID)
    }

    /// Playable match with the lowest id.
    pub fn first_playable_match(&self) -> Option<&GameMatch> {
        self.matches.values().find(|m| m.is_playable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_wire_shape() {
        let json = serde_json::to_value(TournamentState::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "players": [], "matches": [], "registrationOpen": true })
        );
    }

    #[test]
    fn snapshot_from_client_is_keyed_by_id() {
        let raw = r#"{
            "players": [{"id": 2, "name": "B"}, {"id": 1, "name": "A"}],
            "matches": [{"id": 16, "round": 4, "isThirdPlace": true, "points": {}},
                        {"id": 15, "round": 4}],
            "registrationOpen": false,
            "currentMatchId": 16
        }"#;
        let state: TournamentState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.players.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(state.third_place_match().map(|m| m.id), Some(16));
        assert_eq!(state.final_match().map(|m| m.id), Some(15));
        assert_eq!(state.current_match_id, Some(16));
        assert!(!state.registration_open);

        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back["players"][0]["name"], "A");
        assert_eq!(back["matches"][0]["id"], 15);
    }

    #[test]
    fn next_player_id_follows_highest_id() {
        assert_eq!(TournamentState::new().next_player_id(), Some(1));
        let state = TournamentState::with_players(vec![Player::new(3, "C"), Player::new(7, "G")]);
        assert_eq!(state.next_player_id(), Some(8));
        assert_eq!(state.allocate_player_ids(3), Ok(vec![8, 9, 10]));
        assert_eq!(state.open_slots(), 14);
    }

    #[test]
    fn id_allocation_refuses_to_overflow() {
        let state = TournamentState::with_players(vec![Player::new(u32::MAX - 1, "Y")]);
        assert_eq!(state.allocate_player_ids(1), Ok(vec![u32::MAX]));
        assert_eq!(
            state.allocate_player_ids(2),
            Err(TournamentError::PlayerIdsExhausted)
        );
        let full = TournamentState::with_players(vec![Player::new(u32::MAX, "Z")]);
        assert_eq!(full.next_player_id(), None);
        assert_eq!(full.allocate_player_ids(0), Ok(Vec::new()));
    }
}
