//! A single bracket match: two seats, a points tally, and its link to the next match.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier for a match (fixed scheme 1..=16).
pub type MatchId = u32;

/// Points needed to take a match (first to two).
pub const POINTS_TO_WIN: u32 = 2;

fn is_false(b: &bool) -> bool {
    !*b
}

/// A match in the bracket. Field names match the JSON snapshot clients exchange.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    /// 1 = first round, 2 = quarterfinals, 3 = semifinals, 4 = final and third place.
    pub round: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<Player>,
    /// Id of the winning player; None until the result is confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
    /// Match the winner moves on to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_match_id: Option<MatchId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_third_place: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_bye_match: bool,
    /// Predetermined winner of a bye match (the seated non-bye player).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye_winner_id: Option<PlayerId>,
    #[serde(default)]
    pub points: BTreeMap<PlayerId, u32>,
}

impl GameMatch {
    /// Create an empty match in the given round.
    pub fn new(id: MatchId, round: u8, next_match_id: Option<MatchId>) -> Self {
        Self {
            id,
            round,
            next_match_id,
            ..Self::default()
        }
    }

    /// Create a match with both seats filled.
    pub fn seeded(
        id: MatchId,
        round: u8,
        next_match_id: Option<MatchId>,
        player1: Player,
        player2: Player,
    ) -> Self {
        Self {
            player1: Some(player1),
            player2: Some(player2),
            ..Self::new(id, round, next_match_id)
        }
    }

    /// Seated players, in seat order.
    pub fn seats(&self) -> impl Iterator<Item = &Player> {
        self.player1.iter().chain(self.player2.iter())
    }

    pub fn has_both_seats(&self) -> bool {
        self.player1.is_some() && self.player2.is_some()
    }

    /// Both seats filled and no winner yet.
    pub fn is_playable(&self) -> bool {
        self.has_both_seats() && self.winner.is_none()
    }

    /// The seated player with this id, if any.
    pub fn seated(&self, player_id: PlayerId) -> Option<&Player> {
        self.seats().find(|p| p.id == player_id)
    }

    /// The other seated player, if `player_id` is seated and has an opponent.
    pub fn opponent_of(&self, player_id: PlayerId) -> Option<&Player> {
        match (&self.player1, &self.player2) {
            (Some(p1), p2) if p1.id == player_id => p2.as_ref(),
            (p1, Some(p2)) if p2.id == player_id => p1.as_ref(),
            _ => None,
        }
    }

    /// Points recorded for a player (0 if none yet).
    pub fn points_for(&self, player_id: PlayerId) -> u32 {
        self.points.get(&player_id).copied().unwrap_or(0)
    }

    /// A seated player who has reached the points threshold.
    pub fn leader(&self) -> Option<PlayerId> {
        self.seats()
            .map(|p| p.id)
            .find(|&id| self.points_for(id) >= POINTS_TO_WIN)
    }

    /// Put a player into the first empty seat. Returns false if both seats are taken.
    pub fn seat(&mut self, player: Player) -> bool {
        if self.player1.is_none() {
            self.player1 = Some(player);
        } else if self.player2.is_none() {
            self.player2 = Some(player);
        } else {
            return false;
        }
        true
    }

    /// Recompute `is_bye_match` / `bye_winner_id` from the seats.
    ///
    /// Only a fully seated match can be a bye: exactly one real player against a bye slot.
    pub fn refresh_bye(&mut self) {
        let bye_winner = match (&self.player1, &self.player2) {
            (Some(p1), Some(p2)) if p1.is_bye() && !p2.is_bye() => Some(p2.id),
            (Some(p1), Some(p2)) if !p1.is_bye() && p2.is_bye() => Some(p1.id),
            _ => None,
        };
        self.is_bye_match = bye_winner.is_some();
        self.bye_winner_id = bye_winner;
    }

    /// Winner to confirm when moving on: the player at two points, else the bye winner.
    pub fn decided_winner(&self) -> Option<PlayerId> {
        if self.winner.is_some() {
            return None;
        }
        self.leader().or(if self.is_bye_match {
            self.bye_winner_id
        } else {
            None
        })
    }
}
