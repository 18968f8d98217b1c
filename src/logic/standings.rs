//! Completion detection and final placings.

use crate::models::{GameMatch, Player, TournamentState};
use serde::Serialize;

/// Top three placings; None for places not yet decided.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Standings {
    pub first: Option<Player>,
    pub second: Option<Player>,
    pub third: Option<Player>,
}

/// True once the bracket exists and every match has a winner.
///
/// A third-place match that never receives two real contenders never gets a winner, so such a
/// tournament stays incomplete.
pub fn is_complete(state: &TournamentState) -> bool {
    !state.matches.is_empty() && state.matches.values().all(|m| m.winner.is_some())
}

/// 1st and 2nd from the final, 3rd from the third-place match.
pub fn standings(state: &TournamentState) -> Standings {
    let final_match = state.final_match();
    Standings {
        first: final_match.and_then(winner_of),
        second: final_match.and_then(|m| m.winner.and_then(|w| m.opponent_of(w).cloned())),
        third: state.third_place_match().and_then(winner_of),
    }
}

fn winner_of(m: &GameMatch) -> Option<Player> {
    m.winner.and_then(|w| m.seated(w).cloned())
}
