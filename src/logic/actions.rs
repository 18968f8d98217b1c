//! Client actions as pure snapshot transitions: (current state, action) -> next state.

use crate::logic::{
    award_point, confirm_advance, proceed_to_next_match, register_players, reset_tournament,
    start_tournament,
};
use crate::models::{MatchId, PlayerId, TournamentError, TournamentState};
use serde::{Deserialize, Serialize};

/// Something a controlling client asks the engine to do.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    /// Register comma-separated names (`-` for a bye slot).
    Register { input: String },
    Start,
    AwardPoint { match_id: MatchId, player_id: PlayerId },
    ConfirmAdvance { match_id: MatchId, winner_id: PlayerId },
    /// Confirm the current match with whoever has already won it.
    ProceedToNextMatch,
    Reset,
}

/// A player who reached two points and awaits confirmation. Never part of the broadcast state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWinner {
    pub match_id: MatchId,
    pub winner_id: PlayerId,
}

/// Result of applying an action: the full next snapshot plus the pending-winner signal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub state: TournamentState,
    pub pending_winner: Option<PendingWinner>,
}

/// Apply an action to a copy of `state`, reporting why it was refused.
pub fn try_apply(state: &TournamentState, action: &Action) -> Result<Transition, TournamentError> {
    let mut next = state.clone();
    let mut pending_winner = None;
    match action {
        Action::Register { input } => {
            register_players(&mut next, input)?;
        }
        Action::Start => start_tournament(&mut next)?,
        Action::AwardPoint {
            match_id,
            player_id,
        } => {
            pending_winner = award_point(&mut next, *match_id, *player_id)?.map(|winner_id| {
                PendingWinner {
                    match_id: *match_id,
                    winner_id,
                }
            });
        }
        Action::ConfirmAdvance {
            match_id,
            winner_id,
        } => confirm_advance(&mut next, *match_id, *winner_id)?,
        Action::ProceedToNextMatch => {
            proceed_to_next_match(&mut next)?;
        }
        Action::Reset => reset_tournament(&mut next),
    }
    Ok(Transition {
        state: next,
        pending_winner,
    })
}

/// Apply an action; a refused action leaves the snapshot unchanged.
pub fn apply(state: &TournamentState, action: &Action) -> Transition {
    try_apply(state, action).unwrap_or_else(|e| {
        log::debug!("Ignoring {:?}: {}", action, e);
        Transition {
            state: state.clone(),
            pending_winner: None,
        }
    })
}
