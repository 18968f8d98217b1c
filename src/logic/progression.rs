//! Match progression: record points, confirm winners, move players through the bracket.

use crate::models::{
    MatchId, Player, PlayerId, TournamentError, TournamentState, SEMIFINAL_ROUND,
    THIRD_PLACE_MATCH_ID,
};

/// Add one point to `player_id` in `match_id`.
///
/// Returns `Some(player_id)` when the player reaches two points; the match is not finalized here,
/// the caller confirms it with [`confirm_advance`]. Once a player holds two points the match takes
/// no further points.
pub fn award_point(
    state: &mut TournamentState,
    match_id: MatchId,
    player_id: PlayerId,
) -> Result<Option<PlayerId>, TournamentError> {
    let m = state
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if !m.has_both_seats() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    let is_bye = m
        .seated(player_id)
        .ok_or(TournamentError::PlayerNotSeated {
            match_id,
            player_id,
        })?
        .is_bye();
    if is_bye {
        return Err(TournamentError::ByeCannotScore(player_id));
    }
    if m.winner.is_some() || m.leader().is_some() {
        return Err(TournamentError::MatchAlreadyDecided(match_id));
    }

    let points = m.points.entry(player_id).or_insert(0);
    *points += 1;
    log::debug!("Match #{} point to {} (now {})", match_id, player_id, points);
    Ok(m.leader())
}

/// Finalize `match_id` with `winner_id` and propagate the result.
///
/// The winner takes the first empty seat of the next match, whose bye status is then re-evaluated.
/// A semifinal's real loser drops into the third-place match. Finally the current match is
/// re-selected. A match that already has a winner is refused, so replays never double-seat, and
/// so is a match still waiting for its second player.
pub fn confirm_advance(
    state: &mut TournamentState,
    match_id: MatchId,
    winner_id: PlayerId,
) -> Result<(), TournamentError> {
    let finished = state
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if finished.winner.is_some() {
        return Err(TournamentError::MatchAlreadyDecided(match_id));
    }
    if !finished.has_both_seats() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    let winner = finished
        .seated(winner_id)
        .cloned()
        .ok_or(TournamentError::PlayerNotSeated {
            match_id,
            player_id: winner_id,
        })?;
    let loser = finished.opponent_of(winner_id).cloned();
    let next_match_id = finished.next_match_id;
    let is_semifinal = finished.round == SEMIFINAL_ROUND;

    if let Some(m) = state.get_match_mut(match_id) {
        m.winner = Some(winner_id);
    }
    if let Some(next_id) = next_match_id {
        seat_player(state, next_id, winner);
    }
    if is_semifinal {
        if let Some(loser) = loser.filter(|p| !p.is_bye()) {
            seat_player(state, THIRD_PLACE_MATCH_ID, loser);
        }
    }

    state.current_match_id = select_current_match(state);
    log::info!(
        "Match #{} won by {}, next match: {:?}",
        match_id,
        winner_id,
        state.current_match_id
    );
    Ok(())
}

/// Confirm the current match with its decided winner (two points, or the bye winner).
pub fn proceed_to_next_match(state: &mut TournamentState) -> Result<PlayerId, TournamentError> {
    let current = state
        .current_match()
        .ok_or(TournamentError::NoCurrentMatch)?;
    if current.winner.is_some() {
        return Err(TournamentError::MatchAlreadyDecided(current.id));
    }
    let match_id = current.id;
    let winner_id = current
        .decided_winner()
        .ok_or(TournamentError::NoDecidedWinner(match_id))?;
    confirm_advance(state, match_id, winner_id)?;
    Ok(winner_id)
}

/// Pick the match to present next.
///
/// The third-place match goes first once both semifinals are decided and it is fully seated; the
/// final follows once third place has a winner. Otherwise the lowest-id playable match.
pub fn select_current_match(state: &TournamentState) -> Option<MatchId> {
    let semifinals_decided = state
        .matches
        .values()
        .filter(|m| m.round == SEMIFINAL_ROUND)
        .all(|m| m.winner.is_some());

    match state.third_place_match() {
        Some(third) if semifinals_decided && third.is_playable() => Some(third.id),
        Some(third) if third.winner.is_some() => state
            .final_match()
            .filter(|m| m.is_playable())
            .map(|m| m.id),
        _ => state.first_playable_match().map(|m| m.id),
    }
}

fn seat_player(state: &mut TournamentState, match_id: MatchId, player: Player) {
    let player_id = player.id;
    let Some(m) = state.get_match_mut(match_id) else {
        log::warn!("Match #{} missing, cannot seat player {}", match_id, player_id);
        return;
    };
    if m.seat(player) {
        m.refresh_bye();
    } else {
        log::warn!("Match #{} has no free seat for player {}", match_id, player_id);
    }
}
