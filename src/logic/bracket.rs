//! Bracket construction: pad the roster with byes and lay out the fixed 16-seat bracket.

use crate::models::{
    GameMatch, MatchId, Player, TournamentError, TournamentState, BRACKET_SIZE, FINAL_MATCH_ID,
    FINAL_ROUND, SEMIFINAL_ROUND, THIRD_PLACE_MATCH_ID,
};
use std::collections::BTreeMap;

/// First quarterfinal id (matches 9..=12).
const FIRST_QUARTERFINAL_ID: MatchId = 9;
/// First semifinal id (matches 13 and 14).
const FIRST_SEMIFINAL_ID: MatchId = 13;

/// Close registration and build the bracket.
///
/// 1. Pad the roster to 16 with bye players (ids continue the numbering).
/// 2. Round 1 pairs seats (2i, 2i+1) into matches 1..=8, feeding 9..=12.
/// 3. Quarterfinals 9..=12 feed 13..=14, semifinals feed the final (15).
///    The third-place match (16) is filled with semifinal losers by progression, not by a link.
/// 4. Round-1 matches with exactly one bye are flagged with their bye winner but not advanced.
/// 5. The lowest-id playable match becomes current (match 1 if none is).
pub fn start_tournament(state: &mut TournamentState) -> Result<(), TournamentError> {
    if !state.registration_open || !state.matches.is_empty() {
        return Err(TournamentError::AlreadyStarted);
    }

    let registered = state.players.len();
    let bye_ids = state.allocate_player_ids(BRACKET_SIZE.saturating_sub(registered))?;
    for id in bye_ids {
        state.players.insert(id, Player::bye(id));
    }

    let seeds: Vec<Player> = state.players.values().take(BRACKET_SIZE).cloned().collect();
    let mut matches = BTreeMap::new();

    for (i, pair) in (0..).zip(seeds.chunks_exact(2)) {
        let mut m = GameMatch::seeded(
            i + 1,
            1,
            Some(i / 2 + FIRST_QUARTERFINAL_ID),
            pair[0].clone(),
            pair[1].clone(),
        );
        m.refresh_bye();
        matches.insert(m.id, m);
    }
    for i in 0..4 {
        let id = FIRST_QUARTERFINAL_ID + i;
        matches.insert(id, GameMatch::new(id, 2, Some(i / 2 + FIRST_SEMIFINAL_ID)));
    }
    for id in [FIRST_SEMIFINAL_ID, FIRST_SEMIFINAL_ID + 1] {
        matches.insert(id, GameMatch::new(id, SEMIFINAL_ROUND, Some(FINAL_MATCH_ID)));
    }
    let mut third_place = GameMatch::new(THIRD_PLACE_MATCH_ID, FINAL_ROUND, None);
    third_place.is_third_place = true;
    matches.insert(THIRD_PLACE_MATCH_ID, third_place);
    matches.insert(FINAL_MATCH_ID, GameMatch::new(FINAL_MATCH_ID, FINAL_ROUND, None));

    state.matches = matches;
    state.current_match_id = Some(state.first_playable_match().map_or(1, |m| m.id));
    state.registration_open = false;

    let byes = state.matches.values().filter(|m| m.is_bye_match).count();
    log::info!(
        "Started tournament: {} registered, {} padded, {} matches, {} first-round bye(s)",
        registered,
        BRACKET_SIZE.saturating_sub(registered),
        state.matches.len(),
        byes
    );
    Ok(())
}
