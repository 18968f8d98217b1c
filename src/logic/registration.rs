//! Registration phase: add players from comma-separated input, reset the tournament.

use crate::models::{Player, TournamentError, TournamentState};

/// Split raw input into player names.
///
/// Segments are trimmed, empty segments are dropped and a lone `-` becomes a bye slot (empty name).
pub fn parse_names(raw_input: &str) -> impl Iterator<Item = String> + '_ {
    raw_input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| if name == "-" { String::new() } else { name.to_string() })
}

/// Register players from `raw_input`, in input order, up to the free slots. Returns how many were added.
///
/// Names beyond the free slots are discarded. Ids continue from the highest existing id.
pub fn register_players(
    state: &mut TournamentState,
    raw_input: &str,
) -> Result<usize, TournamentError> {
    if !state.registration_open {
        return Err(TournamentError::RegistrationClosed);
    }
    let open_slots = state.open_slots();
    if open_slots == 0 {
        return Err(TournamentError::RosterFull);
    }
    let names: Vec<String> = parse_names(raw_input).take(open_slots).collect();
    if names.is_empty() {
        return Err(TournamentError::NothingToRegister);
    }

    let ids = state.allocate_player_ids(names.len())?;
    for (id, name) in ids.into_iter().zip(&names) {
        state.players.insert(id, Player::new(id, name.as_str()));
    }
    log::info!(
        "Registered {} player(s), roster now {}",
        names.len(),
        state.players.len()
    );
    Ok(names.len())
}

/// Discard all players and matches and reopen registration.
pub fn reset_tournament(state: &mut TournamentState) {
    *state = TournamentState::new();
    log::info!("Tournament reset");
}
