//! Knockout bracket relay: library with models, bracket logic and the live state relay.

pub mod config;
pub mod logic;
pub mod models;
pub mod relay;

pub use config::ServerConfig;
pub use logic::{
    apply, award_point, confirm_advance, is_complete, proceed_to_next_match, register_players,
    reset_tournament, standings, start_tournament, try_apply, Action, PendingWinner, Standings,
    Transition,
};
pub use models::{
    GameMatch, MatchId, Player, PlayerId, TournamentError, TournamentState, BRACKET_SIZE,
    FINAL_MATCH_ID, THIRD_PLACE_MATCH_ID,
};
pub use relay::{Envelope, Relay, RelayError, RelayStatus};
