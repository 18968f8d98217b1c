//! Synchronization boundary: the process-wide snapshot cell and its broadcast fan-out.
//!
//! Last write wins: every accepted snapshot overwrites the previous one unconditionally and is
//! sent to every subscriber, the submitter included. There is no merge or version check.

mod protocol;

pub use protocol::Envelope;

use crate::logic::{try_apply, Action, Transition};
use crate::models::{MatchId, TournamentError, TournamentState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast::{self, error::RecvError};

/// Errors handling an inbound client frame.
#[derive(Debug)]
pub enum RelayError {
    /// Frame is not a valid envelope.
    Malformed(serde_json::Error),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Malformed(e) => write!(f, "Malformed message: {}", e),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Malformed(e) => Some(e),
        }
    }
}

/// Relay summary for the status endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct RelayStatus {
    pub clients: usize,
    pub players: usize,
    pub matches: usize,
    pub registration_open: bool,
    pub current_match_id: Option<MatchId>,
    pub last_update: Option<DateTime<Utc>>,
}

struct Shared {
    text: String,
    tournament: TournamentState,
    last_update: Option<DateTime<Utc>>,
}

/// Latest shared state plus a broadcast channel of serialized envelopes.
pub struct Relay {
    shared: RwLock<Shared>,
    tx: broadcast::Sender<String>,
    clients: AtomicUsize,
}

impl Relay {
    /// `capacity` is how many unsent frames a slow client may fall behind before it is resynced.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            shared: RwLock::new(Shared {
                text: String::new(),
                tournament: TournamentState::new(),
                last_update: None,
            }),
            tx,
            clients: AtomicUsize::new(0),
        }
    }

    // Writes are whole-value assignments, so a poisoned lock still holds a consistent snapshot.
    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.shared.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.shared.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Current tournament snapshot.
    pub fn snapshot(&self) -> TournamentState {
        self.read().tournament.clone()
    }

    pub fn text(&self) -> String {
        self.read().text.clone()
    }

    /// Frames sent to a client on (re)connect: the text, then the tournament.
    pub fn greeting(&self) -> Vec<String> {
        let shared = self.read();
        [
            Envelope::Update {
                text: shared.text.clone(),
            },
            Envelope::Tournament {
                tournament: shared.tournament.clone(),
            },
        ]
        .iter()
        .filter_map(|envelope| match envelope.to_json() {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::error!("Failed to encode greeting: {}", e);
                None
            }
        })
        .collect()
    }

    /// Replace the shared text and broadcast it.
    pub fn submit_text(&self, text: String) {
        let mut shared = self.write();
        shared.text = text.clone();
        log::info!("Updated text: {}", text);
        self.broadcast(&Envelope::Update { text });
    }

    /// Replace the tournament snapshot (last write wins) and broadcast it to every client.
    pub fn submit_tournament(&self, tournament: TournamentState) {
        log_snapshot(&tournament);
        let mut shared = self.write();
        shared.last_update = Some(Utc::now());
        shared.tournament = tournament.clone();
        // Broadcast under the lock so subscribers see snapshots in the order they were stored.
        self.broadcast(&Envelope::Tournament { tournament });
        log::info!(
            "Updated tournament: {} players, {} matches",
            shared.tournament.players.len(),
            shared.tournament.matches.len()
        );
    }

    /// Apply `action` to the current snapshot and submit the result like any client would.
    ///
    /// A refused action leaves the snapshot alone and broadcasts nothing.
    pub fn apply_action(&self, action: &Action) -> Result<Transition, TournamentError> {
        let transition = try_apply(&self.snapshot(), action)?;
        self.submit_tournament(transition.state.clone());
        Ok(transition)
    }

    /// Frames to forward for one receive on a subscription, or `None` once the channel is closed.
    ///
    /// A subscriber that fell behind gets the full greeting instead of the frames it missed.
    pub fn frames_for(&self, received: Result<String, RecvError>) -> Option<Vec<String>> {
        match received {
            Ok(frame) => Some(vec![frame]),
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("Subscriber lagged by {} message(s), resyncing", skipped);
                Some(self.greeting())
            }
            Err(RecvError::Closed) => None,
        }
    }

    /// Route one inbound client frame.
    pub fn handle_inbound(&self, raw: &str) -> Result<(), RelayError> {
        match serde_json::from_str::<Envelope>(raw).map_err(RelayError::Malformed)? {
            Envelope::Update { text } => self.submit_text(text),
            Envelope::Tournament { tournament } => self.submit_tournament(tournament),
        }
        Ok(())
    }

    /// Record a new connection; returns the number of connected clients.
    pub fn client_connected(&self) -> usize {
        self.clients.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record a closed connection; returns the number of connected clients.
    pub fn client_disconnected(&self) -> usize {
        self.clients
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1)
    }

    pub fn status(&self) -> RelayStatus {
        let shared = self.read();
        RelayStatus {
            clients: self.clients.load(Ordering::SeqCst),
            players: shared.tournament.players.len(),
            matches: shared.tournament.matches.len(),
            registration_open: shared.tournament.registration_open,
            current_match_id: shared.tournament.current_match_id,
            last_update: shared.last_update,
        }
    }

    fn broadcast(&self, envelope: &Envelope) {
        match envelope.to_json() {
            Ok(frame) => {
                // Err only means nobody is subscribed right now.
                if self.tx.send(frame).is_err() {
                    log::debug!("No clients to broadcast to");
                }
            }
            Err(e) => log::error!("Failed to encode broadcast: {}", e),
        }
    }
}

fn log_snapshot(tournament: &TournamentState) {
    if tournament.registration_open && tournament.players.is_empty() && tournament.matches.is_empty()
    {
        log::info!("Tournament reset detected");
    }
    for m in tournament.matches.values() {
        if !m.points.is_empty() {
            log::debug!("Match #{} points: {:?}", m.id, m.points);
        }
        if m.is_third_place {
            log::debug!(
                "Third place match: id={}, players: {:?} vs {:?}, winner: {:?}",
                m.id,
                m.player1.as_ref().map(|p| p.name.as_str()),
                m.player2.as_ref().map(|p| p.name.as_str()),
                m.winner
            );
        }
        if m.is_bye_match {
            log::debug!("Bye match: id={}, bye winner: {:?}", m.id, m.bye_winner_id);
        }
    }
}
