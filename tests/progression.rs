//! Integration tests for points, advancement, current-match selection and standings.

use bracket_relay::{
    apply, award_point, confirm_advance, is_complete, proceed_to_next_match, register_players,
    standings, start_tournament, Action, MatchId, PendingWinner, PlayerId, Standings, TournamentError,
    TournamentState, THIRD_PLACE_MATCH_ID,
};

fn started(input: &str) -> TournamentState {
    let mut t = TournamentState::new();
    register_players(&mut t, input).unwrap();
    start_tournament(&mut t).unwrap();
    t
}

fn seat_ids(t: &TournamentState, match_id: MatchId) -> (Option<PlayerId>, Option<PlayerId>) {
    let m = t.get_match(match_id).unwrap();
    (
        m.player1.as_ref().map(|p| p.id),
        m.player2.as_ref().map(|p| p.id),
    )
}

/// Play the current match: player1 wins real matches, byes are confirmed as they stand,
/// and a match between two byes goes to player1.
fn play_current(t: &mut TournamentState) -> MatchId {
    let m = t.current_match().unwrap().clone();
    let p1 = m.player1.as_ref().unwrap();
    let p2 = m.player2.as_ref().unwrap();
    if m.is_bye_match {
        proceed_to_next_match(t).unwrap();
    } else if p1.is_bye() && p2.is_bye() {
        confirm_advance(t, m.id, p1.id).unwrap();
    } else {
        award_point(t, m.id, p1.id).unwrap();
        award_point(t, m.id, p1.id).unwrap();
        proceed_to_next_match(t).unwrap();
    }
    m.id
}

const SIXTEEN: &str = "A,B,C,D,E,F,G,H,I,J,K,L,M,N,O,P";

#[test]
fn two_points_signal_a_pending_winner_without_finalizing() {
    let t = started(SIXTEEN);
    let first = apply(&t, &Action::AwardPoint { match_id: 1, player_id: 1 });
    assert_eq!(first.pending_winner, None);
    assert_eq!(first.state.points(1, 1), 1);

    let second = apply(&first.state, &Action::AwardPoint { match_id: 1, player_id: 1 });
    assert_eq!(
        second.pending_winner,
        Some(PendingWinner { match_id: 1, winner_id: 1 })
    );
    assert_eq!(second.state.points(1, 1), 2);
    let m1 = second.state.get_match(1).unwrap();
    assert_eq!(m1.winner, None);
    assert!(second.state.get_match(9).unwrap().player1.is_none());
}

#[test]
fn confirm_advance_seats_winner_in_next_match() {
    let mut t = started(SIXTEEN);
    award_point(&mut t, 1, 1).unwrap();
    award_point(&mut t, 1, 1).unwrap();
    confirm_advance(&mut t, 1, 1).unwrap();
    assert_eq!(t.get_match(1).unwrap().winner, Some(1));
    assert_eq!(seat_ids(&t, 9), (Some(1), None));
    assert_eq!(t.current_match_id, Some(2));

    confirm_advance(&mut t, 2, 4).unwrap();
    assert_eq!(seat_ids(&t, 9), (Some(1), Some(4)));
    assert!(!t.get_match(9).unwrap().is_bye_match);
}

#[test]
fn points_stay_within_two() {
    let mut t = started(SIXTEEN);
    award_point(&mut t, 1, 2).unwrap();
    award_point(&mut t, 1, 1).unwrap();
    assert_eq!(award_point(&mut t, 1, 1), Ok(Some(1)));
    assert_eq!(
        award_point(&mut t, 1, 1),
        Err(TournamentError::MatchAlreadyDecided(1))
    );
    assert_eq!(
        award_point(&mut t, 1, 2),
        Err(TournamentError::MatchAlreadyDecided(1))
    );
    assert_eq!(t.points(1, 1), 2);
    assert_eq!(t.points(1, 2), 1);
}

#[test]
fn invalid_point_targets_are_no_ops() {
    let t = started("A,B,-,C");
    for action in [
        Action::AwardPoint { match_id: 99, player_id: 1 },
        Action::AwardPoint { match_id: 1, player_id: 3 },
        Action::AwardPoint { match_id: 2, player_id: 3 },
    ] {
        let next = apply(&t, &action);
        assert_eq!(next.state, t, "{:?}", action);
    }
    let mut t = t;
    assert_eq!(award_point(&mut t, 2, 3), Err(TournamentError::ByeCannotScore(3)));
}

#[test]
fn replayed_confirm_does_not_double_seat() {
    let mut t = started(SIXTEEN);
    confirm_advance(&mut t, 1, 1).unwrap();
    let before = t.clone();
    assert_eq!(
        confirm_advance(&mut t, 1, 1),
        Err(TournamentError::MatchAlreadyDecided(1))
    );
    assert_eq!(t, before);
    assert_eq!(seat_ids(&t, 9), (Some(1), None));

    let replay = apply(&t, &Action::ConfirmAdvance { match_id: 1, winner_id: 1 });
    assert_eq!(replay.state, t);
}

#[test]
fn winner_must_be_seated() {
    let mut t = started(SIXTEEN);
    assert_eq!(
        confirm_advance(&mut t, 1, 5),
        Err(TournamentError::PlayerNotSeated { match_id: 1, player_id: 5 })
    );
    assert_eq!(t.get_match(1).unwrap().winner, None);
}

#[test]
fn proceed_needs_a_decided_winner() {
    let mut t = started(SIXTEEN);
    award_point(&mut t, 1, 1).unwrap();
    assert_eq!(
        proceed_to_next_match(&mut t),
        Err(TournamentError::NoDecidedWinner(1))
    );
}

#[test]
fn bye_matches_advance_only_on_confirmation() {
    let mut t = started("A,B,C,D,E");
    play_current(&mut t);
    play_current(&mut t);
    assert_eq!(t.current_match_id, Some(3));
    assert!(t.is_current_match_bye());
    assert_eq!(proceed_to_next_match(&mut t), Ok(5));
    assert_eq!(seat_ids(&t, 10), (Some(5), None));

    // Match 4 is two byes; whichever is confirmed moves on.
    assert_eq!(t.current_match_id, Some(4));
    assert!(!t.is_current_match_bye());
    assert_eq!(
        proceed_to_next_match(&mut t),
        Err(TournamentError::NoDecidedWinner(4))
    );
    confirm_advance(&mut t, 4, 7).unwrap();
    let m10 = t.get_match(10).unwrap();
    assert_eq!(seat_ids(&t, 10), (Some(5), Some(7)));
    assert!(m10.is_bye_match);
    assert_eq!(m10.bye_winner_id, Some(5));
}

#[test]
fn full_bracket_plays_third_place_before_final() {
    let mut t = started(SIXTEEN);
    let mut order = Vec::new();
    while t.current_match_id.is_some() {
        order.push(play_current(&mut t));
    }
    let mut expected: Vec<MatchId> = (1..=14).collect();
    expected.extend([16, 15]);
    assert_eq!(order, expected);

    let third = t.get_match(THIRD_PLACE_MATCH_ID).unwrap();
    assert_eq!(seat_ids(&t, THIRD_PLACE_MATCH_ID), (Some(5), Some(13)));
    assert_eq!(third.winner, Some(5));
    assert!(is_complete(&t));

    let s = standings(&t);
    assert_eq!(s.first.map(|p| p.name), Some("A".to_string()));
    assert_eq!(s.second.map(|p| p.name), Some("I".to_string()));
    assert_eq!(s.third.map(|p| p.name), Some("E".to_string()));
}

#[test]
fn third_place_waits_for_both_semifinals() {
    let mut t = started(SIXTEEN);
    while t.current_match_id != Some(14) {
        play_current(&mut t);
    }
    // One semifinal done: the loser sits in third place, but the other semifinal comes first.
    assert_eq!(seat_ids(&t, THIRD_PLACE_MATCH_ID), (Some(5), None));
    assert!(!is_complete(&t));
    assert_eq!(standings(&t), Standings::default());
}

#[test]
fn bye_semifinal_losers_leave_third_place_pending() {
    let mut t = started("A,B,C");
    let mut order = Vec::new();
    while t.current_match_id.is_some() {
        order.push(play_current(&mut t));
    }
    // With no real semifinal losers the final follows straight after the semifinals.
    assert_eq!(&order[order.len() - 3..], &[13, 14, 15]);

    let third = t.get_match(THIRD_PLACE_MATCH_ID).unwrap();
    assert!(third.player1.is_none() && third.player2.is_none());
    assert_eq!(third.winner, None);
    assert!(!is_complete(&t));

    let s = standings(&t);
    assert_eq!(s.first.map(|p| p.name), Some("A".to_string()));
    assert_eq!(s.second.map(|p| p.is_bye()), Some(true));
    assert_eq!(s.third, None);
}

#[test]
fn half_seated_match_cannot_be_confirmed_or_scored() {
    let mut t = started(SIXTEEN);
    confirm_advance(&mut t, 1, 1).unwrap();
    assert_eq!(seat_ids(&t, 9), (Some(1), None));

    let before = t.clone();
    assert_eq!(
        confirm_advance(&mut t, 9, 1),
        Err(TournamentError::MatchNotReady(9))
    );
    assert_eq!(award_point(&mut t, 9, 1), Err(TournamentError::MatchNotReady(9)));
    assert_eq!(t, before);
    let replay = apply(&t, &Action::ConfirmAdvance { match_id: 9, winner_id: 1 });
    assert_eq!(replay.state, t);

    // The second feeder still reaches an open match that both players go on to play.
    confirm_advance(&mut t, 2, 3).unwrap();
    assert_eq!(seat_ids(&t, 9), (Some(1), Some(3)));
    assert_eq!(t.get_match(9).unwrap().winner, None);
    assert!(t.get_match(13).unwrap().player1.is_none());
}

#[test]
fn later_semifinal_finishing_first_keeps_arrival_order_in_third_place() {
    let mut t = started(SIXTEEN);
    while t.current_match_id != Some(13) {
        play_current(&mut t);
    }
    assert_eq!(seat_ids(&t, 13), (Some(1), Some(5)));
    assert_eq!(seat_ids(&t, 14), (Some(9), Some(13)));

    award_point(&mut t, 14, 9).unwrap();
    award_point(&mut t, 14, 9).unwrap();
    confirm_advance(&mut t, 14, 9).unwrap();
    assert_eq!(seat_ids(&t, THIRD_PLACE_MATCH_ID), (Some(13), None));
    assert_eq!(t.current_match_id, Some(13));

    award_point(&mut t, 13, 1).unwrap();
    award_point(&mut t, 13, 1).unwrap();
    confirm_advance(&mut t, 13, 1).unwrap();
    assert_eq!(seat_ids(&t, THIRD_PLACE_MATCH_ID), (Some(13), Some(5)));
    assert_eq!(seat_ids(&t, 15), (Some(9), Some(1)));
    assert_eq!(t.current_match_id, Some(THIRD_PLACE_MATCH_ID));

    assert_eq!(play_current(&mut t), THIRD_PLACE_MATCH_ID);
    assert_eq!(t.current_match_id, Some(15));
    play_current(&mut t);
    assert!(is_complete(&t));
    let s = standings(&t);
    assert_eq!(s.first.map(|p| p.id), Some(9));
    assert_eq!(s.second.map(|p| p.id), Some(1));
    assert_eq!(s.third.map(|p| p.id), Some(13));
}
