//! Prediction against an authoritative re-simulation of the same inputs:
//! when server and client share the movement model and fixed step, a
//! reconciliation against an honest server is a no-op, and a corrected one
//! replays deterministically.

use outbreak_client::Predictor;
use outbreak_shared::{step_movement, MoveInput, Vec2};

use outbreak_test::STEP;

const SPEED: f32 = 80.0;

fn inputs() -> Vec<MoveInput> {
    // A wandering path: right, diagonal, idle, down.
    let mut seq = Vec::new();
    seq.extend(std::iter::repeat(MoveInput::new(false, false, false, true)).take(20));
    seq.extend(std::iter::repeat(MoveInput::new(true, false, false, true)).take(12));
    seq.extend(std::iter::repeat(MoveInput::default()).take(6));
    seq.extend(std::iter::repeat(MoveInput::new(false, true, false, false)).take(8));
    seq
}

#[test]
fn honest_server_correction_changes_nothing() {
    let start = Vec2::new(100.0, 100.0);
    let mut predictor = Predictor::new(start, SPEED, STEP, 128);

    // The server runs the same inputs through the same shared model.
    let mut server_pos = start;
    for (seq, input) in inputs().into_iter().enumerate() {
        predictor.advance(STEP, input);
        if seq <= 41 {
            server_pos = step_movement(server_pos, input, SPEED, STEP);
        }
    }
    let predicted = predictor.position();

    // The server agrees with the recorded prediction, so no correction is
    // applied and the position is untouched.
    assert!(!predictor.reconcile(41, server_pos));
    assert_eq!(predictor.position(), predicted);
}

#[test]
fn corrected_ack_rebases_then_replays_unacked_inputs() {
    let mut predictor = Predictor::new(Vec2::ZERO, SPEED, STEP, 128);
    let inputs = inputs();
    for input in &inputs {
        predictor.advance(STEP, *input);
    }
    assert_eq!(predictor.next_seq(), 46);

    // Server disagrees about where input 41 landed.
    let corrected = Vec2::new(5.0, 5.0);
    assert!(predictor.reconcile(41, corrected));

    // A fresh simulation from the corrected position over inputs 42..=45
    // must land in exactly the same place.
    let mut expected = corrected;
    for input in &inputs[42..] {
        expected = step_movement(expected, *input, SPEED, STEP);
    }
    assert_eq!(predictor.position(), expected);
}

#[test]
fn duplicate_acks_are_absorbed() {
    let mut predictor = Predictor::new(Vec2::ZERO, SPEED, STEP, 128);
    for input in inputs() {
        predictor.advance(STEP, input);
    }

    assert!(predictor.reconcile(41, Vec2::new(5.0, 5.0)));
    let settled = predictor.position();

    assert!(!predictor.reconcile(41, Vec2::new(5.0, 5.0)));
    assert!(!predictor.reconcile(30, Vec2::new(-50.0, 0.0)));
    assert_eq!(predictor.position(), settled);
}

#[test]
fn prediction_continues_after_reconciliation() {
    let mut predictor = Predictor::new(Vec2::ZERO, SPEED, STEP, 128);
    for input in inputs() {
        predictor.advance(STEP, input);
    }
    predictor.reconcile(41, Vec2::new(5.0, 5.0));

    let before = predictor.position();
    let right = MoveInput::new(false, false, false, true);
    let stepped = predictor.advance(STEP, right);
    assert_eq!(stepped, vec![46]);
    assert_eq!(predictor.position(), step_movement(before, right, SPEED, STEP));
}
