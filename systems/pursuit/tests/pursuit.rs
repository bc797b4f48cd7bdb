use pharcobial_core::{Position, Rect, BLOCK_SIZE};
use pharcobial_system_pursuit::{chase_axis, chase_step, sees, Ambush, Trigger};

#[test]
fn chase_step_never_overshoots() {
    for speed in [1, 2, 6, 32] {
        for delta in -70..=70 {
            let next = chase_axis(0, delta, speed);
            let expected = delta.signum() * delta.abs().min(speed);
            assert_eq!(next, expected, "delta {delta} speed {speed}");

            let remaining_before = delta.abs();
            let remaining_after = (delta - next).abs();
            assert!(remaining_after <= remaining_before);
            assert!(
                (delta - next).signum() * delta.signum() >= 0,
                "crossed the target for delta {delta} speed {speed}"
            );
        }
    }
}

#[test]
fn chase_step_moves_axes_independently() {
    let from = Position::new(100, 100);
    let target = Position::new(103, 40);

    let next = chase_step(from, target, 6);

    assert_eq!(next, Position::new(103, 94));
}

#[test]
fn repeated_steps_converge_on_target() {
    let target = Position::new(-45, 71);
    let mut current = Position::new(20, 3);
    for _ in 0..100 {
        current = chase_step(current, target, 6);
    }

    assert_eq!(current, target);
}

#[test]
fn seeded_ambush_is_deterministic() {
    let mut first = Ambush::seeded(0x5eed);
    let mut second = Ambush::seeded(0x5eed);

    let left: Vec<bool> = (0..64).map(|_| first.fire()).collect();
    let right: Vec<bool> = (0..64).map(|_| second.fire()).collect();

    assert_eq!(left, right);
}

#[test]
fn ambush_fires_roughly_one_in_three() {
    let mut ambush = Ambush::seeded(0x0bad_5eed);
    let rolls = 6_000;
    let fired = (0..rolls).filter(|_| ambush.fire()).count();
    let ratio = fired as f64 / rolls as f64;

    assert!(
        (0.28..0.39).contains(&ratio),
        "ambush fired {fired} times out of {rolls}"
    );
}

#[test]
fn player_two_blocks_away_is_out_of_sight() {
    let bush = Rect::block(Position::from_tile(5, 5));
    let near = Rect::block(Position::new(5 * BLOCK_SIZE + BLOCK_SIZE + 10, 5 * BLOCK_SIZE));
    let far = Rect::block(Position::from_tile(7, 5));

    assert!(sees(bush, near));
    assert!(!sees(bush, far));
}
