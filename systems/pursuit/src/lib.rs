#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pursuit system that drives adversary behaviour.
//!
//! Adversaries approach their quarry greedily: each axis closes the gap by at
//! most the adversary's speed and never steps past the target. There is no
//! pathfinding and no obstacle avoidance; collision filtering happens later
//! when the world applies the proposed destination.

use pharcobial_core::{Position, Rect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Odds that a dormant bush comes alive when the player wanders close.
pub const AMBUSH_ODDS: (u32, u32) = (1, 3);

/// Moves `from` toward `to` by at most `speed`, never overshooting.
#[must_use]
pub fn chase_axis(from: i32, to: i32, speed: i32) -> i32 {
    let delta = to - from;
    let step = delta.abs().min(speed.max(0));
    from + delta.signum() * step
}

/// Proposes the next position for an adversary chasing `target`.
///
/// Both axes are handled independently, so diagonal approaches move on both
/// axes in the same step.
#[must_use]
pub fn chase_step(from: Position, target: Position, speed: i32) -> Position {
    Position::new(
        chase_axis(from.x(), target.x(), speed),
        chase_axis(from.y(), target.y(), speed),
    )
}

/// Enlarged box an adversary uses to notice the player.
///
/// The collision box is grown by its own height horizontally and its own
/// width vertically, keeping the center fixed.
#[must_use]
pub fn vision(hitbox: Rect) -> Rect {
    hitbox.inflate(hitbox.height(), hitbox.width())
}

/// Reports whether `player` stands inside the vision box derived from `hitbox`.
#[must_use]
pub fn sees(hitbox: Rect, player: Rect) -> bool {
    vision(hitbox).intersects(&player)
}

/// Source of yes/no decisions for probabilistic behaviour.
pub trait Trigger {
    /// Rolls once, returning `true` when the behaviour should fire.
    fn fire(&mut self) -> bool;
}

/// Trigger that always returns the same outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTrigger(pub bool);

impl Trigger for FixedTrigger {
    fn fire(&mut self) -> bool {
        self.0
    }
}

/// Seeded random trigger deciding whether a bush ambushes the player.
#[derive(Clone, Debug)]
pub struct Ambush {
    rng: ChaCha8Rng,
    numerator: u32,
    denominator: u32,
}

impl Ambush {
    /// Creates a deterministic trigger with the default one-in-three odds.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_odds(seed, AMBUSH_ODDS.0, AMBUSH_ODDS.1)
    }

    /// Creates a trigger seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            numerator: AMBUSH_ODDS.0,
            denominator: AMBUSH_ODDS.1,
        }
    }

    /// Creates a deterministic trigger firing `numerator` times in `denominator`.
    ///
    /// A zero denominator is treated as one, and the numerator is clamped so
    /// the odds never exceed certainty.
    #[must_use]
    pub fn with_odds(seed: u64, numerator: u32, denominator: u32) -> Self {
        let denominator = denominator.max(1);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            numerator: numerator.min(denominator),
            denominator,
        }
    }
}

impl Trigger for Ambush {
    fn fire(&mut self) -> bool {
        self.rng.gen_ratio(self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharcobial_core::BLOCK_SIZE;

    #[test]
    fn chase_axis_stops_on_target() {
        assert_eq!(chase_axis(10, 12, 6), 12);
        assert_eq!(chase_axis(12, 10, 6), 10);
        assert_eq!(chase_axis(10, 10, 6), 10);
        assert_eq!(chase_axis(0, 100, 6), 6);
        assert_eq!(chase_axis(0, -100, 6), -6);
    }

    #[test]
    fn negative_speed_does_not_retreat() {
        assert_eq!(chase_axis(0, 100, -3), 0);
    }

    #[test]
    fn vision_covers_adjacent_block() {
        let hitbox = Rect::block(Position::from_tile(3, 3));
        let adjacent = Rect::block(Position::from_tile(4, 3));
        let far = Rect::block(Position::from_tile(6, 3));

        assert!(sees(hitbox, adjacent));
        assert!(!sees(hitbox, far));
        assert_eq!(vision(hitbox).width(), BLOCK_SIZE * 2);
    }

    #[test]
    fn with_odds_clamps_degenerate_configuration() {
        let mut certain = Ambush::with_odds(7, 5, 0);
        assert!((0..10).all(|_| certain.fire()));

        let mut never = Ambush::with_odds(7, 0, 3);
        assert!((0..10).all(|_| !never.fire()));
    }
}
