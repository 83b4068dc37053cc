//! Discrete-time gravity simulation for a released sprite.
//!
//! Each tick adds a constant acceleration to the velocity and advances the
//! sprite by the rounded velocity, until the next step would reach or pass the
//! resting line. The sprite then snaps exactly onto the line.

use crate::app::session::Generation;
use crate::domain::WindowPosition;

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStep {
    /// Still airborne at this position.
    Moved(WindowPosition),
    /// Snapped onto the resting line; the simulation is over.
    Landed(WindowPosition),
}

impl FallStep {
    #[must_use]
    pub const fn position(&self) -> WindowPosition {
        match self {
            Self::Moved(p) | Self::Landed(p) => *p,
        }
    }
}

/// Upper bound on ticks for a fall of `distance` pixels.
///
/// Uniform acceleration covers `distance` in `sqrt(2 * distance / acceleration)`
/// ticks; two extra ticks absorb rounding. A non-positive acceleration would
/// never arrive, so it is bounded to a single tick.
///
/// # Examples
///
/// ```
/// use ping_pet::app::physics::max_ticks;
///
/// assert_eq!(max_ticks(535, 0.5), 49);
/// assert_eq!(max_ticks(100, 0.0), 1);
/// assert_eq!(max_ticks(0, 0.5), 1);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn max_ticks(distance: i32, acceleration: f64) -> u32 {
    if distance <= 0 || acceleration <= 0.0 || !acceleration.is_finite() {
        return 1;
    }
    let ticks = (2.0 * f64::from(distance) / acceleration).sqrt().ceil();
    (ticks as u32).saturating_add(2)
}

/// State of one fall, from release to landing.
#[derive(Debug, Clone, PartialEq)]
pub struct FallSession {
    generation: Generation,
    x: i32,
    current_y: i32,
    target_y: i32,
    velocity: f64,
    acceleration: f64,
    ticks: u32,
    max_ticks: u32,
}

impl FallSession {
    /// Starts a fall from `from` towards `target_y`.
    ///
    /// Returns `None` if the sprite is already at or below the target, in
    /// which case there is nothing to simulate.
    #[must_use]
    pub fn start(from: WindowPosition, target_y: i32, acceleration: f64, generation: Generation) -> Option<Self> {
        if from.y >= target_y {
            return None;
        }

        Some(Self {
            generation,
            x: from.x,
            current_y: from.y,
            target_y,
            velocity: 0.0,
            acceleration,
            ticks: 0,
            max_ticks: max_ticks(target_y - from.y, acceleration),
        })
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub const fn position(&self) -> WindowPosition {
        WindowPosition::new(self.x, self.current_y)
    }

    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advances the simulation by one tick.
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&mut self) -> FallStep {
        self.ticks += 1;
        self.velocity += self.acceleration;

        let advance = self.velocity.round();
        let candidate = if advance.is_finite() {
            i64::from(self.current_y) + advance as i64
        } else {
            i64::from(self.target_y)
        };

        if candidate >= i64::from(self.target_y) || self.ticks >= self.max_ticks {
            if self.ticks >= self.max_ticks && candidate < i64::from(self.target_y) {
                tracing::debug!(ticks = self.ticks, "fall tick bound reached, snapping to resting line");
            }
            self.current_y = self.target_y;
            FallStep::Landed(self.position())
        } else {
            // candidate < target_y, so it fits in i32
            self.current_y = candidate as i32;
            FallStep::Moved(self.position())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_resting_does_not_start() {
        let g = Generation::default();
        assert!(FallSession::start(WindowPosition::new(50, 1035), 1035, 0.5, g).is_none());
        assert!(FallSession::start(WindowPosition::new(50, 1100), 1035, 0.5, g).is_none());
    }

    #[test]
    fn first_ticks_follow_rounded_velocity() {
        let mut fall = FallSession::start(WindowPosition::new(50, 500), 1035, 0.5, Generation::default()).unwrap();

        // round(0.5) = 1, round(1.0) = 1, round(1.5) = 2
        assert_eq!(fall.step(), FallStep::Moved(WindowPosition::new(50, 501)));
        assert_eq!(fall.step(), FallStep::Moved(WindowPosition::new(50, 502)));
        assert_eq!(fall.step(), FallStep::Moved(WindowPosition::new(50, 504)));
        assert!((fall.velocity() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn lands_exactly_on_target_within_bound() {
        let mut fall = FallSession::start(WindowPosition::new(50, 500), 1035, 0.5, Generation::default()).unwrap();
        let bound = max_ticks(535, 0.5);

        let landed = loop {
            match fall.step() {
                FallStep::Moved(p) => assert!(p.y < 1035),
                FallStep::Landed(p) => break p,
            }
            assert!(fall.ticks() < bound);
        };

        assert_eq!(landed, WindowPosition::new(50, 1035));
        assert_eq!(fall.ticks(), 46);
    }

    #[test]
    fn non_positive_acceleration_snaps_immediately() {
        let mut fall = FallSession::start(WindowPosition::new(0, 0), 1035, 0.0, Generation::default()).unwrap();
        assert_eq!(fall.step(), FallStep::Landed(WindowPosition::new(0, 1035)));
    }
}
