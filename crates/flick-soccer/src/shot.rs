//! Slingshot shots: turning a drag gesture into a launch velocity.

use glam::Vec2;
use rand::Rng;

use crate::config::ShotConfig;

/// A drag in progress: from the selected body to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    /// Position of the selected body when the drag began.
    pub origin: Vec2,
    /// Current pointer position.
    pub pointer: Vec2,
}

impl Gesture {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            pointer: origin,
        }
    }

    /// Pull vector, pointer to origin. The body flies this way.
    pub fn pull(&self) -> Vec2 {
        self.origin - self.pointer
    }

    pub fn distance(&self) -> f32 {
        self.pull().length()
    }
}

/// Launch parameters for the selected body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub velocity: Vec2,
    pub spin: f32,
}

/// What a release at the current pointer would do, for drawing the aim line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPreview {
    /// Unit launch direction.
    pub direction: Vec2,
    /// Fraction of full power, `0..=1`.
    pub power: f32,
    pub velocity: Vec2,
    /// Pointer position clamped to the maximum drag distance.
    pub clamped_pointer: Vec2,
}

/// Launch direction and power, or `None` when the drag is too short to count.
pub fn aim(gesture: &Gesture, config: &ShotConfig) -> Option<AimPreview> {
    let pull = gesture.pull();
    let distance = pull.length();
    if !distance.is_finite() || distance <= config.min_drag || distance <= f32::EPSILON {
        return None;
    }

    let direction = pull / distance;
    let capped = distance.min(config.max_drag);
    let power = capped / config.max_drag;
    Some(AimPreview {
        direction,
        power,
        velocity: direction * power * config.force_multiplier,
        clamped_pointer: gesture.origin - direction * capped,
    })
}

/// Resolve a release into a shot with a little random spin.
pub fn resolve<R: Rng + ?Sized>(gesture: &Gesture, config: &ShotConfig, rng: &mut R) -> Option<Shot> {
    let preview = aim(gesture, config)?;
    let spin = (rng.gen::<f32>() - 0.5) * config.spin_factor;
    Some(Shot {
        velocity: preview.velocity,
        spin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drag(origin: Vec2, pointer: Vec2) -> Gesture {
        Gesture { origin, pointer }
    }

    #[test]
    fn short_drags_are_ignored() {
        let config = ShotConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let origin = Vec2::new(100.0, 100.0);

        assert!(resolve(&Gesture::new(origin), &config, &mut rng).is_none());
        assert!(resolve(&drag(origin, origin + Vec2::new(5.0, 0.0)), &config, &mut rng).is_none());
        assert!(resolve(&drag(origin, origin + Vec2::new(5.5, 0.0)), &config, &mut rng).is_some());
    }

    #[test]
    fn flies_away_from_the_pointer() {
        let config = ShotConfig::default();
        let preview = aim(&drag(Vec2::new(240.0, 200.0), Vec2::new(240.0, 250.0)), &config).unwrap();

        assert_eq!(preview.direction, Vec2::new(0.0, -1.0));
        assert!((preview.power - 0.5).abs() < 1e-6);
        assert!((preview.velocity.y + 5.0).abs() < 1e-5);
    }

    #[test]
    fn power_caps_at_max_drag() {
        let config = ShotConfig::default();
        let origin = Vec2::new(100.0, 100.0);
        let preview = aim(&drag(origin, origin + Vec2::new(300.0, 0.0)), &config).unwrap();

        assert_eq!(preview.power, 1.0);
        assert!((preview.velocity.length() - config.force_multiplier).abs() < 1e-5);
        assert!((preview.clamped_pointer - Vec2::new(200.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn spin_stays_within_range() {
        let config = ShotConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let gesture = drag(Vec2::ZERO, Vec2::new(30.0, 40.0));

        for _ in 0..200 {
            let shot = resolve(&gesture, &config, &mut rng).unwrap();
            assert!(shot.spin.abs() <= config.spin_factor / 2.0);
            assert!((shot.velocity.length() - 5.0).abs() < 1e-5);
        }
    }
}
