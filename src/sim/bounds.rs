//! Edge reflection and clamping against the viewport rectangle
//!
//! Axes are handled independently: a body reaching a corner reflects both
//! velocity components in the same tick.

use glam::Vec2;

/// Reflect a single axis against `[0, max]`.
///
/// Touching or crossing either edge negates the velocity component and
/// clamps the position back inside. Returns true on contact.
#[inline]
pub fn reflect_axis(pos: &mut f32, vel: &mut f32, max: f32) -> bool {
    if *pos <= 0.0 || *pos >= max {
        *vel = -*vel;
        *pos = pos.clamp(0.0, max);
        true
    } else {
        false
    }
}

/// Which edges were touched during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeContact {
    pub x: bool,
    pub y: bool,
}

/// Reflect both axes of a position/velocity pair against `[0, max]`
pub fn reflect(pos: &mut Vec2, vel: &mut Vec2, max: Vec2) -> EdgeContact {
    EdgeContact {
        x: reflect_axis(&mut pos.x, &mut vel.x, max.x),
        y: reflect_axis(&mut pos.y, &mut vel.y, max.y),
    }
}

/// Pull a position back under `max` without touching the lower bound
#[inline]
pub fn clamp_upper(pos: Vec2, max: Vec2) -> Vec2 {
    pos.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_axis_far_edge() {
        let mut pos = 792.0;
        let mut vel = 2.0;
        assert!(reflect_axis(&mut pos, &mut vel, 740.0));
        assert_eq!(pos, 740.0);
        assert_eq!(vel, -2.0);
    }

    #[test]
    fn test_reflect_axis_near_edge() {
        let mut pos = -0.5;
        let mut vel = -1.0;
        assert!(reflect_axis(&mut pos, &mut vel, 740.0));
        assert_eq!(pos, 0.0);
        assert_eq!(vel, 1.0);
    }

    #[test]
    fn test_reflect_axis_touching_counts() {
        let mut pos = 0.0;
        let mut vel = 0.7;
        assert!(reflect_axis(&mut pos, &mut vel, 100.0));
        assert_eq!(vel, -0.7);
        assert_eq!(pos, 0.0);
    }

    #[test]
    fn test_reflect_axis_interior_untouched() {
        let mut pos = 50.0;
        let mut vel = 1.25;
        assert!(!reflect_axis(&mut pos, &mut vel, 100.0));
        assert_eq!(pos, 50.0);
        assert_eq!(vel, 1.25);
    }

    #[test]
    fn test_corner_reflects_both() {
        let mut pos = Vec2::new(101.0, 101.0);
        let mut vel = Vec2::new(1.0, 1.0);
        let contact = reflect(&mut pos, &mut vel, Vec2::splat(100.0));
        assert!(contact.x && contact.y);
        assert_eq!(pos, Vec2::splat(100.0));
        assert_eq!(vel, Vec2::splat(-1.0));
    }

    #[test]
    fn test_clamp_upper_keeps_lower() {
        assert_eq!(
            clamp_upper(Vec2::new(500.0, -3.0), Vec2::new(340.0, 200.0)),
            Vec2::new(340.0, -3.0)
        );
    }
}
