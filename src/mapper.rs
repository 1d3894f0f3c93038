//! Mapping of the filtered angle to a paddle position.

/// Normalized paddle position for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleCommand {
    /// Position between 0.0 (at `angle_up`) and 1.0 (at `angle_down`).
    pub position: f32,
    /// Whether the angle was outside of the configured range and the position had to be clamped.
    ///
    /// This means that the player is at a physical extreme.
    pub clamped: bool,
}

/// Linearly maps angles between `angle_up` and `angle_down` to paddle positions.
///
/// `angle_up` may be larger than `angle_down`, which inverts the direction of control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlMapper {
    angle_up: f32,
    angle_down: f32,
}

impl ControlMapper {
    pub const DEFAULT_ANGLE_UP: f32 = 100.0;
    pub const DEFAULT_ANGLE_DOWN: f32 = 250.0;

    /// # Panics
    ///
    /// This method panics if either bound is not finite or if both bounds are equal.
    pub fn new(angle_up: f32, angle_down: f32) -> Self {
        assert!(angle_up.is_finite() && angle_down.is_finite());
        assert_ne!(angle_up, angle_down, "angle range must not be empty");
        Self {
            angle_up,
            angle_down,
        }
    }

    #[inline]
    pub fn angle_up(&self) -> f32 {
        self.angle_up
    }

    #[inline]
    pub fn angle_down(&self) -> f32 {
        self.angle_down
    }

    /// Maps a filtered angle (in degrees) to a paddle command.
    pub fn map(&self, filtered: f32) -> PaddleCommand {
        let ratio = (filtered - self.angle_up) / (self.angle_down - self.angle_up);
        let position = ratio.clamp(0.0, 1.0);
        PaddleCommand {
            position,
            clamped: position != ratio,
        }
    }
}

impl Default for ControlMapper {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ANGLE_UP, Self::DEFAULT_ANGLE_DOWN)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn maps_and_clamps() {
        let mapper = ControlMapper::new(100.0, 250.0);
        assert_eq!(
            mapper.map(50.0),
            PaddleCommand {
                position: 0.0,
                clamped: true
            }
        );
        assert_eq!(
            mapper.map(175.0),
            PaddleCommand {
                position: 0.5,
                clamped: false
            }
        );
        assert_eq!(
            mapper.map(300.0),
            PaddleCommand {
                position: 1.0,
                clamped: true
            }
        );
    }

    #[test]
    fn bounds_are_not_clamped() {
        let mapper = ControlMapper::default();
        assert_eq!(mapper.map(100.0).position, 0.0);
        assert!(!mapper.map(100.0).clamped);
        assert_eq!(mapper.map(250.0).position, 1.0);
        assert!(!mapper.map(250.0).clamped);
    }

    #[test]
    fn inverted_range() {
        let mapper = ControlMapper::new(250.0, 100.0);
        assert_relative_eq!(mapper.map(220.0).position, 0.2);
        assert_eq!(mapper.map(260.0).position, 0.0);
        assert!(mapper.map(260.0).clamped);
        assert_eq!(mapper.map(90.0).position, 1.0);
        assert!(mapper.map(90.0).clamped);
    }

    #[test]
    #[should_panic]
    fn empty_range() {
        ControlMapper::new(120.0, 120.0);
    }
}
