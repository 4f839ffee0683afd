use nalgebra as na;

/// Column layout used by the integrators: [y, ẏ, x, ẋ].
pub type StateVector = na::Vector4<f64>;

/// Planar state of the descending body.
/// `y` is the height above the ground reference (apogee at start, 0 at impact).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub y: f64,     // m
    pub y_dot: f64, // m/s
    pub x: f64,     // m
    pub x_dot: f64, // m/s
}

impl State {
    pub fn new(y: f64, y_dot: f64, x: f64, x_dot: f64) -> Self {
        State { y, y_dot, x, x_dot }
    }

    /// At rest at the top of the trajectory.
    pub fn at_apogee(apogee: f64) -> Self {
        State::new(apogee, 0.0, 0.0, 0.0)
    }

    /// Velocity as (ẋ, ẏ).
    pub fn velocity(&self) -> na::Vector2<f64> {
        na::Vector2::new(self.x_dot, self.y_dot)
    }

    pub fn speed(&self) -> f64 {
        self.velocity().magnitude()
    }
}

impl From<StateVector> for State {
    fn from(v: StateVector) -> Self {
        State::new(v[0], v[1], v[2], v[3])
    }
}

impl From<State> for StateVector {
    fn from(s: State) -> Self {
        StateVector::new(s.y, s.y_dot, s.x, s.x_dot)
    }
}

impl std::ops::Add for State {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        State {
            y: self.y + other.y,
            y_dot: self.y_dot + other.y_dot,
            x: self.x + other.x,
            x_dot: self.x_dot + other.x_dot,
        }
    }
}

impl std::ops::Mul<f64> for State {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        State {
            y: self.y * scalar,
            y_dot: self.y_dot * scalar,
            x: self.x * scalar,
            x_dot: self.x_dot * scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn vector_layout_is_y_ydot_x_xdot() {
        let state = State::new(1.0, 2.0, 3.0, 4.0);
        let v: StateVector = state.into();
        assert_eq!(v, StateVector::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(State::from(v), state);
    }

    #[test]
    fn speed_combines_both_components() {
        let state = State::new(100.0, -4.0, 0.0, 3.0);
        assert_abs_diff_eq!(state.speed(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = State::new(1.0, 2.0, 3.0, 4.0);
        let b = State::at_apogee(10.0);
        assert_eq!(a + b * 2.0, State::new(21.0, 2.0, 3.0, 4.0));
    }
}
