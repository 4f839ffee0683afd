use crate::models::State;

/// Scalar function whose zero crossings mark an event.
pub trait EventFunction<S> {
    fn eval(&self, t: f64, state: &S) -> f64;
}

impl<S, F> EventFunction<S> for F
where
    F: Fn(f64, &S) -> f64,
{
    fn eval(&self, t: f64, state: &S) -> f64 {
        self(t, state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDirection {
    /// From negative to positive.
    Rising,
    /// From positive to negative.
    Falling,
    Either,
}

impl EventDirection {
    /// Whether `g` moved across zero in this direction over one step.
    pub fn crossed(&self, g_old: f64, g_new: f64) -> bool {
        let falling = g_old >= 0.0 && g_new <= 0.0 && g_new < g_old;
        let rising = g_old <= 0.0 && g_new >= 0.0 && g_new > g_old;

        match self {
            EventDirection::Rising => rising,
            EventDirection::Falling => falling,
            EventDirection::Either => rising || falling,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpec {
    pub direction: EventDirection,
    /// Stop the integration at the first located crossing.
    pub terminal: bool,
}

/// A located crossing and the interpolated state there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord<S> {
    pub t: f64,
    pub state: S,
}

/// Fires when the body comes down through `y = 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundContact;

impl GroundContact {
    pub const SPEC: EventSpec = EventSpec {
        direction: EventDirection::Falling,
        terminal: true,
    };
}

impl EventFunction<State> for GroundContact {
    fn eval(&self, _t: f64, state: &State) -> f64 {
        state.y
    }
}
