use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Floating-point types the growth law and its integrator can run on.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Right-hand side of dx/dt = f(t, x).
pub trait VectorField<T: Scalar> {
    /// Number of state variables.
    fn dimension(&self) -> usize;

    /// Writes f(t, x) into `out`.
    fn derivative(&self, t: T, x: &[T], out: &mut [T]);
}

/// Fixed-step integrators.
pub trait Integrator<T: Scalar> {
    /// Advances `state` from `t` to `t + dt` in place and moves `t` along.
    fn advance(&mut self, field: &impl VectorField<T>, t: &mut T, state: &mut [T], dt: T);
}
