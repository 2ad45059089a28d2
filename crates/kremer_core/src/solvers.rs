use crate::traits::{Integrator, Scalar, VectorField};

/// Explicit first-order Euler stepper.
///
/// y_next = y + dt * f(t, y). No error control: the step size alone decides
/// how closely the discrete trajectory tracks the flow.
pub struct ForwardEuler<T: Scalar> {
    deriv: Vec<T>,
}

impl<T: Scalar> ForwardEuler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            deriv: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Integrator<T> for ForwardEuler<T> {
    fn advance(&mut self, field: &impl VectorField<T>, t: &mut T, state: &mut [T], dt: T) {
        field.derivative(*t, state, &mut self.deriv);

        for i in 0..state.len() {
            state[i] = state[i] + dt * self.deriv[i];
        }

        *t = *t + dt;
    }
}

#[cfg(test)]
mod tests {
    use super::ForwardEuler;
    use crate::traits::{Integrator, VectorField};

    struct Decay {
        rate: f64,
    }

    impl VectorField<f64> for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn derivative(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = -self.rate * x[0];
        }
    }

    #[test]
    fn forward_euler_takes_a_single_explicit_step() {
        let system = Decay { rate: 0.5 };
        let mut stepper = ForwardEuler::new(system.dimension());
        let mut t = 1.0;
        let mut state = [2.0];

        stepper.advance(&system, &mut t, &mut state, 0.1);

        assert!((state[0] - (2.0 - 0.1 * 0.5 * 2.0)).abs() < 1e-15);
        assert!((t - 1.1).abs() < 1e-15);
    }

    #[test]
    fn forward_euler_works_in_single_precision() {
        let system = SquareLaw;
        let mut stepper = ForwardEuler::<f32>::new(1);
        let mut t = 0.0_f32;
        let mut state = [1.0_f32];

        stepper.advance(&system, &mut t, &mut state, 0.5);

        assert_eq!(state[0], 1.5);
    }

    struct SquareLaw;

    impl VectorField<f32> for SquareLaw {
        fn dimension(&self) -> usize {
            1
        }

        fn derivative(&self, _t: f32, x: &[f32], out: &mut [f32]) {
            out[0] = x[0] * x[0];
        }
    }
}
