use eyecal_core::Real;
use nalgebra::DVector;

/// Scalar objective over a fixed-dimension parameter vector.
///
/// The swarm only ever calls [`CostFunction::evaluate`] with vectors of length
/// [`CostFunction::dim`], already clamped into the search bounds.
pub trait CostFunction {
    /// Number of parameters in the optimization vector.
    fn dim(&self) -> usize;
    /// Cost for the given parameters; lower is better.
    fn evaluate(&self, x: &DVector<Real>) -> Real;
}

impl<C: CostFunction + ?Sized> CostFunction for &C {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn evaluate(&self, x: &DVector<Real>) -> Real {
        (**self).evaluate(x)
    }
}

/// Adapter turning a closure into a [`CostFunction`].
///
/// ```
/// use eyecal_optim::{CostFunction, FnCost};
/// use nalgebra::DVector;
///
/// let sphere = FnCost::new(3, |x: &DVector<f64>| x.norm_squared());
/// assert_eq!(sphere.evaluate(&DVector::from_element(3, 1.0)), 3.0);
/// ```
pub struct FnCost<F> {
    dim: usize,
    f: F,
}

impl<F> FnCost<F>
where
    F: Fn(&DVector<Real>) -> Real,
{
    pub fn new(dim: usize, f: F) -> Self {
        Self { dim, f }
    }
}

impl<F> CostFunction for FnCost<F>
where
    F: Fn(&DVector<Real>) -> Real,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn evaluate(&self, x: &DVector<Real>) -> Real {
        (self.f)(x)
    }
}
