use ndarray::{Array, Dimension};

/// One slot of a backward result.
///
/// Backward returns exactly one slot per forward input, in input order. The
/// three cases are distinct at the type level: a computed gradient, a
/// gradient the executor did not ask for, and a slot that can never carry a
/// gradient because the corresponding input is a non-differentiable
/// parameter (clamp bounds, comparison constants). The latter two are never
/// rendered as zero-filled tensors; "not needed" and "gradient is exactly
/// zero" must stay distinguishable.
#[derive(Debug, Clone)]
pub enum Gradient<D>
where
    D: Dimension,
{
    /// Gradient of the loss with respect to this input.
    Tensor(Array<f32, D>),
    /// The executor's `needs_input_grad` flag for this slot was false.
    NotRequired,
    /// The slot holds a structurally non-differentiable parameter.
    NotDifferentiable,
}

impl<D> Gradient<D>
where
    D: Dimension,
{
    /// Returns the computed gradient, if this slot carries one.
    pub fn into_tensor(self) -> Option<Array<f32, D>> {
        match self {
            Self::Tensor(tensor) => Some(tensor),
            _ => None,
        }
    }

    pub fn is_not_required(&self) -> bool {
        matches!(self, Self::NotRequired)
    }

    pub fn is_not_differentiable(&self) -> bool {
        matches!(self, Self::NotDifferentiable)
    }
}
