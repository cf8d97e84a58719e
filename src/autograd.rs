use ndarray::{Array, DimMax, Dimension};

use crate::{
    error::Result,
    gradient::Gradient,
    utils::{Broadcast, Shared},
};

/// Behavior common to every differentiable operation node.
///
/// A node is created for one position in the computation graph and lives
/// through a strict two-phase lifecycle: `forward` runs exactly once,
/// capturing whatever its backward formula needs, then `backward` runs
/// exactly once, consuming that state. Violating the ordering fails closed
/// with [`crate::Error::InvalidState`].
pub trait Function {
    /// Operation name, used to identify the failing node in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether forward overwrote one of its inputs in place.
    ///
    /// The executor must treat dirtied storage as no longer holding its
    /// original value.
    fn dirtied(&self) -> bool {
        false
    }
}

/// Differentiable operations over a single tensor input.
///
/// `SLOTS` counts the gradient slots `backward` returns: the tensor input
/// plus any scalar forward parameters the operation carries (clamp bounds,
/// comparison constants). Slots for scalar parameters always yield
/// [`Gradient::NotDifferentiable`].
pub trait UnaryFunction<D, const SLOTS: usize = 1>: Function
where
    D: Dimension,
{
    /// Computes the output value, capturing the state backward needs.
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>>;

    /// Maps the gradient with respect to the output into one gradient slot
    /// per input.
    ///
    /// `needs_input_grad` is supplied by the executor; slots whose flag is
    /// false come back as [`Gradient::NotRequired`] and their computation
    /// is skipped.
    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; SLOTS],
    ) -> Result<[Gradient<D>; SLOTS]>;
}

/// Differentiable operations over a broadcast pair of tensors.
///
/// The output takes the broadcast shape of the two operands; each returned
/// gradient is reduced back to its operand's shape by summing over the
/// broadcast axes.
pub trait BinaryFunction<D, E>: Function
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn forward(
        &self,
        left: &Shared<Array<f32, D>>,
        right: &Shared<Array<f32, E>>,
    ) -> Result<Shared<Array<f32, Broadcast<D, E>>>>;

    fn backward(
        &self,
        grad_output: &Array<f32, Broadcast<D, E>>,
        needs_input_grad: [bool; 2],
    ) -> Result<(Gradient<D>, Gradient<E>)>;
}

/// Differentiable operations over three same-shape tensors.
pub trait TernaryFunction<D>: Function
where
    D: Dimension,
{
    fn forward(
        &self,
        add: &Shared<Array<f32, D>>,
        first: &Shared<Array<f32, D>>,
        second: &Shared<Array<f32, D>>,
    ) -> Result<Shared<Array<f32, D>>>;

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 3],
    ) -> Result<[Gradient<D>; 3]>;
}
