use ndarray::{Array, DimMax, Dimension, Zip};

use crate::{
    autograd::{BinaryFunction, Function},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{cobroadcast, cobroadcasted_zeros, new_shared, reduced, Broadcast, Shared},
};

/// Linear interpolation `left + (right - left) * weight`.
///
/// The weight is an immutable construction parameter; only the operand
/// shapes are saved for backward.
pub struct Lerp<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    weight: f32,
    saved: Saved<(D, E)>,
}

impl<D, E> Lerp<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    pub fn new(weight: f32) -> Self {
        Self {
            weight,
            saved: Saved::new("lerp"),
        }
    }
}

impl<D, E> Function for Lerp<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D, E> BinaryFunction<D, E> for Lerp<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn forward(
        &self,
        left: &Shared<Array<f32, D>>,
        right: &Shared<Array<f32, E>>,
    ) -> Result<Shared<Array<f32, Broadcast<D, E>>>> {
        let (left, right) = (left.borrow(), right.borrow());

        let mut data = cobroadcasted_zeros(&left, &right);
        Zip::from(&mut data)
            .and_broadcast(&*left)
            .and_broadcast(&*right)
            .for_each(|v, &l, &r| *v = l + (r - l) * self.weight);

        self.saved.save((left.raw_dim(), right.raw_dim()))?;

        Ok(new_shared(data))
    }

    fn backward(
        &self,
        grad_output: &Array<f32, Broadcast<D, E>>,
        needs_input_grad: [bool; 2],
    ) -> Result<(Gradient<D>, Gradient<E>)> {
        let (left_dim, right_dim) = self.saved.take()?;
        self.saved.check_gradient_shape(
            &cobroadcast(left_dim.clone(), right_dim.clone()),
            grad_output,
        )?;

        let left_grad = if needs_input_grad[0] {
            let scaled = grad_output.mapv(|g| g * (1. - self.weight));

            Gradient::Tensor(reduced(left_dim, &scaled))
        } else {
            Gradient::NotRequired
        };

        let right_grad = if needs_input_grad[1] {
            let scaled = grad_output.mapv(|g| g * self.weight);

            Gradient::Tensor(reduced(right_dim, &scaled))
        } else {
            Gradient::NotRequired
        };

        Ok((left_grad, right_grad))
    }
}
