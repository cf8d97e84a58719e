use ndarray::{Array, Dimension, Zip};

use crate::{
    autograd::{Function, UnaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, Shared},
};

/// Clamps the input to `[min_val, max_val]`.
///
/// The bounds occupy the second and third gradient slots and are
/// structurally non-differentiable.
pub struct Clamp<D>
where
    D: Dimension,
{
    min_val: f32,
    max_val: f32,
    saved: Saved<Shared<Array<f32, D>>>,
}

impl<D> Clamp<D>
where
    D: Dimension,
{
    pub fn new(min_val: f32, max_val: f32) -> Self {
        Self {
            min_val,
            max_val,
            saved: Saved::new("clamp"),
        }
    }
}

impl<D> Function for Clamp<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D> UnaryFunction<D, 3> for Clamp<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        let input = self.saved.capture(input)?;
        let result = new_shared(
            input
                .borrow()
                .mapv(|i| i.clamp(self.min_val, self.max_val)),
        );
        self.saved.save(input)?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 3],
    ) -> Result<[Gradient<D>; 3]> {
        let input = self.saved.take()?;
        let input = input.borrow();
        self.saved
            .check_gradient_shape(&input.raw_dim(), grad_output)?;

        let grad = if needs_input_grad[0] {
            let mut grad = Array::zeros(input.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*input)
                .for_each(|d, &g, &i| {
                    *d = g * ((i >= self.min_val && i <= self.max_val) as u8 as f32)
                });

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        Ok([
            grad,
            Gradient::NotDifferentiable,
            Gradient::NotDifferentiable,
        ])
    }
}

#[cfg(test)]
mod test;
