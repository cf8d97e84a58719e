use std::rc::Rc;

use ndarray::{Array, Dimension, Zip};

use crate::{
    autograd::{Function, UnaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, Shared},
};

pub struct Reciprocal<D>
where
    D: Dimension,
{
    saved: Saved<Shared<Array<f32, D>>>,
}

impl<D> Reciprocal<D>
where
    D: Dimension,
{
    pub fn new() -> Self {
        Self {
            saved: Saved::new("reciprocal"),
        }
    }
}

impl<D> Default for Reciprocal<D>
where
    D: Dimension,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Function for Reciprocal<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D> UnaryFunction<D> for Reciprocal<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        // The derivative is expressible through the output alone, so the
        // result is saved instead of the input.
        let result = new_shared(input.borrow().mapv(f32::recip));
        self.saved.save(Rc::clone(&result))?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 1],
    ) -> Result<[Gradient<D>; 1]> {
        let result = self.saved.take()?;
        let result = result.borrow();
        self.saved
            .check_gradient_shape(&result.raw_dim(), grad_output)?;

        if !needs_input_grad[0] {
            return Ok([Gradient::NotRequired]);
        }

        let mut grad = Array::zeros(result.raw_dim());
        Zip::from(&mut grad)
            .and(grad_output)
            .and(&*result)
            .for_each(|d, &g, &r| *d = -g * r * r);

        Ok([Gradient::Tensor(grad)])
    }
}

#[cfg(test)]
mod test;
