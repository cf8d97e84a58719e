use ndarray::{Array, Dimension, Zip};

use crate::{
    autograd::{Function, UnaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, sign, Shared},
};

pub struct Abs<D>
where
    D: Dimension,
{
    saved: Saved<Shared<Array<f32, D>>>,
}

impl<D> Abs<D>
where
    D: Dimension,
{
    pub fn new() -> Self {
        Self {
            saved: Saved::new("abs"),
        }
    }
}

impl<D> Default for Abs<D>
where
    D: Dimension,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Function for Abs<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D> UnaryFunction<D> for Abs<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        let input = self.saved.capture(input)?;
        let result = new_shared(input.borrow().mapv(f32::abs));
        self.saved.save(input)?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 1],
    ) -> Result<[Gradient<D>; 1]> {
        let input = self.saved.take()?;
        let input = input.borrow();
        self.saved
            .check_gradient_shape(&input.raw_dim(), grad_output)?;

        if !needs_input_grad[0] {
            return Ok([Gradient::NotRequired]);
        }

        let mut grad = Array::zeros(input.raw_dim());
        Zip::from(&mut grad)
            .and(grad_output)
            .and(&*input)
            .for_each(|d, &g, &i| *d = g * sign(i));

        Ok([Gradient::Tensor(grad)])
    }
}
