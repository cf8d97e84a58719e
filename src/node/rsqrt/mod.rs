use std::rc::Rc;

use ndarray::{Array, Dimension, Zip};

use crate::{
    autograd::{Function, UnaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, Shared},
};

pub struct Rsqrt<D>
where
    D: Dimension,
{
    inplace: bool,
    saved: Saved<Shared<Array<f32, D>>>,
}

impl<D> Rsqrt<D>
where
    D: Dimension,
{
    pub fn new(inplace: bool) -> Self {
        Self {
            inplace,
            saved: Saved::new("rsqrt"),
        }
    }
}

impl<D> Function for Rsqrt<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }

    fn dirtied(&self) -> bool {
        self.saved.dirtied()
    }
}

impl<D> UnaryFunction<D> for Rsqrt<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        let result = if self.inplace {
            self.saved.mark_dirty(input)?;
            input.borrow_mut().mapv_inplace(|o| o.sqrt().recip());
            Rc::clone(input)
        } else {
            new_shared(input.borrow().mapv(|o| o.sqrt().recip()))
        };

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
            .for_each(|d, &g, &r| *d = -g * r.powi(3) / 2.);

        Ok([Gradient::Tensor(grad)])
    }
}
