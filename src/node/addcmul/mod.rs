use std::rc::Rc;

use ndarray::{Array, Dimension, Zip};

use crate::{
    autograd::{Function, TernaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, Shared},
};

/// Fused `add + scale * first * second`.
///
/// The two factors are captured before any mutation of `add`, so the saved
/// state is valid in both the in-place and the allocating variant.
pub struct Addcmul<D>
where
    D: Dimension,
{
    scale: f32,
    inplace: bool,
    saved: Saved<(Shared<Array<f32, D>>, Shared<Array<f32, D>>)>,
}

impl<D> Addcmul<D>
where
    D: Dimension,
{
    pub fn new(scale: f32, inplace: bool) -> Self {
        Self {
            scale,
            inplace,
            saved: Saved::new("addcmul"),
        }
    }
}

impl<D> Function for Addcmul<D>
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

impl<D> TernaryFunction<D> for Addcmul<D>
where
    D: Dimension,
{
    fn forward(
        &self,
        add: &Shared<Array<f32, D>>,
        first: &Shared<Array<f32, D>>,
        second: &Shared<Array<f32, D>>,
    ) -> Result<Shared<Array<f32, D>>> {
        let first = self.saved.capture(first)?;
        let second = self.saved.capture(second)?;

        let result = if self.inplace {
            self.saved.mark_dirty(add)?;
            Zip::from(&mut *add.borrow_mut())
                .and(&*first.borrow())
                .and(&*second.borrow())
                .for_each(|a, &f, &s| *a += self.scale * f * s);

            Rc::clone(add)
        } else {
            let add = add.borrow();
            let mut data = Array::zeros(add.raw_dim());
            Zip::from(&mut data)
                .and(&*add)
                .and(&*first.borrow())
                .and(&*second.borrow())
                .for_each(|v, &a, &f, &s| *v = a + self.scale * f * s);

            new_shared(data)
        };

        self.saved.save((first, second))?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 3],
    ) -> Result<[Gradient<D>; 3]> {
        let (first, second) = self.saved.take()?;
        let (first, second) = (first.borrow(), second.borrow());
        self.saved
            .check_gradient_shape(&first.raw_dim(), grad_output)?;

        let add_grad = if needs_input_grad[0] {
            Gradient::Tensor(grad_output.clone())
        } else {
            Gradient::NotRequired
        };

        let first_grad = if needs_input_grad[1] {
            let mut grad = Array::zeros(first.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*second)
                .for_each(|d, &g, &s| *d = g * s * self.scale);

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        let second_grad = if needs_input_grad[2] {
            let mut grad = Array::zeros(second.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*first)
                .for_each(|d, &g, &f| *d = g * f * self.scale);

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        Ok([add_grad, first_grad, second_grad])
    }
}

#[cfg(test)]
mod test;
