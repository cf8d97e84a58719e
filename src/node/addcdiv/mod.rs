use std::rc::Rc;

use ndarray::{Array, Dimension, Zip};

use crate::{
    autograd::{Function, TernaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, Shared},
};

/// Fused `add + scale * dividend / divisor`.
pub struct Addcdiv<D>
where
    D: Dimension,
{
    scale: f32,
    inplace: bool,
    saved: Saved<(Shared<Array<f32, D>>, Shared<Array<f32, D>>)>,
}

impl<D> Addcdiv<D>
where
    D: Dimension,
{
    pub fn new(scale: f32, inplace: bool) -> Self {
        Self {
            scale,
            inplace,
            saved: Saved::new("addcdiv"),
        }
    }
}

impl<D> Function for Addcdiv<D>
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

impl<D> TernaryFunction<D> for Addcdiv<D>
where
    D: Dimension,
{
    fn forward(
        &self,
        add: &Shared<Array<f32, D>>,
        dividend: &Shared<Array<f32, D>>,
        divisor: &Shared<Array<f32, D>>,
    ) -> Result<Shared<Array<f32, D>>> {
        let dividend = self.saved.capture(dividend)?;
        let divisor = self.saved.capture(divisor)?;

        let result = if self.inplace {
            self.saved.mark_dirty(add)?;
            Zip::from(&mut *add.borrow_mut())
                .and(&*dividend.borrow())
                .and(&*divisor.borrow())
                .for_each(|a, &n, &d| *a += self.scale * n / d);

            Rc::clone(add)
        } else {
            let add = add.borrow();
            let mut data = Array::zeros(add.raw_dim());
            Zip::from(&mut data)
                .and(&*add)
                .and(&*dividend.borrow())
                .and(&*divisor.borrow())
                .for_each(|v, &a, &n, &d| *v = a + self.scale * n / d);

            new_shared(data)
        };

        self.saved.save((dividend, divisor))?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 3],
    ) -> Result<[Gradient<D>; 3]> {
        let (dividend, divisor) = self.saved.take()?;
        let (dividend, divisor) = (dividend.borrow(), divisor.borrow());
        self.saved
            .check_gradient_shape(&dividend.raw_dim(), grad_output)?;

        let add_grad = if needs_input_grad[0] {
            Gradient::Tensor(grad_output.clone())
        } else {
            Gradient::NotRequired
        };

        let dividend_grad = if needs_input_grad[1] {
            let mut grad = Array::zeros(dividend.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*divisor)
                .for_each(|o, &g, &d| *o = g * self.scale / d);

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        let divisor_grad = if needs_input_grad[2] {
            let mut grad = Array::zeros(divisor.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*dividend)
                .and(&*divisor)
                .for_each(|o, &g, &n, &d| *o = -g * self.scale * n / (d * d));

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        Ok([add_grad, dividend_grad, divisor_grad])
    }
}
