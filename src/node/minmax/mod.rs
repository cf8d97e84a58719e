use ndarray::{Array, DimMax, Dimension, Zip};

use crate::{
    autograd::{BinaryFunction, Function, UnaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{cobroadcasted_zeros, new_shared, reduced, Broadcast, Shared},
};

/// Strict-comparison mask and operand shapes for a pairwise extremum.
///
/// The mask routes the upstream gradient: winners of the comparison get it,
/// the complement goes to the other operand, so ties send the gradient to
/// the right operand.
struct PairState<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    mask: Array<f32, Broadcast<D, E>>,
    left_dim: D,
    right_dim: E,
}

pub struct Cmax<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    saved: Saved<PairState<D, E>>,
}

impl<D, E> Cmax<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    pub fn new() -> Self {
        Self {
            saved: Saved::new("cmax"),
        }
    }
}

impl<D, E> Default for Cmax<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, E> Function for Cmax<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D, E> BinaryFunction<D, E> for Cmax<D, E>
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
            .for_each(|v, &l, &r| *v = l.max(r));

        let mut mask = Array::zeros(data.raw_dim());
        Zip::from(&mut mask)
            .and_broadcast(&*left)
            .and_broadcast(&*right)
            .for_each(|m, &l, &r| *m = (l > r) as u8 as f32);

        self.saved.save(PairState {
            mask,
            left_dim: left.raw_dim(),
            right_dim: right.raw_dim(),
        })?;

        Ok(new_shared(data))
    }

    fn backward(
        &self,
        grad_output: &Array<f32, Broadcast<D, E>>,
        needs_input_grad: [bool; 2],
    ) -> Result<(Gradient<D>, Gradient<E>)> {
        let PairState {
            mask,
            left_dim,
            right_dim,
        } = self.saved.take()?;
        self.saved
            .check_gradient_shape(&mask.raw_dim(), grad_output)?;

        let left_grad = if needs_input_grad[0] {
            let mut masked = Array::zeros(mask.raw_dim());
            Zip::from(&mut masked)
                .and(grad_output)
                .and(&mask)
                .for_each(|d, &g, &m| *d = g * m);

            Gradient::Tensor(reduced(left_dim, &masked))
        } else {
            Gradient::NotRequired
        };

        let right_grad = if needs_input_grad[1] {
            let mut masked = Array::zeros(mask.raw_dim());
            Zip::from(&mut masked)
                .and(grad_output)
                .and(&mask)
                .for_each(|d, &g, &m| *d = g * (1. - m));

            Gradient::Tensor(reduced(right_dim, &masked))
        } else {
            Gradient::NotRequired
        };

        Ok((left_grad, right_grad))
    }
}

pub struct Cmin<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    saved: Saved<PairState<D, E>>,
}

impl<D, E> Cmin<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    pub fn new() -> Self {
        Self {
            saved: Saved::new("cmin"),
        }
    }
}

impl<D, E> Default for Cmin<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, E> Function for Cmin<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D, E> BinaryFunction<D, E> for Cmin<D, E>
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
            .for_each(|v, &l, &r| *v = l.min(r));

        let mut mask = Array::zeros(data.raw_dim());
        Zip::from(&mut mask)
            .and_broadcast(&*left)
            .and_broadcast(&*right)
            .for_each(|m, &l, &r| *m = (l < r) as u8 as f32);

        self.saved.save(PairState {
            mask,
            left_dim: left.raw_dim(),
            right_dim: right.raw_dim(),
        })?;

        Ok(new_shared(data))
    }

    fn backward(
        &self,
        grad_output: &Array<f32, Broadcast<D, E>>,
        needs_input_grad: [bool; 2],
    ) -> Result<(Gradient<D>, Gradient<E>)> {
        let PairState {
            mask,
            left_dim,
            right_dim,
        } = self.saved.take()?;
        self.saved
            .check_gradient_shape(&mask.raw_dim(), grad_output)?;

        let left_grad = if needs_input_grad[0] {
            let mut masked = Array::zeros(mask.raw_dim());
            Zip::from(&mut masked)
                .and(grad_output)
                .and(&mask)
                .for_each(|d, &g, &m| *d = g * m);

            Gradient::Tensor(reduced(left_dim, &masked))
        } else {
            Gradient::NotRequired
        };

        let right_grad = if needs_input_grad[1] {
            let mut masked = Array::zeros(mask.raw_dim());
            Zip::from(&mut masked)
                .and(grad_output)
                .and(&mask)
                .for_each(|d, &g, &m| *d = g * (1. - m));

            Gradient::Tensor(reduced(right_dim, &masked))
        } else {
            Gradient::NotRequired
        };

        Ok((left_grad, right_grad))
    }
}

/// Elementwise maximum against a constant; the constant occupies the second
/// gradient slot and is structurally non-differentiable.
pub struct CmaxConstant<D>
where
    D: Dimension,
{
    constant: f32,
    saved: Saved<Shared<Array<f32, D>>>,
}

impl<D> CmaxConstant<D>
where
    D: Dimension,
{
    pub fn new(constant: f32) -> Self {
        Self {
            constant,
            saved: Saved::new("cmax_constant"),
        }
    }
}

impl<D> Function for CmaxConstant<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D> UnaryFunction<D, 2> for CmaxConstant<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        let input = self.saved.capture(input)?;
        let result = new_shared(input.borrow().mapv(|i| i.max(self.constant)));
        self.saved.save(input)?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 2],
    ) -> Result<[Gradient<D>; 2]> {
        let input = self.saved.take()?;
        let input = input.borrow();
        self.saved
            .check_gradient_shape(&input.raw_dim(), grad_output)?;

        let grad = if needs_input_grad[0] {
            let mut grad = Array::zeros(input.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*input)
                .for_each(|d, &g, &i| *d = g * ((i > self.constant) as u8 as f32));

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        Ok([grad, Gradient::NotDifferentiable])
    }
}

/// Elementwise minimum against a constant.
pub struct CminConstant<D>
where
    D: Dimension,
{
    constant: f32,
    saved: Saved<Shared<Array<f32, D>>>,
}

impl<D> CminConstant<D>
where
    D: Dimension,
{
    pub fn new(constant: f32) -> Self {
        Self {
            constant,
            saved: Saved::new("cmin_constant"),
        }
    }
}

impl<D> Function for CminConstant<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D> UnaryFunction<D, 2> for CminConstant<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        let input = self.saved.capture(input)?;
        let result = new_shared(input.borrow().mapv(|i| i.min(self.constant)));
        self.saved.save(input)?;

        Ok(result)
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 2],
    ) -> Result<[Gradient<D>; 2]> {
        let input = self.saved.take()?;
        let input = input.borrow();
        self.saved
            .check_gradient_shape(&input.raw_dim(), grad_output)?;

        let grad = if needs_input_grad[0] {
            let mut grad = Array::zeros(input.raw_dim());
            Zip::from(&mut grad)
                .and(grad_output)
                .and(&*input)
                .for_each(|d, &g, &i| *d = g * ((i < self.constant) as u8 as f32));

            Gradient::Tensor(grad)
        } else {
            Gradient::NotRequired
        };

        Ok([grad, Gradient::NotDifferentiable])
    }
}
