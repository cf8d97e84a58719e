use ndarray::{Array, Dimension};

use crate::{
    autograd::{Function, UnaryFunction},
    error::Result,
    gradient::Gradient,
    saved::Saved,
    utils::{new_shared, sign, Shared},
};

/// Operation table for the piecewise family.
///
/// Each variant pairs a forward function with the derivative it has almost
/// everywhere: 0 for the step-like operations, 1 for the ones that follow
/// the dividend.
#[derive(Clone, Copy, Debug)]
enum Kind {
    Floor,
    Ceil,
    Round,
    Sign,
    Trunc,
    Frac,
    Fmod(f32),
    Remainder(f32),
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Sign => "sign",
            Self::Trunc => "trunc",
            Self::Frac => "frac",
            Self::Fmod(_) => "fmod",
            Self::Remainder(_) => "remainder",
        }
    }

    fn grad_value(self) -> f32 {
        match self {
            Self::Floor | Self::Ceil | Self::Round | Self::Sign | Self::Trunc => 0.,
            Self::Frac | Self::Fmod(_) | Self::Remainder(_) => 1.,
        }
    }

    fn apply(self, x: f32) -> f32 {
        match self {
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Round => x.round(),
            Self::Sign => sign(x),
            Self::Trunc => x.trunc(),
            Self::Frac => x - x.trunc(),
            // Follows the dividend's sign.
            Self::Fmod(divisor) => x % divisor,
            // Follows the divisor's sign.
            Self::Remainder(divisor) => x - divisor * (x / divisor).floor(),
        }
    }
}

/// Piecewise operations whose derivative is constant almost everywhere.
///
/// Backward broadcasts the family's gradient constant to the output shape
/// and scales it by the upstream gradient; nothing but the shape is saved.
pub struct ConstantGrad<D>
where
    D: Dimension,
{
    kind: Kind,
    saved: Saved<D>,
}

impl<D> ConstantGrad<D>
where
    D: Dimension,
{
    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            saved: Saved::new(kind.name()),
        }
    }

    pub fn floor() -> Self {
        Self::with_kind(Kind::Floor)
    }

    pub fn ceil() -> Self {
        Self::with_kind(Kind::Ceil)
    }

    pub fn round() -> Self {
        Self::with_kind(Kind::Round)
    }

    pub fn sign() -> Self {
        Self::with_kind(Kind::Sign)
    }

    pub fn trunc() -> Self {
        Self::with_kind(Kind::Trunc)
    }

    pub fn frac() -> Self {
        Self::with_kind(Kind::Frac)
    }

    pub fn fmod(divisor: f32) -> Self {
        Self::with_kind(Kind::Fmod(divisor))
    }

    pub fn remainder(divisor: f32) -> Self {
        Self::with_kind(Kind::Remainder(divisor))
    }
}

impl<D> Function for ConstantGrad<D>
where
    D: Dimension,
{
    fn name(&self) -> &'static str {
        self.saved.op()
    }
}

impl<D> UnaryFunction<D> for ConstantGrad<D>
where
    D: Dimension,
{
    fn forward(&self, input: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>> {
        let input = input.borrow();
        self.saved.save(input.raw_dim())?;

        Ok(new_shared(input.mapv(|i| self.kind.apply(i))))
    }

    fn backward(
        &self,
        grad_output: &Array<f32, D>,
        needs_input_grad: [bool; 1],
    ) -> Result<[Gradient<D>; 1]> {
        let dim = self.saved.take()?;
        self.saved.check_gradient_shape(&dim, grad_output)?;

        if !needs_input_grad[0] {
            return Ok([Gradient::NotRequired]);
        }

        let value = self.kind.grad_value();

        Ok([Gradient::Tensor(grad_output.mapv(|g| g * value))])
    }
}

#[cfg(test)]
mod test;
