mod abs;
mod addcdiv;
mod addcmul;
mod clamp;
mod constant_grad;
mod exp;
mod hyperbolic;
mod lerp;
mod log;
mod minmax;
mod reciprocal;
mod rsqrt;
mod sigmoid;
mod sqrt;
mod tanh;
mod trig;

pub use abs::Abs;
pub use addcdiv::Addcdiv;
pub use addcmul::Addcmul;
pub use clamp::Clamp;
pub use constant_grad::ConstantGrad;
pub use exp::Exp;
pub use hyperbolic::{Cosh, Sinh};
pub use lerp::Lerp;
pub use log::{Log, Log1p};
pub use minmax::{Cmax, CmaxConstant, Cmin, CminConstant};
pub use reciprocal::Reciprocal;
pub use rsqrt::Rsqrt;
pub use sigmoid::Sigmoid;
pub use sqrt::Sqrt;
pub use tanh::Tanh;
pub use trig::{Acos, Asin, Atan, Cos, Sin, Tan};
