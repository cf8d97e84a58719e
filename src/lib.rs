//! Differentiable pointwise tensor operations.
//!
//! Every operation in this crate is a node in a computation graph. A node
//! lives through a strict two-phase lifecycle: [`forward`] computes the
//! output from the input tensors and captures exactly the state its
//! backward formula needs, then [`backward`] consumes that state and maps
//! the gradient with respect to the output into one gradient slot per
//! input. Slots the executor did not request, and slots holding
//! non-differentiable scalar parameters, come back as explicit sentinels
//! rather than zero-filled tensors.
//!
//! Nodes that support it can run their forward pass in place, overwriting
//! an input's storage instead of allocating a new output. The saved-state
//! slot enforces the ordering rule this requires: any pre-mutation value
//! needed by backward must be captured before the mutation happens, and a
//! violation fails closed instead of silently reading corrupted data.
//!
//! The tensor backend is [`ndarray`]; the graph executor that schedules
//! nodes and threads gradients between them lives outside this crate.
//!
//! [`forward`]: UnaryFunction::forward
//! [`backward`]: UnaryFunction::backward

mod autograd;
mod error;
mod gradient;
mod node;
mod saved;
mod utils;

pub use autograd::{BinaryFunction, Function, TernaryFunction, UnaryFunction};
pub use error::{Error, Result};
pub use gradient::Gradient;
pub use node::{
    Abs, Acos, Addcdiv, Addcmul, Asin, Atan, Clamp, Cmax, CmaxConstant, Cmin, CminConstant,
    ConstantGrad, Cos, Cosh, Exp, Lerp, Log, Log1p, Reciprocal, Rsqrt, Sigmoid, Sin, Sinh, Sqrt,
    Tan, Tanh,
};
pub use utils::{new_shared, Broadcast, Shared};
