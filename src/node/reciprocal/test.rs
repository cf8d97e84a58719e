use std::error::Error;

use ndarray::Array;

use super::Reciprocal;
use crate::{
    autograd::UnaryFunction,
    utils::{are_similar, new_shared},
};

#[cfg(test)]
mod forward {
    use super::*;

    #[test]
    fn base_case() -> Result<(), Box<dyn Error>> {
        let op = Reciprocal::new();
        let result = op.forward(&new_shared(Array::from(vec![1., 2., 4.])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![1., 0.5, 0.25]));
        __check
    }
}

#[cfg(test)]
mod backward {
    use super::*;

    #[test]
    fn base_case() -> Result<(), Box<dyn Error>> {
        let op = Reciprocal::new();
        op.forward(&new_shared(Array::from(vec![1., 2., 4.])))?;

        let [grad] = op.backward(&Array::ones(3), [true])?;

        are_similar(
            &grad.into_tensor().unwrap(),
            &Array::from(vec![-1., -0.25, -0.0625]),
        )
    }
}
