use std::error::Error;

use ndarray::Array;

use super::Clamp;
use crate::{
    autograd::UnaryFunction,
    utils::{are_similar, new_shared},
};

#[cfg(test)]
mod forward {
    use super::*;

    #[test]
    fn base_case() -> Result<(), Box<dyn Error>> {
        let op = Clamp::new(-1., 3.);
        let result = op.forward(&new_shared(Array::from(vec![-2., 0., 5.])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![-1., 0., 3.]));
        __check
    }
}

#[cfg(test)]
mod backward {
    use super::*;

    #[test]
    fn base_case() -> Result<(), Box<dyn Error>> {
        let op = Clamp::new(-1., 3.);
        op.forward(&new_shared(Array::from(vec![-2., 0., 5.])))?;

        let [grad, min_grad, max_grad] = op.backward(&Array::ones(3), [true, true, true])?;

        assert!(min_grad.is_not_differentiable());
        assert!(max_grad.is_not_differentiable());
        are_similar(&grad.into_tensor().unwrap(), &Array::from(vec![0., 1., 0.]))
    }

    #[test]
    fn bounds_are_inclusive() -> Result<(), Box<dyn Error>> {
        let op = Clamp::new(-1., 3.);
        op.forward(&new_shared(Array::from(vec![-1., 3.])))?;

        let [grad, _, _] = op.backward(&Array::ones(2), [true, false, false])?;

        are_similar(&grad.into_tensor().unwrap(), &Array::from(vec![1., 1.]))
    }

    #[test]
    fn not_required() -> Result<(), Box<dyn Error>> {
        let op = Clamp::new(0., 1.);
        op.forward(&new_shared(Array::from(vec![0.5])))?;

        let [grad, min_grad, max_grad] = op.backward(&Array::ones(1), [false, false, false])?;

        assert!(grad.is_not_required());
        assert!(min_grad.is_not_differentiable());
        assert!(max_grad.is_not_differentiable());

        Ok(())
    }
}
