use std::error::Error;
use std::rc::Rc;

use ndarray::Array;

use super::Addcmul;
use crate::{
    autograd::{Function, TernaryFunction},
    error::Error as Fault,
    utils::{are_similar, new_shared},
};

#[cfg(test)]
mod forward {
    use super::*;

    #[test]
    fn base_case() -> Result<(), Box<dyn Error>> {
        let op = Addcmul::new(1., false);
        let result = op.forward(
            &new_shared(Array::from(vec![0.])),
            &new_shared(Array::from(vec![2.])),
            &new_shared(Array::from(vec![3.])),
        )?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![6.]));
        __check
    }

    #[test]
    fn scales_product() -> Result<(), Box<dyn Error>> {
        let op = Addcmul::new(2., false);
        let result = op.forward(
            &new_shared(Array::from(vec![1.])),
            &new_shared(Array::from(vec![2.])),
            &new_shared(Array::from(vec![3.])),
        )?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![13.]));
        __check
    }

    #[test]
    fn inplace_aliases_add() -> Result<(), Box<dyn Error>> {
        let add = new_shared(Array::from(vec![1.]));
        let op = Addcmul::new(1., true);
        let result = op.forward(
            &add,
            &new_shared(Array::from(vec![2.])),
            &new_shared(Array::from(vec![3.])),
        )?;

        assert!(Rc::ptr_eq(&add, &result));
        assert!(op.dirtied());
        let __check = are_similar(&add.borrow(), &Array::from(vec![7.]));
        __check
    }

    #[test]
    fn inplace_over_captured_factor_fails() {
        let add = new_shared(Array::from(vec![1.]));
        let other = new_shared(Array::from(vec![2.]));
        let op = Addcmul::new(1., true);

        assert!(matches!(
            op.forward(&add, &add, &other),
            Err(Fault::AliasingViolation { op: "addcmul" })
        ));
    }
}

#[cfg(test)]
mod backward {
    use super::*;

    #[test]
    fn base_case() -> Result<(), Box<dyn Error>> {
        let op = Addcmul::new(1., false);
        op.forward(
            &new_shared(Array::from(vec![0.])),
            &new_shared(Array::from(vec![2.])),
            &new_shared(Array::from(vec![3.])),
        )?;

        let [add_grad, first_grad, second_grad] =
            op.backward(&Array::ones(1), [true, true, true])?;

        are_similar(&add_grad.into_tensor().unwrap(), &Array::from(vec![1.]))?;
        are_similar(&first_grad.into_tensor().unwrap(), &Array::from(vec![3.]))?;
        are_similar(&second_grad.into_tensor().unwrap(), &Array::from(vec![2.]))
    }

    #[test]
    fn selective() -> Result<(), Box<dyn Error>> {
        let op = Addcmul::new(1., false);
        op.forward(
            &new_shared(Array::from(vec![0.])),
            &new_shared(Array::from(vec![2.])),
            &new_shared(Array::from(vec![3.])),
        )?;

        let [add_grad, first_grad, second_grad] =
            op.backward(&Array::ones(1), [false, true, false])?;

        assert!(add_grad.is_not_required());
        assert!(second_grad.is_not_required());
        are_similar(&first_grad.into_tensor().unwrap(), &Array::from(vec![3.]))
    }

    #[test]
    fn inplace_equivalence() -> Result<(), Box<dyn Error>> {
        let plain = Addcmul::new(2., false);
        let plain_out = plain.forward(
            &new_shared(Array::from(vec![1., -1.])),
            &new_shared(Array::from(vec![2., 4.])),
            &new_shared(Array::from(vec![3., 0.5])),
        )?;
        let plain_grads = plain.backward(&Array::from(vec![1., 2.]), [true, true, true])?;

        let inplace = Addcmul::new(2., true);
        let inplace_out = inplace.forward(
            &new_shared(Array::from(vec![1., -1.])),
            &new_shared(Array::from(vec![2., 4.])),
            &new_shared(Array::from(vec![3., 0.5])),
        )?;
        let inplace_grads = inplace.backward(&Array::from(vec![1., 2.]), [true, true, true])?;

        are_similar(&plain_out.borrow(), &inplace_out.borrow())?;
        for (plain_grad, inplace_grad) in plain_grads.into_iter().zip(inplace_grads) {
            are_similar(
                &plain_grad.into_tensor().unwrap(),
                &inplace_grad.into_tensor().unwrap(),
            )?;
        }

        Ok(())
    }
}
