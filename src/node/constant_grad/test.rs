use std::error::Error;

use ndarray::{Array, Ix1};

use super::ConstantGrad;
use crate::{
    autograd::UnaryFunction,
    error::Error as Fault,
    utils::{are_similar, new_shared},
};

#[cfg(test)]
mod forward {
    use super::*;

    #[test]
    fn floor() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::floor();
        let result = op.forward(&new_shared(Array::from(vec![1.5, -1.5])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![1., -2.]));
        __check
    }

    #[test]
    fn ceil() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::ceil();
        let result = op.forward(&new_shared(Array::from(vec![1.5, -1.5])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![2., -1.]));
        __check
    }

    #[test]
    fn round() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::round();
        let result = op.forward(&new_shared(Array::from(vec![1.4, 2.6])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![1., 3.]));
        __check
    }

    #[test]
    fn sign() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::sign();
        let result = op.forward(&new_shared(Array::from(vec![-3., 0., 2.])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![-1., 0., 1.]));
        __check
    }

    #[test]
    fn trunc() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::trunc();
        let result = op.forward(&new_shared(Array::from(vec![1.7, -1.7])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![1., -1.]));
        __check
    }

    #[test]
    fn frac() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::frac();
        let result = op.forward(&new_shared(Array::from(vec![1.25, -1.25])))?;

        let __check = are_similar(&result.borrow(), &Array::from(vec![0.25, -0.25]));
        __check
    }

    // fmod keeps the dividend's sign, remainder the divisor's.
    #[test]
    fn fmod_and_remainder() -> Result<(), Box<dyn Error>> {
        let fmod = ConstantGrad::fmod(2.);
        let result = fmod.forward(&new_shared(Array::from(vec![5., -5.])))?;
        are_similar(&result.borrow(), &Array::from(vec![1., -1.]))?;

        let remainder = ConstantGrad::remainder(2.);
        let result = remainder.forward(&new_shared(Array::from(vec![5., -5.])))?;
        are_similar(&result.borrow(), &Array::from(vec![1., 1.]))?;

        let negative = ConstantGrad::remainder(-2.);
        let result = negative.forward(&new_shared(Array::from(vec![5.])))?;
        let __check = are_similar(&result.borrow(), &Array::from(vec![-1.]));
        __check
    }
}

#[cfg(test)]
mod backward {
    use super::*;

    #[test]
    fn zero_family() -> Result<(), Box<dyn Error>> {
        for op in [
            ConstantGrad::floor(),
            ConstantGrad::ceil(),
            ConstantGrad::round(),
            ConstantGrad::sign(),
            ConstantGrad::trunc(),
        ] {
            op.forward(&new_shared(Array::from(vec![0.3, 1.7, -2.4])))?;

            let [grad] = op.backward(&Array::ones(3), [true])?;
            are_similar(&grad.into_tensor().unwrap(), &Array::zeros(3))?;
        }

        Ok(())
    }

    #[test]
    fn one_family() -> Result<(), Box<dyn Error>> {
        for op in [
            ConstantGrad::frac(),
            ConstantGrad::fmod(2.),
            ConstantGrad::remainder(2.),
        ] {
            op.forward(&new_shared(Array::from(vec![0.3, 1.7, -2.4])))?;

            let [grad] = op.backward(&Array::ones(3), [true])?;
            are_similar(&grad.into_tensor().unwrap(), &Array::ones(3))?;
        }

        Ok(())
    }

    #[test]
    fn scales_with_upstream() -> Result<(), Box<dyn Error>> {
        let op = ConstantGrad::frac();
        op.forward(&new_shared(Array::from(vec![0.3, 1.7])))?;

        let [grad] = op.backward(&Array::from(vec![2., -3.]), [true])?;

        are_similar(&grad.into_tensor().unwrap(), &Array::from(vec![2., -3.]))
    }

    #[test]
    fn before_forward_fails() {
        let op = ConstantGrad::<Ix1>::floor();

        assert!(matches!(
            op.backward(&Array::ones(3), [true]),
            Err(Fault::InvalidState { op: "floor" })
        ));
    }
}
