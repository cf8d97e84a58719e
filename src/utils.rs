use std::{cell::RefCell, rc::Rc};

use ndarray::{Array, Axis, DimMax, Dimension};

/// Shorthand for `Rc<RefCell<T>>`.
///
/// Node inputs and outputs travel as shared storage handles; an in-place
/// node returns a clone of the input's handle, so the output genuinely
/// aliases the input.
pub type Shared<T> = Rc<RefCell<T>>;

/// A broadcasted ndarray's dimension.
pub type Broadcast<D, E> = <D as DimMax<E>>::Output;

/// Wraps a value into shared storage.
pub fn new_shared<T>(item: T) -> Shared<T> {
    Rc::new(RefCell::new(item))
}

/// Sign with `sign(0) = 0`, the backend convention pointwise derivatives
/// rely on.
pub(crate) fn sign(x: f32) -> f32 {
    if x > 0. {
        1.
    } else if x < 0. {
        -1.
    } else {
        0.
    }
}

/// Computes the result of broadcasting between `left` and `right`.
pub(crate) fn cobroadcast<D, E>(left: D, right: E) -> Broadcast<D, E>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    let (bigger, smaller) = if left.ndim() >= right.ndim() {
        (left.slice(), right.slice())
    } else {
        (right.slice(), left.slice())
    };

    let mut out = <D as DimMax<E>>::Output::zeros(bigger.len());
    out.slice_mut()
        .iter_mut()
        .zip(bigger)
        .for_each(|(o, &b)| *o = b);

    out.slice_mut()
        .iter_mut()
        .skip(bigger.len() - smaller.len())
        .zip(smaller)
        .filter(|(o, s)| o != s)
        .for_each(|(o, &s)| match o {
            1 => *o = s,
            _ => assert_eq!(s, 1, "The two tensors have incompatible shape."),
        });

    out
}

/// Creates a zeroed tensor whose shape is the result of broadcasting
/// between those of `left` and `right`.
pub(crate) fn cobroadcasted_zeros<D, E>(
    left: &Array<f32, D>,
    right: &Array<f32, E>,
) -> Array<f32, Broadcast<D, E>>
where
    D: Dimension + DimMax<E>,
    E: Dimension,
{
    Array::zeros(cobroadcast(left.raw_dim(), right.raw_dim()))
}

/// Reduces `source` to the shape `dim` by reverting the broadcast: leading
/// broadcast axes are summed away, stretched unit axes are summed back to
/// size one.
pub(crate) fn reduced<D, E>(dim: D, source: &Array<f32, E>) -> Array<f32, D>
where
    D: Dimension,
    E: Dimension,
{
    let mut reduced = source.to_owned().into_dyn();
    while reduced.ndim() > dim.ndim() {
        reduced = reduced.sum_axis(Axis(0));
    }
    for (axis, &size) in dim.slice().iter().enumerate() {
        if size == 1 && reduced.shape()[axis] != 1 {
            reduced = reduced.sum_axis(Axis(axis)).insert_axis(Axis(axis));
        }
    }

    reduced.into_dimensionality::<D>().unwrap()
}

#[cfg(test)]
pub(crate) const TOLERANCE: f32 = 1e-4;

#[cfg(test)]
pub(crate) fn are_similar<D: Dimension>(
    result: &Array<f32, D>,
    expected: &Array<f32, D>,
) -> Result<(), Box<dyn std::error::Error>> {
    if result.shape() != expected.shape()
        || result
            .iter()
            .zip(expected.iter())
            .any(|(r, e)| (r - e).abs() > TOLERANCE)
    {
        return Err(format!("Result: {} | Expected: {}", result, expected).into());
    }

    Ok(())
}
