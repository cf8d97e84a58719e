use std::{cell::RefCell, rc::Rc};

use ndarray::{Array, Dimension};

use crate::{
    error::{Error, Result},
    utils::Shared,
};

enum Stage<T> {
    Fresh,
    Saved(T),
    Consumed,
}

/// Per-node saved-state slot.
///
/// Holds the minimal payload a node's backward formula needs, together with
/// the node lifecycle state machine (`Fresh → Saved → Consumed`) and the
/// two registries that make the capture-before-mutate rule enforceable:
/// pre-image captures and dirtied storages, both identified by `Rc`
/// pointer. Running forward twice, or backward without a prior forward,
/// fails closed with [`Error::InvalidState`]; mutating captured storage (or
/// capturing mutated storage) fails with [`Error::AliasingViolation`].
pub(crate) struct Saved<T> {
    op: &'static str,
    stage: RefCell<Stage<T>>,
    captured: RefCell<Vec<*const ()>>,
    dirtied: RefCell<Vec<*const ()>>,
}

impl<T> Saved<T> {
    pub(crate) fn new(op: &'static str) -> Self {
        Self {
            op,
            stage: RefCell::new(Stage::Fresh),
            captured: RefCell::new(Vec::new()),
            dirtied: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn op(&self) -> &'static str {
        self.op
    }

    /// Stores the backward payload.
    pub(crate) fn save(&self, value: T) -> Result<()> {
        let mut stage = self.stage.borrow_mut();
        match *stage {
            Stage::Fresh => {
                *stage = Stage::Saved(value);
                Ok(())
            }
            _ => Err(Error::InvalidState { op: self.op }),
        }
    }

    /// Consumes the backward payload.
    pub(crate) fn take(&self) -> Result<T> {
        let mut stage = self.stage.borrow_mut();
        match std::mem::replace(&mut *stage, Stage::Consumed) {
            Stage::Saved(value) => Ok(value),
            _ => Err(Error::InvalidState { op: self.op }),
        }
    }

    /// Registers a pre-image capture of `tensor` and returns an alias to it.
    ///
    /// Must happen before any in-place mutation of the same storage:
    /// capturing a buffer this node already dirtied would hand the backward
    /// formula post-mutation data.
    pub(crate) fn capture<D>(&self, tensor: &Shared<Array<f32, D>>) -> Result<Shared<Array<f32, D>>>
    where
        D: Dimension,
    {
        let ptr = Rc::as_ptr(tensor) as *const ();
        if self.dirtied.borrow().contains(&ptr) {
            return Err(Error::AliasingViolation { op: self.op });
        }
        self.captured.borrow_mut().push(ptr);

        Ok(Rc::clone(tensor))
    }

    /// Marks `tensor`'s storage as overwritten by this node.
    ///
    /// Fails if the storage was captured as a pre-image; mutating it now
    /// would corrupt the value backward reads.
    pub(crate) fn mark_dirty<D>(&self, tensor: &Shared<Array<f32, D>>) -> Result<()>
    where
        D: Dimension,
    {
        let ptr = Rc::as_ptr(tensor) as *const ();
        if self.captured.borrow().contains(&ptr) {
            return Err(Error::AliasingViolation { op: self.op });
        }
        self.dirtied.borrow_mut().push(ptr);

        Ok(())
    }

    /// Whether forward overwrote any input storage.
    pub(crate) fn dirtied(&self) -> bool {
        !self.dirtied.borrow().is_empty()
    }

    /// Validates the upstream gradient's shape against the saved shape.
    pub(crate) fn check_gradient_shape<D, E>(&self, expected: &D, grad: &Array<f32, E>) -> Result<()>
    where
        D: Dimension,
        E: Dimension,
    {
        if expected.slice() != grad.shape() {
            return Err(Error::ShapeMismatch {
                op: self.op,
                expected: expected.slice().to_vec(),
                got: grad.shape().to_vec(),
            });
        }

        Ok(())
    }
}
