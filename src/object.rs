//!
//! Object-base identity layer.
//!
//! Every façade and provider object reports a class tag that is unique per
//! concrete type. Any entry point that receives a trait object from outside
//! its own provider (a key handed to a MAC, for example) must check this tag
//! before interpreting the object, and must reject a mismatch with
//! `InvalidParams` without doing any work.

use std::any::Any;

use crate::error::{CryptoError, Result};

/// Common base of every framework object.
pub trait ObjectBase: Any {
    /// Per-concrete-type class tag.
    fn class(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// Compares the object's class tag against `expected`.
pub fn is_class_match<O: ObjectBase + ?Sized>(obj: &O, expected: &str) -> bool {
    obj.class() == expected
}

/// Interprets `obj` as `T` after the class tag has been checked.
///
/// The tag check is what callers rely on; the `Any` downcast only confirms that
/// the tag and the concrete layout agree.
pub fn downcast_checked<'a, T, O>(obj: &'a O, expected: &str) -> Result<&'a T>
where
    T: ObjectBase,
    O: ObjectBase + ?Sized,
{
    if !is_class_match(obj, expected) {
        tracing::warn!("Input wrong class type: expected {}, got {}", expected, obj.class());
        return Err(CryptoError::invalid(format!(
            "class mismatch: expected {}, got {}",
            expected,
            obj.class()
        )));
    }
    obj.as_any().downcast_ref::<T>().ok_or_else(|| {
        tracing::error!("class tag {} does not match object layout", expected);
        CryptoError::invalid(format!("object tagged {} has a foreign layout", expected))
    })
}

impl<T: ObjectBase + ?Sized + 'static> ObjectBase for Box<T> {
    fn class(&self) -> &'static str {
        (**self).class()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}

/// Paired destroy for handles returned by a create entry point. `None` is a no-op.
pub fn destroy<T: ObjectBase>(obj: Option<T>) {
    if let Some(obj) = obj {
        tracing::debug!("destroying object of class {}", obj.class());
        drop(obj);
    }
}
