//! Instancing policy: how objects with a prototype ("instances" of a user
//! type) are treated, as opposed to plain structural records.

use std::fmt;
use std::rc::Rc;

use mimic_value::Value;

use crate::context::CloneContext;

/// Custom instancing hook.
///
/// Invoked for every node classified as a plain object or opaque instance.
/// The hook receives the original value and the invocation's context and
/// may recurse into the engine through [`clone_deep_in`] or
/// [`clone_shallow_in`] with the same context, so cycle resolution stays
/// consistent across its manual recursion.
///
/// [`clone_deep_in`]: crate::clone_deep_in
/// [`clone_shallow_in`]: crate::clone_shallow_in
pub type InstanceHook = Rc<dyn Fn(&Value, &mut CloneContext) -> Value>;

/// Policy for objects whose prototype marks them as user-defined instances.
#[derive(Clone, Default)]
pub enum Instancing {
    /// Instances are shared by reference, not copied.
    #[default]
    Off,
    /// Instances are cloned like plain objects, keeping their prototype.
    Structural,
    /// Instances (and plain objects) are produced by the hook.
    Hook(InstanceHook),
}

impl Instancing {
    /// Wrap a closure as a [`Instancing::Hook`] policy.
    pub fn hook<F>(f: F) -> Self
    where
        F: Fn(&Value, &mut CloneContext) -> Value + 'static,
    {
        Self::Hook(Rc::new(f))
    }
}

/// `true` maps to [`Instancing::Structural`], the boolean shorthand for
/// "clone instances structurally".
impl From<bool> for Instancing {
    fn from(structural: bool) -> Self {
        if structural { Self::Structural } else { Self::Off }
    }
}

impl fmt::Debug for Instancing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Off"),
            Self::Structural => write!(f, "Structural"),
            Self::Hook(_) => write!(f, "Hook(..)"),
        }
    }
}
