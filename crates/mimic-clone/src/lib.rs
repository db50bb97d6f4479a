//! Deep and shallow structural cloning for cyclic value graphs.
//!
//! [`clone_deep`] walks a [`Value`] graph and produces a referentially
//! independent copy: mutating the copy never affects the original at any
//! depth. A per-invocation [`CloneContext`] maps originals to their clones
//! by reference identity, which resolves self-reference cycles and keeps
//! shared sub-graphs shared in the output. [`clone_shallow`] copies exactly
//! one container level, leaving children shared. The [`Instancing`] policy
//! decides what happens to objects carrying a prototype: share them, clone
//! them structurally, or hand them to a caller-supplied hook.
//!
//! ```
//! use std::rc::Rc;
//! use mimic_clone::clone_deep;
//! use mimic_value::{GraphObject, PropertyKey, Value, deep_eq};
//!
//! let node = Rc::new(GraphObject::new(None));
//! node.set(PropertyKey::string("n"), Value::number(1.0));
//! node.set(PropertyKey::string("me"), Value::object(node.clone()));
//! let original = Value::object(node);
//!
//! let copy = clone_deep(&original);
//! assert!(!copy.same_ref(&original));
//! assert!(deep_eq(&copy, &original));
//!
//! // The clone's self-reference points at the clone, not the original.
//! let me = copy.as_object().unwrap().get(&PropertyKey::string("me")).unwrap();
//! assert!(me.same_ref(&copy));
//! ```
//!
//! [`Value`]: mimic_value::Value

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod context;
pub mod deep;
pub mod policy;
pub mod shallow;

pub use context::CloneContext;
pub use deep::{clone_deep, clone_deep_in, clone_deep_with};
pub use policy::{InstanceHook, Instancing};
pub use shallow::{clone_shallow, clone_shallow_in, clone_shallow_with};
