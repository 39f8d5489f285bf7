//! The expression-tree model consumed by `readable-expressions`.
//!
//! Trees are immutable once built. Types, variables and labels are shared by
//! reference counting, so a finished tree can be sent to another thread.

#[macro_use] extern crate derive_more;
extern crate getset;

pub mod ast;
pub mod factory;
pub mod reflection;
pub mod types;

pub use ast::*;
pub use reflection::*;
pub use types::{Type, TypeKind};
