mod area;
mod command;
mod core;
mod dom_utils;
mod executable;
mod ops;
mod range;
mod serde_value;

pub use crate::area::*;
pub use crate::command::*;
pub use crate::core::*;
pub use crate::dom_utils::*;
pub use crate::executable::*;
pub use crate::ops::*;
pub use crate::range::*;
pub use crate::serde_value::*;
