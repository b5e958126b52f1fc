#![doc = include_str!("../README.md")]

mod batch;
mod error;
mod sort;
#[cfg(feature = "serde")]
mod wire;

pub use crate::batch::*;
pub use crate::error::*;
pub use crate::sort::*;
#[cfg(feature = "serde")]
pub use crate::wire::*;
