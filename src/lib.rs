#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod grow;
mod layout;
mod probe;

pub mod hasher;

#[cfg(any(test, feature = "stats"))]
pub mod stats;

pub mod table;

pub use error::TableError;
pub use grow::INITIAL_CAPACITY;
pub use grow::LOAD_FACTOR_PERCENT;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use hasher::DefaultHashBuilder;
pub use table::Iter;
pub use table::LABEL_PREFIX;
pub use table::Table;
pub use table::UNDEFINED;
