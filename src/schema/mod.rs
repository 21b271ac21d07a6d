//! Raw record schema
//!
//! This module defines the loosely typed records the tracker stores and the
//! boundary that turns them into validated values for the calculator.

mod adapter;
mod record;

pub use adapter::*;
pub use record::*;
