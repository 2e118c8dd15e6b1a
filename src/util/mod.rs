//! Shared helpers

pub mod io_value;
