//! Request and response bodies

pub mod orders;
