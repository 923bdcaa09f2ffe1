//! Read entities definitions.

pub mod room;
