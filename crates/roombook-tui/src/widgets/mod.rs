//! Reusable widgets shared by the screens.

pub mod form;
pub mod schedule;
