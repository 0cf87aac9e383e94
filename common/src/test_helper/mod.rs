//! Fixtures shared by the tests of every crate in the workspace.

pub mod clock;
pub mod track;
