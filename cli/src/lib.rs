//! folio command-line front end. Modules are public for the integration tests.

pub mod commands;
pub mod project;
