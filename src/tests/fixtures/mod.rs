// Shared test fixtures, compiled into the crate only under cfg(test).

pub mod commands;
pub mod records;
pub mod state;
