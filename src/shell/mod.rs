// Composition root for the registry.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers.
// - Expose the handlers over HTTP.

pub mod config;
pub mod http;
pub mod state;
