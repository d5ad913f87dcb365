// === PUBLIC CONTRACT ===
// Only the contract module should be public for other modules to consume
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::PsicoAgenda;

// === INTERNAL MODULES ===
// Exposed for the CLI host and for tests; only `contract` is a stable API.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
