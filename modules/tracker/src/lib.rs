// === PUBLIC CONTRACT ===
// Only the contract module is meant for other crates to consume.
pub mod contract;

pub use contract::{error, model};

// === INTERNAL MODULES ===
// Exposed for the server binary and for integration tests; the `contract`
// module is the stable surface.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
