// handlers/mod.rs - HTTP handlers
//
// Public (no key): service info and liveness, see app.rs
// Cars (x-api-key required): CRUD plus classic reclassification
pub mod cars;

pub use cars::*;
