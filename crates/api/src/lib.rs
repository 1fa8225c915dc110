//! `carlot-api` — HTTP surface for the used-car marketplace.
//!
//! Every protected route passes through the authorization gate in [`gate`]
//! before any business logic runs; ownership rules are layered per-operation
//! in the route handlers.

pub mod app;
pub mod config;
pub mod context;
pub mod gate;
