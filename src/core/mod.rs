//! Core library components.
//!
//! Everything needed to turn per-service env files into remote secrets:
//! configuration, naming, env file loading, the store abstraction and the
//! reconciler that ties them together.

pub mod config;
pub mod constants;
pub mod domain;
pub mod env;
pub mod naming;
pub mod policy;
pub mod reconcile;
pub mod store;
