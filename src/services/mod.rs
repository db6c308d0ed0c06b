// src/services/mod.rs

//! Database-facing service logic. Handlers stay thin; everything with an
//! invariant worth enforcing lives here.

pub mod catalog;
pub mod orders;
