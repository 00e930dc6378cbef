//! Operations Hub: a local-first store for tickets, assets, maintenance
//! and procurement.
//!
//! The whole dataset is one [`entities::AppData`] aggregate, held by a
//! [`core::Store`] and written through to a versioned JSON snapshot after
//! every change.

pub mod cli;
pub mod core;
pub mod entities;
