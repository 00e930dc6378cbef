//! CLI command implementations

pub mod asset;
pub mod completions;
pub mod data;
pub mod notify;
pub mod pm;
pub mod po;
pub mod rfq;
pub mod status;
pub mod sup;
pub mod ticket;
pub mod user;
pub mod wo;
