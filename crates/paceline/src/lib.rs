//! Running group and event management backend.
//!
//! This facade crate re-exports all public paceline crates for convenient
//! access.
//!
//! ## Crate Organization
//!
//! ### Core Types
//! - [`core`] — Typed IDs, constants, caching, and the error taxonomy
//!
//! ### Infrastructure
//! - [`pg`] — PostgreSQL connectivity and schema metadata
//! - [`auth`] — Accounts, sessions, and route guarding
//!
//! ### Domain Logic
//! - [`records`] — Member, event, and participant records
//! - [`roster`] — Event access gate and participant roster
//!
//! ### Application
//! - [`server`] — Unified HTTP backend

pub use paceline_core as core;
pub use paceline_pg as pg;
pub use paceline_auth as auth;
pub use paceline_records as records;
pub use paceline_roster as roster;
pub use paceline_server as server;

// Re-export commonly used types at the root
pub use paceline_core::*;
