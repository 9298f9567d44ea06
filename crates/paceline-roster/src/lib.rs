//! Event access gate and participant roster.
//!
//! The join flow trusts only a possession-based secret: the code embedded
//! in an invite link. It is independent of cookie sessions and re-validated
//! on every mutating call.
//!
//! ## Gate Operations
//!
//! - [`gate::resolve`] — event lookup by secret code
//! - [`gate::joinable`] — members who may still join (never leaks who did)
//! - [`gate::admit`] / [`gate::admit_bulk`] — code-checked participant adds
//! - [`gate::walk_on`] — join as a newly created member
//! - [`gate::withdraw`] — participant removal
//!
//! ## Shaping
//!
//! - [`EventPublic`] — secret and participant identities stripped
//! - [`EventDetail`] — full view for authenticated callers
mod dto;
pub mod gate;
mod outcome;
mod repository;
mod view;

pub use dto::*;
pub use outcome::*;
pub use repository::*;
pub use view::*;
