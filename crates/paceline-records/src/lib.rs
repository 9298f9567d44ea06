//! Member, event, and participant records.
//!
//! Domain types for the roster side of the system, each owned by a single
//! [`paceline_auth::Group`] tenant:
//!
//! - [`Member`] — a runner registered under one group
//! - [`Event`] — a scheduled run carrying its join secret
//! - [`Participant`] — a (event, member) join record
mod event;
mod member;
mod participant;

pub use event::*;
pub use member::*;
pub use participant::*;
