//! Authentication, sessions, and route guarding.
//!
//! JWT-based authentication with Argon2 password hashing, bound to an
//! http-only session cookie. A login session is valid only while its token
//! verifies AND its row still holds that token's digest; revocation is row
//! deletion.
//!
//! ## Identity Types
//!
//! - [`Group`] — Tenant account with credentials
//! - [`Role`] — `Admin` or `GroupOwner`
//! - [`Session`] — Active login session
//!
//! ## Security
//!
//! - [`Crypto`] — JWT signing and verification
//! - [`Claims`] — JWT payload structure
//! - [`password`] — Argon2 hashing, verification, and temp-password minting
//! - [`guard`] — Role-based redirect gating for privileged page prefixes
mod claims;
mod crypto;
mod dto;
mod group;
pub mod password;
mod role;
mod session;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use group::*;
pub use role::*;
pub use session::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;

#[cfg(feature = "server")]
pub mod guard;
#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
