//! Token-based authorization gate.
//!
//! Favorites routes are guarded by the [`AuthUser`] extractor: it reads the
//! signed token from the session cookie (or a bearer header), verifies it
//! against the shared secret, and hands the handler the authenticated user
//! id. Verification failure short-circuits with a 401 before any store
//! access. Token issuance lives with the external issuing party;
//! [`TokenVerifier::sign`] exists for that party and for tests.

pub mod extract;
pub mod token;

pub use extract::AuthUser;
pub use token::{AuthError, Claims, TokenVerifier};
