//! Core Infrastructure
//!
//! Collaborators consumed by the token lifecycle: the token codec and the
//! random identifier sources.

pub mod codec;
pub mod ids;

pub use codec::{JwtCodec, MockTokenCodec, TokenCodec};
pub use ids::{CsrfGenerator, IdGenerator, MockIdGenerator, UuidGenerator};
