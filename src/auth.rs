//! Secret wrappers and decoded token payloads.

pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
