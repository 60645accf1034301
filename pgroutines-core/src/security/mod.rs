//! Credential handling.
//!
//! Passwords are read once from the environment into [`Credentials`] and
//! handed to the driver at connect time; nothing else in the crate sees them.

mod credentials;

pub use credentials::Credentials;
