//! Access tokens, redacted secrets, and bearer request authentication.

pub mod bearer;
pub mod secret;
pub mod token;

pub use bearer::*;
pub use secret::*;
pub use token::*;
