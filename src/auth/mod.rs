pub mod access_token;
pub mod authorization;
pub mod error;

pub use access_token::*;
pub use authorization::*;
pub use error::ErrorResponse;
