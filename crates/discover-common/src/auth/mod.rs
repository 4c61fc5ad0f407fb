//! Identity tokens

mod jwt;

pub use jwt::{AccessToken, Claims, JwtService};
