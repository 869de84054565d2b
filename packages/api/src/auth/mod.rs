//! Authentication: password hashing, session tokens and the auth service.

mod password;
mod service;
mod token;

pub use password::{HasherConfig, PasswordHasher};
pub use service::{AuthResponse, AuthService, LoginRequest, SignupRequest};
pub use token::{Claims, TokenIssuer};
