//! # Auth service: signup, login, token authentication
//!
//! Orchestrates the credential store, the password hasher and the token
//! issuer. All three are passed in by the caller; nothing is read from the
//! environment here.
//!
//! - [`AuthService::signup`] validates the fields, rejects a taken email,
//!   hashes the password and stores the user, then issues a token.
//! - [`AuthService::login`] answers [`ApiError::InvalidCredentials`] for both
//!   an unknown email and a wrong password, and runs one argon2 verify in
//!   either case.
//! - [`AuthService::authenticate`] turns a bearer token into a user id.
//!
//! Emails are normalized (trimmed, lowercased) before every lookup and insert.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use store::{StoreError, User, UserInfo, UserStore};
use uuid::Uuid;

use super::password::PasswordHasher;
use super::token::TokenIssuer;
use crate::error::ApiError;

/// Body of `POST /api/v1/auth/signup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A user profile together with a freshly issued session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user and log them in.
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, ApiError> {
        let name = request.name.trim().to_string();
        let email = normalize_email(&request.email);

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(ApiError::validation("Please add all fields"));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = self.hash_blocking(request.password).await?;
        let user = User::new(name, email, password_hash);

        // A concurrent signup may have taken the email since the check above.
        match self.users.insert_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Conflict) => return Err(ApiError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "user registered");
        self.respond(&user)
    }

    /// Log in with email and password.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let email = normalize_email(&request.email);

        if email.is_empty() || request.password.is_empty() {
            return Err(ApiError::validation("Please add email and password"));
        }

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            // Same argon2 cost as a wrong password.
            let dummy = self.hasher.dummy_hash().to_string();
            self.verify_blocking(request.password, dummy).await?;
            return Err(ApiError::InvalidCredentials);
        };

        let valid = self
            .verify_blocking(request.password, user.password_hash.clone())
            .await?;
        if !valid {
            return Err(ApiError::InvalidCredentials);
        }

        tracing::debug!(user_id = %user.id, "user logged in");
        self.respond(&user)
    }

    /// Resolve a bearer token to the id of the user it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<Uuid, ApiError> {
        self.tokens.verify(token)
    }

    /// Profile of an authenticated user.
    ///
    /// A valid token for a user that no longer exists is treated as invalid.
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserInfo, ApiError> {
        self.users
            .find_user(user_id)
            .await?
            .map(|user| user.to_info())
            .ok_or(ApiError::InvalidToken)
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            user: user.to_info(),
            token: self.tokens.issue(user.id)?,
        })
    }

    async fn hash_blocking(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
    }

    async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
    }
}
