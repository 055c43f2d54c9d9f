//! # Account engine
//!
//! Registration and login. Passwords never leave this module unhashed:
//! registration stores only the hasher's output, login compares against it
//! and folds every failure into one indistinguishable message.

use std::sync::Arc;

use domains::{AppError, CredentialHasher, IssuedToken, Result, TokenIssuer, User, UserRepo};
use tracing::info;

/// Everything a new account needs, exactly as the caller typed it.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub age: Option<i32>,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates an account. Username and email must both be unclaimed; the
    /// insert re-checks uniqueness so a racing duplicate still conflicts.
    pub async fn register(&self, account: NewAccount) -> Result<User> {
        let name = account.name.trim();
        let username = account.username.trim();
        let email = account.email.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("name is required".into()));
        }
        if username.is_empty() {
            return Err(AppError::ValidationError("username is required".into()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::ValidationError("a valid email is required".into()));
        }
        if account.password.len() < 6 {
            return Err(AppError::ValidationError(
                "password must be at least 6 characters".into(),
            ));
        }

        if self.users.get_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("username is already taken".into()));
        }
        if self.users.get_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email is already registered".into()));
        }

        let hash = self.hasher.hash(&account.password).await?;
        let mut user = User::new(name.into(), username.into(), email.into(), hash);
        user.bio = account
            .bio
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        user.age = account.age;
        self.users.insert(&user).await?;

        info!(user = %user.id, %username, "account registered");
        Ok(user)
    }

    /// Exchanges credentials for a signed token. Unknown usernames and wrong
    /// passwords produce the same error so callers cannot probe for accounts.
    pub async fn login(&self, username: &str, password: &str) -> Result<(IssuedToken, User)> {
        let user = self
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid username or password".into()))?;

        if !self.hasher.verify(password, &user.password_hash).await {
            return Err(AppError::Unauthorized(
                "invalid username or password".into(),
            ));
        }

        let token = self.tokens.issue(&user)?;
        info!(user = %user.id, "login succeeded");
        Ok((token, user))
    }
}
