//! Who is signed in.

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    /// Name shown on the dashboard, with a fallback for unnamed accounts.
    pub fn account_name(&self) -> &str {
        if self.display_name.is_empty() {
            "Player"
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email")]
    InvalidEmail,

    #[error("Wrong password")]
    WrongPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Password is too weak")]
    WeakPassword,
}

pub trait IdentityProvider: Send + Sync + 'static {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AuthError>;

    fn sign_out(&mut self);

    fn current(&self) -> Option<&Identity>;
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Accounts kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    accounts: HashMap<String, (String, Identity)>,
    current: Option<Identity>,
}

impl IdentityProvider for MemoryIdentity {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (stored, identity) = self
            .accounts
            .get(&email.to_lowercase())
            .ok_or(AuthError::UserNotFound)?;
        if stored != password {
            return Err(AuthError::WrongPassword);
        }
        self.current = Some(identity.clone());
        Ok(identity.clone())
    }

    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AuthError> {
        let key = email.to_lowercase();
        if !is_plausible_email(&key) {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.accounts.contains_key(&key) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let identity = Identity {
            id: format!("user-{}", self.accounts.len() + 1),
            email: email.to_string(),
            display_name: display_name.to_string(),
        };
        self.accounts
            .insert(key, (password.to_string(), identity.clone()));
        self.current = Some(identity.clone());
        Ok(identity)
    }

    fn sign_out(&mut self) {
        self.current = None;
    }

    fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// The game's identity provider.
#[derive(Resource)]
pub struct Auth(pub Box<dyn IdentityProvider>);

impl Default for Auth {
    fn default() -> Self {
        Self(Box::new(MemoryIdentity::default()))
    }
}
