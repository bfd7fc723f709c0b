//! Identity provider port.
//!
//! Checkout attaches the authenticated shopper to the order and refuses to
//! start when nobody is signed in.

use sheger_market_core::{Email, UserId};

/// The signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: Email,
}

/// Source of the current authenticated user.
pub trait IdentityProvider: Send + Sync {
    /// The current user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<AuthenticatedUser>;
}

/// A fixed identity for tests and the demo CLI.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<AuthenticatedUser>);

impl StaticIdentity {
    /// An identity provider with `user` signed in.
    #[must_use]
    pub const fn signed_in(user: AuthenticatedUser) -> Self {
        Self(Some(user))
    }

    /// An identity provider with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<AuthenticatedUser> {
        self.0.clone()
    }
}
