//! Identity resolution seams
//!
//! The core never authenticates. [`IdentityProvider`] resolves the current
//! actor from whatever session mechanism the outer service uses, and
//! [`UserDirectory`] looks up users by id for assignment precondition
//! checks.

use crate::errors::{DomainError, DomainResult};
use crate::user::{User, UserId};
use crate::visibility::Identity;
use indexmap::IndexMap;
use std::sync::RwLock;

/// Resolves the acting identity for the current request
pub trait IdentityProvider: Send + Sync {
    /// The authenticated actor's id, role, and zone
    fn current_identity(&self) -> DomainResult<Identity>;
}

/// Provider that always returns a fixed identity, for tests and tooling
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    /// Wrap a fixed identity
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_identity(&self) -> DomainResult<Identity> {
        Ok(self.identity.clone())
    }
}

/// Looks up users by id
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id
    fn get(&self, id: UserId) -> DomainResult<User>;
}

/// In-memory user directory for tests
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<IndexMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user
    pub fn insert(&self, user: User) {
        use crate::entity::AggregateRoot;
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(user.id(), user);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn get(&self, id: UserId) -> DomainResult<User> {
        self.users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                id: id.to_string(),
            })
    }
}
