//! The user/token directory seam.
//!
//! ID allocation, rank assignment and removal live in an external
//! component. The settlement core only needs read-only, synchronous
//! lookups that are authoritative at call time.

use alloy_primitives::Address;

use crate::{RelayError, Result, TokenId, UserId};

/// Read-only resolver from compact record IDs to addresses.
pub trait Directory {
    /// Address registered for `user_id`, or `None` if unregistered or removed.
    fn resolve_user(&self, user_id: UserId) -> Option<Address>;

    /// Address of `token_id`, or `None` if unregistered or removed.
    /// The native asset resolves to `Address::ZERO`.
    fn resolve_token(&self, token_id: TokenId) -> Option<Address>;

    /// Whether `address` belongs to an active user.
    fn is_active_user(&self, address: Address) -> bool;

    /// [`resolve_user`](Self::resolve_user), failing with `InvalidUser`.
    fn require_user(&self, user_id: UserId) -> Result<Address> {
        self.resolve_user(user_id)
            .ok_or(RelayError::InvalidUser(user_id))
    }

    /// [`resolve_token`](Self::resolve_token), failing with `InvalidToken`.
    fn require_token(&self, token_id: TokenId) -> Result<Address> {
        self.resolve_token(token_id)
            .ok_or(RelayError::InvalidToken(token_id))
    }
}

impl<D: Directory + ?Sized> Directory for &D {
    fn resolve_user(&self, user_id: UserId) -> Option<Address> {
        (**self).resolve_user(user_id)
    }

    fn resolve_token(&self, token_id: TokenId) -> Option<Address> {
        (**self).resolve_token(token_id)
    }

    fn is_active_user(&self, address: Address) -> bool {
        (**self).is_active_user(address)
    }
}

/// Map-backed directory for tests. The native asset is pre-registered.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    users: std::collections::HashMap<UserId, Address>,
    tokens: std::collections::HashMap<TokenId, Address>,
    removed_users: std::collections::HashSet<UserId>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        let mut tokens = std::collections::HashMap::new();
        tokens.insert(TokenId::NATIVE, Address::ZERO);
        Self {
            users: std::collections::HashMap::new(),
            tokens,
            removed_users: std::collections::HashSet::new(),
        }
    }

    pub fn register_user(&mut self, user_id: UserId, address: Address) {
        self.removed_users.remove(&user_id);
        self.users.insert(user_id, address);
    }

    pub fn register_token(&mut self, token_id: TokenId, address: Address) {
        self.tokens.insert(token_id, address);
    }

    pub fn remove_user(&mut self, user_id: UserId) {
        self.removed_users.insert(user_id);
    }

    pub fn remove_token(&mut self, token_id: TokenId) {
        self.tokens.remove(&token_id);
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Directory for MemoryDirectory {
    fn resolve_user(&self, user_id: UserId) -> Option<Address> {
        if self.removed_users.contains(&user_id) {
            return None;
        }
        self.users.get(&user_id).copied()
    }

    fn resolve_token(&self, token_id: TokenId) -> Option<Address> {
        self.tokens.get(&token_id).copied()
    }

    fn is_active_user(&self, address: Address) -> bool {
        self.users
            .iter()
            .any(|(id, addr)| *addr == address && !self.removed_users.contains(id))
    }
}
