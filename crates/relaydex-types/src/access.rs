//! Capability values handed out by the access-control collaborator.
//!
//! Processors never ask "is the caller privileged?". They take an
//! [`AdminCapability`] or [`OwnerCapability`] argument, which can only be
//! obtained by passing the caller through an [`AccessControl`]
//! implementation.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{RelayError, Result};

/// Privilege level of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Role {
    None,
    Admin,
    Owner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Admin => write!(f, "ADMIN"),
            Self::Owner => write!(f, "OWNER"),
        }
    }
}

/// The external role registry.
pub trait AccessControl {
    fn role_of(&self, caller: Address) -> Role;
}

/// Proof that `caller` may relay signed records. Owners qualify too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCapability {
    caller: Address,
}

impl AdminCapability {
    pub fn require(acl: &impl AccessControl, caller: Address) -> Result<Self> {
        match acl.role_of(caller) {
            Role::Admin | Role::Owner => Ok(Self { caller }),
            Role::None => Err(RelayError::Unauthorized {
                caller,
                required: Role::Admin,
            }),
        }
    }

    #[must_use]
    pub fn caller(&self) -> Address {
        self.caller
    }
}

/// Proof that `caller` may change exchange configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerCapability {
    caller: Address,
}

impl OwnerCapability {
    pub fn require(acl: &impl AccessControl, caller: Address) -> Result<Self> {
        match acl.role_of(caller) {
            Role::Owner => Ok(Self { caller }),
            Role::Admin | Role::None => Err(RelayError::Unauthorized {
                caller,
                required: Role::Owner,
            }),
        }
    }

    #[must_use]
    pub fn caller(&self) -> Address {
        self.caller
    }
}

/// Map-backed role registry for tests.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessControl {
    roles: std::collections::HashMap<Address, Role>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MemoryAccessControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, caller: Address, role: Role) {
        self.roles.insert(caller, role);
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl AccessControl for MemoryAccessControl {
    fn role_of(&self, caller: Address) -> Role {
        self.roles.get(&caller).copied().unwrap_or(Role::None)
    }
}
