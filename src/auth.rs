use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::info;

use crate::error::{QuoteError, Result};
use crate::models::Address;

/// Decides whether a caller may change routing configuration.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, caller: &Address) -> bool;
}

/// The governor role: a set of addresses, managed by its own members.
#[derive(Default)]
pub struct GovernorSet {
    governors: RwLock<HashSet<Address>>,
}

impl GovernorSet {
    pub fn new(governors: impl IntoIterator<Item = Address>) -> Self {
        Self {
            governors: RwLock::new(governors.into_iter().filter(|g| !g.is_zero()).collect()),
        }
    }

    pub fn grant(&self, granter: Address, account: Address) -> Result<()> {
        if !self.is_authorized(&granter) {
            return Err(QuoteError::Unauthorized { caller: granter });
        }
        // The zero address never holds the role.
        if !account.is_zero() && self.governors.write().insert(account) {
            info!(%granter, %account, "governor granted");
        }
        Ok(())
    }

    /// A governor may revoke anyone, including itself.
    pub fn revoke(&self, revoker: Address, account: Address) -> Result<()> {
        if !self.is_authorized(&revoker) {
            return Err(QuoteError::Unauthorized { caller: revoker });
        }
        if self.governors.write().remove(&account) {
            info!(%revoker, %account, "governor revoked");
        }
        Ok(())
    }

    pub fn governors(&self) -> Vec<Address> {
        let mut all: Vec<_> = self.governors.read().iter().copied().collect();
        all.sort();
        all
    }
}

impl Authorizer for GovernorSet {
    fn is_authorized(&self, caller: &Address) -> bool {
        self.governors.read().contains(caller)
    }
}
