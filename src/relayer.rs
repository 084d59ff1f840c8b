//! Priority routing of quote requests.
//!
//! Each query is answered by exactly one wrapper, picked in this order:
//!
//! | Tier    | Key                         |
//! |---------|-----------------------------|
//! | Pair    | unordered `{token_in, token_out}` |
//! | Token   | `token_in` only             |
//! | Default | none                        |
//!
//! A failure from the picked wrapper is returned as is; lower tiers are not
//! tried.

use parking_lot::RwLock;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::Authorizer;
use crate::dex::ProtocolWrapper;
use crate::error::{QuoteError, Result};
use crate::math::Fee;
use crate::models::{sort_tokens, Address, PairKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteTier {
    Pair,
    Token,
    Default,
}

impl fmt::Display for RouteTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTier::Pair => write!(f, "pair"),
            RouteTier::Token => write!(f, "token"),
            RouteTier::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRoute {
    pub token0: Address,
    pub token1: Address,
    pub wrapper: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRoute {
    pub token: Address,
    pub wrapper: Address,
}

/// Serializable copy of the routing configuration, sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    #[serde(default)]
    pub pairs: Vec<PairRoute>,
    #[serde(default)]
    pub tokens: Vec<TokenRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Address>,
}

/// A quote together with the route that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedQuote {
    pub amount_out: U256,
    pub tier: RouteTier,
    pub wrapper: Address,
    pub protocol: String,
    pub fee: Option<Fee>,
}

#[derive(Default)]
struct Routes {
    pairs: HashMap<PairKey, PairRoute>,
    tokens: HashMap<Address, Address>,
    default: Option<Address>,
}

impl Routes {
    fn select(&self, token_in: Address, token_out: Address) -> Option<(RouteTier, Address)> {
        if let Some(route) = self.pairs.get(&PairKey::new(token_in, token_out)) {
            return Some((RouteTier::Pair, route.wrapper));
        }
        if let Some(wrapper) = self.tokens.get(&token_in) {
            return Some((RouteTier::Token, *wrapper));
        }
        self.default.map(|wrapper| (RouteTier::Default, wrapper))
    }

    fn snapshot(&self) -> RoutingTable {
        let mut pairs: Vec<_> = self.pairs.values().cloned().collect();
        pairs.sort_by(|a, b| (a.token0, a.token1).cmp(&(b.token0, b.token1)));
        let mut tokens: Vec<_> = self
            .tokens
            .iter()
            .map(|(token, wrapper)| TokenRoute {
                token: *token,
                wrapper: *wrapper,
            })
            .collect();
        tokens.sort_by_key(|t| t.token);
        RoutingTable {
            pairs,
            tokens,
            default: self.default,
        }
    }
}

/// Routes quote requests to registered protocol wrappers.
///
/// Reads are open to anyone; every mutation goes through the injected
/// [`Authorizer`]. Safe to share across tasks: locks are never held across an
/// `.await`.
pub struct Relayer {
    authorizer: Arc<dyn Authorizer>,
    wrappers: RwLock<HashMap<Address, Arc<dyn ProtocolWrapper>>>,
    routes: RwLock<Routes>,
}

impl Relayer {
    pub fn new(authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            authorizer,
            wrappers: RwLock::new(HashMap::new()),
            routes: RwLock::new(Routes::default()),
        }
    }

    fn ensure_governor(&self, caller: Address) -> Result<()> {
        if self.authorizer.is_authorized(&caller) {
            Ok(())
        } else {
            Err(QuoteError::Unauthorized { caller })
        }
    }

    /// Only non-zero, registered ids may be routed to.
    fn ensure_routable(&self, wrapper_id: Address) -> Result<()> {
        if wrapper_id.is_zero() || !self.wrappers.read().contains_key(&wrapper_id) {
            return Err(QuoteError::InvalidWrapper(wrapper_id));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Wrapper registry
    // -----------------------------------------------------------------------

    /// Registers (or replaces) the wrapper behind `wrapper_id`.
    pub fn register_wrapper(
        &self,
        caller: Address,
        wrapper_id: Address,
        wrapper: Arc<dyn ProtocolWrapper>,
    ) -> Result<()> {
        self.ensure_governor(caller)?;
        if wrapper_id.is_zero() {
            return Err(QuoteError::InvalidWrapper(wrapper_id));
        }
        info!(
            wrapper = %wrapper_id,
            protocol = wrapper.protocol_name(),
            "wrapper registered"
        );
        self.wrappers.write().insert(wrapper_id, wrapper);
        Ok(())
    }

    pub fn wrapper(&self, wrapper_id: Address) -> Option<Arc<dyn ProtocolWrapper>> {
        self.wrappers.read().get(&wrapper_id).cloned()
    }

    pub fn wrapper_ids(&self) -> Vec<Address> {
        let mut ids: Vec<_> = self.wrappers.read().keys().copied().collect();
        ids.sort();
        ids
    }

    // -----------------------------------------------------------------------
    // Routing configuration
    // -----------------------------------------------------------------------

    pub fn set_pair_wrapper(
        &self,
        caller: Address,
        token_a: Address,
        token_b: Address,
        wrapper_id: Address,
    ) -> Result<()> {
        self.ensure_governor(caller)?;
        self.ensure_routable(wrapper_id)?;
        if token_a.is_zero() || token_b.is_zero() {
            return Err(QuoteError::InvalidToken);
        }
        let (token0, token1) = sort_tokens(token_a, token_b);
        self.routes.write().pairs.insert(
            PairKey::new(token0, token1),
            PairRoute {
                token0,
                token1,
                wrapper: wrapper_id,
            },
        );
        info!(%token0, %token1, wrapper = %wrapper_id, "pair wrapper set");
        Ok(())
    }

    pub fn set_token_wrapper(&self, caller: Address, token: Address, wrapper_id: Address) -> Result<()> {
        self.ensure_governor(caller)?;
        self.ensure_routable(wrapper_id)?;
        if token.is_zero() {
            return Err(QuoteError::InvalidToken);
        }
        self.routes.write().tokens.insert(token, wrapper_id);
        info!(%token, wrapper = %wrapper_id, "token wrapper set");
        Ok(())
    }

    pub fn set_default_wrapper(&self, caller: Address, wrapper_id: Address) -> Result<()> {
        self.ensure_governor(caller)?;
        self.ensure_routable(wrapper_id)?;
        self.routes.write().default = Some(wrapper_id);
        info!(wrapper = %wrapper_id, "default wrapper set");
        Ok(())
    }

    /// Replays a snapshot through the gated setters. Entries are applied in
    /// order and the first failure stops the replay.
    pub fn apply_routes(&self, caller: Address, table: &RoutingTable) -> Result<()> {
        for route in &table.pairs {
            self.set_pair_wrapper(caller, route.token0, route.token1, route.wrapper)?;
        }
        for route in &table.tokens {
            self.set_token_wrapper(caller, route.token, route.wrapper)?;
        }
        if let Some(wrapper) = table.default {
            self.set_default_wrapper(caller, wrapper)?;
        }
        Ok(())
    }

    /// Wrapper id for the pair, or `Address::ZERO` when unset.
    pub fn pair_wrapper(&self, token_a: Address, token_b: Address) -> Address {
        self.routes
            .read()
            .pairs
            .get(&PairKey::new(token_a, token_b))
            .map(|r| r.wrapper)
            .unwrap_or(Address::ZERO)
    }

    pub fn token_wrapper(&self, token: Address) -> Address {
        self.routes
            .read()
            .tokens
            .get(&token)
            .copied()
            .unwrap_or(Address::ZERO)
    }

    pub fn default_wrapper(&self) -> Address {
        self.routes.read().default.unwrap_or(Address::ZERO)
    }

    pub fn routing_table(&self) -> RoutingTable {
        self.routes.read().snapshot()
    }

    /// The tier and wrapper id a quote for this direction would use.
    pub fn selected_wrapper(&self, token_in: Address, token_out: Address) -> Option<(RouteTier, Address)> {
        self.routes.read().select(token_in, token_out)
    }

    // -----------------------------------------------------------------------
    // Quoting
    // -----------------------------------------------------------------------

    pub async fn quote(&self, token_in: Address, amount_in: U256, token_out: Address) -> Result<U256> {
        self.quote_with_route(token_in, amount_in, token_out)
            .await
            .map(|routed| routed.amount_out)
    }

    /// Like [`Relayer::quote`], also reporting the tier and wrapper that were
    /// dispatched to. Routes changed while the quote is in flight do not
    /// affect the report.
    pub async fn quote_with_route(
        &self,
        token_in: Address,
        amount_in: U256,
        token_out: Address,
    ) -> Result<RoutedQuote> {
        if token_in.is_zero() || token_out.is_zero() {
            return Err(QuoteError::InvalidToken);
        }

        let (tier, wrapper_id) = self
            .selected_wrapper(token_in, token_out)
            .ok_or(QuoteError::NoWrapperFound)?;
        let wrapper = self
            .wrapper(wrapper_id)
            .ok_or(QuoteError::InvalidWrapper(wrapper_id))?;

        debug!(
            %token_in,
            %token_out,
            %tier,
            wrapper = %wrapper_id,
            protocol = wrapper.protocol_name(),
            "routing quote"
        );
        let amount_out = wrapper.quote(token_in, amount_in, token_out).await?;
        Ok(RoutedQuote {
            amount_out,
            tier,
            wrapper: wrapper_id,
            protocol: wrapper.protocol_name().to_string(),
            fee: wrapper.fee(),
        })
    }
}
