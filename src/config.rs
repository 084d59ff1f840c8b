//! JSON configuration for a relayer instance.
//!
//! ```json
//! {
//!   "governors": ["0x00000000000000000000000000000000000000a0"],
//!   "wrappers": [
//!     {
//!       "id": "0x00000000000000000000000000000000000000f1",
//!       "protocol": "UniswapV2",
//!       "source": { "type": "indexer", "url": "http://localhost:8080" }
//!     }
//!   ],
//!   "routes": { "default": "0x00000000000000000000000000000000000000f1" }
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::GovernorSet;
use crate::dex::{PancakeSwapV2, ProtocolWrapper, UniswapV2};
use crate::lookup::{IndexerApi, InMemoryPoolLookup, PoolLookup};
use crate::models::{Address, LiquidityPool};
use crate::relayer::{Relayer, RoutingTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    UniswapV2,
    PancakeSwapV2,
}

impl Protocol {
    pub fn build(&self, lookup: Arc<dyn PoolLookup>) -> Arc<dyn ProtocolWrapper> {
        match self {
            Protocol::UniswapV2 => Arc::new(UniswapV2::new(lookup)),
            Protocol::PancakeSwapV2 => Arc::new(PancakeSwapV2::new(lookup)),
        }
    }
}

/// Where a wrapper reads its pools from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolSource {
    Indexer { url: String },
    Memory { pools: Vec<LiquidityPool> },
}

impl PoolSource {
    pub fn build(&self) -> Result<Arc<dyn PoolLookup>> {
        let lookup: Arc<dyn PoolLookup> = match self {
            PoolSource::Indexer { url } => Arc::new(
                IndexerApi::new(url).with_context(|| format!("indexer client for {}", url))?,
            ),
            PoolSource::Memory { pools } => {
                Arc::new(InMemoryPoolLookup::from_pools(pools.iter().cloned()))
            }
        };
        Ok(lookup)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperConfig {
    pub id: Address,
    pub protocol: Protocol,
    pub source: PoolSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayerConfig {
    pub governors: Vec<Address>,
    #[serde(default)]
    pub wrappers: Vec<WrapperConfig>,
    #[serde(default)]
    pub routes: RoutingTable,
}

impl RelayerConfig {
    pub fn load(path: &str) -> Result<Self> {
        crate::cache::load_from_file(path)
    }

    /// Builds a relayer, registering wrappers and applying routes as the
    /// first configured governor.
    pub fn build(&self) -> Result<Relayer> {
        let governor = self
            .governors
            .iter()
            .copied()
            .find(|g| !g.is_zero())
            .ok_or_else(|| anyhow!("config needs at least one non-zero governor"))?;

        let relayer = Relayer::new(Arc::new(GovernorSet::new(self.governors.iter().copied())));
        for w in &self.wrappers {
            let lookup = w.source.build()?;
            relayer
                .register_wrapper(governor, w.id, w.protocol.build(lookup))
                .with_context(|| format!("registering wrapper {}", w.id))?;
        }
        relayer
            .apply_routes(governor, &self.routes)
            .context("applying routes")?;

        info!(
            wrappers = self.wrappers.len(),
            pair_routes = self.routes.pairs.len(),
            token_routes = self.routes.tokens.len(),
            "relayer configured"
        );
        Ok(relayer)
    }
}
