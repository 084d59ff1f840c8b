use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, trace};

use super::PoolLookup;
use crate::error::{QuoteError, Result};
use crate::models::{sort_tokens, Address, Reserves};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct PairResponse {
    pair: Address,
}

/// Pool lookup backed by an HTTP pair indexer.
///
/// Endpoints:
///   GET {api_url}/pairs/{token0}/{token1}   -> {"pair": "0x..."}, 404 when absent
///   GET {api_url}/pools/{pool}/reserves      -> {"reserve0": "...", "reserve1": "..."}
pub struct IndexerApi {
    api_url: String,
    client: reqwest::Client,
}

impl IndexerApi {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(api_url, client))
    }

    pub fn with_client(api_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_url: crate::utils::remove_trailing_slash(api_url),
            client,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_pair_url(&self, token_a: Address, token_b: Address) -> String {
        let (token0, token1) = sort_tokens(token_a, token_b);
        format!("{}/pairs/{}/{}", self.api_url, token0, token1)
    }

    fn build_reserves_url(&self, pool: Address) -> String {
        format!("{}/pools/{}/reserves", self.api_url, pool)
    }

    /// `Ok(None)` on 404; other non-success statuses are lookup failures.
    async fn fetch_body(&self, url: &str) -> Result<Option<String>> {
        trace!(url, "indexer request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::Lookup("rate_limited".to_string()));
        }
        if !status.is_success() {
            return Err(QuoteError::Lookup(format!(
                "indexer returned status {} for {}",
                status, url
            )));
        }
        Ok(Some(response.text().await?))
    }
}

fn parse_pair(body: &str) -> Result<Option<Address>> {
    let parsed: PairResponse = serde_json::from_str(body)
        .map_err(|e| QuoteError::Lookup(format!("bad pair response: {}", e)))?;
    // Factories report a missing pair as the zero address.
    if parsed.pair.is_zero() {
        Ok(None)
    } else {
        Ok(Some(parsed.pair))
    }
}

fn parse_reserves(body: &str) -> Result<Reserves> {
    serde_json::from_str(body)
        .map_err(|e| QuoteError::Lookup(format!("bad reserves response: {}", e)))
}

#[async_trait]
impl PoolLookup for IndexerApi {
    async fn resolve_pool(&self, token_a: Address, token_b: Address) -> Result<Option<Address>> {
        let url = self.build_pair_url(token_a, token_b);
        match self.fetch_body(&url).await? {
            Some(body) => {
                let pool = parse_pair(&body)?;
                debug!(%token_a, %token_b, found = pool.is_some(), "resolved pool");
                Ok(pool)
            }
            None => Ok(None),
        }
    }

    async fn get_reserves(&self, pool: Address) -> Result<Reserves> {
        let url = self.build_reserves_url(pool);
        let body = self
            .fetch_body(&url)
            .await?
            .ok_or_else(|| QuoteError::Lookup(format!("unknown pool {}", pool)))?;
        parse_reserves(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    fn api() -> IndexerApi {
        IndexerApi::with_client("http://localhost:8545/", reqwest::Client::new())
    }

    #[test]
    fn test_trailing_slash_removed() {
        assert_eq!(api().api_url(), "http://localhost:8545");
    }

    #[test]
    fn test_pair_url_is_order_independent() {
        let a = Address::from_low_u64(0xbb);
        let b = Address::from_low_u64(0xaa);
        let api = api();
        assert_eq!(api.build_pair_url(a, b), api.build_pair_url(b, a));
        assert_eq!(
            api.build_pair_url(a, b),
            format!("http://localhost:8545/pairs/{}/{}", b, a)
        );
    }

    #[test]
    fn test_reserves_url() {
        let pool = Address::from_low_u64(0x10);
        assert_eq!(
            api().build_reserves_url(pool),
            format!("http://localhost:8545/pools/{}/reserves", pool)
        );
    }

    #[test]
    fn test_parse_pair_zero_means_none() {
        let zero = format!(r#"{{"pair":"{}"}}"#, Address::ZERO);
        assert_eq!(parse_pair(&zero).unwrap(), None);

        let pool = Address::from_low_u64(77);
        let found = format!(r#"{{"pair":"{}"}}"#, pool);
        assert_eq!(parse_pair(&found).unwrap(), Some(pool));

        assert!(matches!(parse_pair("{}"), Err(QuoteError::Lookup(_))));
    }

    #[test]
    fn test_parse_reserves() {
        let r = parse_reserves(r#"{"reserve0":"123456789012345678901234567890","reserve1":7}"#)
            .unwrap();
        assert_eq!(
            r.reserve0,
            U256::from_dec_str("123456789012345678901234567890").unwrap()
        );
        assert_eq!(r.reserve1, U256::from(7));

        assert!(matches!(
            parse_reserves(r#"{"reserve0":"x"}"#),
            Err(QuoteError::Lookup(_))
        ));
    }
}
