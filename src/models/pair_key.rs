use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

use super::Address;

/// Orders two tokens canonically, smaller address first.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Order-independent key for an unordered token pair.
///
/// `keccak256(token0 ++ token1)` over the sorted pair, so
/// `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey([u8; 32]);

impl PairKey {
    pub fn new(token_a: Address, token_b: Address) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let mut hasher = Keccak256::new();
        hasher.update(token0.as_bytes());
        hasher.update(token1.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sort_tokens() {
        let a = Address::from_low_u64(7);
        let b = Address::from_low_u64(3);
        assert_eq!(sort_tokens(a, b), (b, a));
        assert_eq!(sort_tokens(b, a), (b, a));
        assert_eq!(sort_tokens(a, a), (a, a));
    }

    #[test]
    fn test_distinct_pairs_distinct_keys() {
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);
        let c = Address::from_low_u64(3);
        assert_ne!(PairKey::new(a, b), PairKey::new(a, c));
        assert_ne!(PairKey::new(a, b), PairKey::new(b, c));
    }

    #[test]
    fn test_key_is_keccak_of_sorted_bytes() {
        let a = Address::from_low_u64(2);
        let b = Address::from_low_u64(1);
        let mut packed = Vec::with_capacity(40);
        packed.extend_from_slice(b.as_bytes());
        packed.extend_from_slice(a.as_bytes());
        let expected: [u8; 32] = Keccak256::digest(&packed).into();
        assert_eq!(PairKey::new(a, b).as_bytes(), &expected);
    }

    proptest! {
        #[test]
        fn prop_pair_key_symmetric(a in any::<[u8; 20]>(), b in any::<[u8; 20]>()) {
            let a = Address::from_bytes(a);
            let b = Address::from_bytes(b);
            prop_assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        }
    }
}
