use std::fmt;

use serde::{Deserialize, Serialize};

/// EIP-155 numeric identifier of a blockchain network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id as stored in the database (`Int8` column).
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block height selector for read-only RPC calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Number(u64),
}

impl BlockTag {
    /// Wire representation expected by `eth_call` / `eth_getBalance`.
    pub fn to_rpc_param(self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Number(n) => format!("{n:#x}"),
        }
    }
}
