//! Thin JSON-RPC client for one chain endpoint. Knows nothing about tokens
//! or catalogs; it ships batches of read-only calls and reports per-call
//! outcomes.

use alloy::primitives::{Address, U256};
use folio_types::{BlockTag, ChainId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::error::{CallFailure, ChainError};

const JSONRPC_VERSION: &str = "2.0";

/// One ABI-encoded `eth_call` against a contract.
#[derive(Debug, Clone)]
pub struct EncodedCall {
    pub to: Address,
    pub data: Vec<u8>,
}

/// Per-item result of a batched call. The batch itself only fails wholesale
/// on transport errors; everything else degrades to a per-item failure.
pub type CallOutcome = Result<Vec<u8>, CallFailure>;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Clone)]
pub struct ChainClient {
    chain_id: ChainId,
    endpoint: Url,
    http: reqwest::Client,
}

impl ChainClient {
    pub const fn new(chain_id: ChainId, endpoint: Url, http: reqwest::Client) -> Self {
        Self {
            chain_id,
            endpoint,
            http,
        }
    }

    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Native balance of `wallet` via `eth_getBalance`.
    ///
    /// This call is not batched, so any failure is fatal to the calling
    /// operation.
    pub async fn fetch_native_balance(
        &self,
        wallet: Address,
        block: BlockTag,
    ) -> Result<U256, ChainError> {
        let request = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: 0,
            method: "eth_getBalance",
            params: json!([format!("{wallet:#x}"), block.to_rpc_param()]),
        };

        let body = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: RpcResponse =
            serde_json::from_str(&body).map_err(|e| ChainError::Malformed(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .as_ref()
            .and_then(parse_quantity)
            .ok_or_else(|| {
                ChainError::Malformed(format!(
                    "eth_getBalance on chain {} returned no quantity",
                    self.chain_id
                ))
            })
    }

    /// Ship one JSON-RPC batch of `eth_call`s and return per-call outcomes,
    /// index-aligned with `calls`.
    ///
    /// A wholesale transport failure errors the whole batch; an individual
    /// call erroring on-chain yields a failed outcome for that slot only.
    pub async fn batch_call(
        &self,
        calls: &[EncodedCall],
        block: BlockTag,
    ) -> Result<Vec<CallOutcome>, ChainError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let batch: Vec<RpcRequest<'_>> = calls
            .iter()
            .enumerate()
            .map(|(id, call)| RpcRequest {
                jsonrpc: JSONRPC_VERSION,
                id: id as u64,
                method: "eth_call",
                params: json!([
                    {
                        "to": format!("{:#x}", call.to),
                        "data": format!("0x{}", hex::encode(&call.data)),
                    },
                    block.to_rpc_param(),
                ]),
            })
            .collect();

        tracing::debug!(
            "[ChainClient] 📡 Shipping batch of {} calls to chain {}",
            calls.len(),
            self.chain_id
        );

        let body = self
            .http
            .post(self.endpoint.clone())
            .json(&batch)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let responses: Vec<RpcResponse> =
            serde_json::from_str(&body).map_err(|e| ChainError::Malformed(e.to_string()))?;

        Ok(match_outcomes(calls.len(), responses))
    }
}

/// Align a batch response with its requests by id. Batch responses may come
/// back in any order; entries that never arrive stay failed.
fn match_outcomes(len: usize, responses: Vec<RpcResponse>) -> Vec<CallOutcome> {
    let mut outcomes: Vec<CallOutcome> = vec![Err(CallFailure::MissingResponse); len];
    for response in responses {
        let Some(slot) = response.id.map(|id| id as usize).filter(|&i| i < len) else {
            continue;
        };
        outcomes[slot] = outcome_of(response);
    }
    outcomes
}

fn outcome_of(response: RpcResponse) -> CallOutcome {
    if let Some(error) = response.error {
        return Err(CallFailure::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    match response.result {
        Some(value) if !value.is_null() => parse_call_data(&value).ok_or(CallFailure::Decode),
        _ => Err(CallFailure::MissingResult),
    }
}

fn parse_quantity(value: &serde_json::Value) -> Option<U256> {
    let hex_quantity = value.as_str()?.strip_prefix("0x")?;
    U256::from_str_radix(hex_quantity, 16).ok()
}

fn parse_call_data(value: &serde_json::Value) -> Option<Vec<u8>> {
    let hex_data = value.as_str()?.strip_prefix("0x")?;
    hex::decode(hex_data).ok()
}
