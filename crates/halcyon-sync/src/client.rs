//! Explorer and node HTTP clients
//!
//! The explorer serves read-only address data with `page`/`limit`
//! pagination; the node accepts signed transactions. Both are reached over
//! plain REST with JSON bodies.

use crate::{Error, Result};
use async_trait::async_trait;
use halcyon_core::models::amount_string;
use halcyon_core::{MempoolTransaction, NetworkSettings, Transaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Balance of an address (native coin or one token)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalance {
    /// Total balance
    #[serde(with = "amount_string")]
    pub balance: u128,
    /// Locked part
    #[serde(with = "amount_string")]
    pub locked_balance: u128,
}

/// Explorer backend information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerInfo {
    /// Backend release
    pub release_version: String,
}

/// Node answer to a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    /// Transaction hash
    pub tx_id: String,
    /// Source group
    pub from_group: u32,
    /// Destination group
    pub to_group: u32,
}

/// Read-only explorer API
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// Native balance
    async fn address_balance(&self, address: &str) -> Result<AddressBalance>;

    /// One page of confirmed transactions, newest first
    async fn address_transactions(
        &self,
        address: &str,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Transaction>>;

    /// Unconfirmed transactions involving the address
    async fn address_mempool_transactions(&self, address: &str) -> Result<Vec<MempoolTransaction>>;

    /// One page of token IDs held by the address
    async fn address_tokens(&self, address: &str, page: u32, limit: usize) -> Result<Vec<String>>;

    /// Balance of one token
    async fn address_token_balance(&self, address: &str, token_id: &str)
        -> Result<AddressBalance>;

    /// Whether each address has ever been used, in request order
    async fn addresses_used(&self, addresses: &[String]) -> Result<Vec<bool>>;

    /// Backend information, also used as connectivity probe
    async fn infos(&self) -> Result<ExplorerInfo>;
}

/// Full node API
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Submit a signed transaction
    async fn submit_transaction(&self, unsigned_tx: &str, signature: &str) -> Result<SubmitResult>;
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Explorer backend base URL
    pub explorer_api_host: String,
    /// Node base URL
    pub node_host: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for the given network settings
    pub fn from_settings(settings: &NetworkSettings) -> Self {
        Self {
            explorer_api_host: settings.explorer_api_host.clone(),
            node_host: settings.node_host.clone(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let settings = NetworkSettings::default();
        Self {
            explorer_api_host: settings.explorer_api_host,
            node_host: settings.node_host,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// reqwest-backed explorer and node client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    explorer: String,
    node: String,
}

impl HttpClient {
    /// Build a client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            explorer: config.explorer_api_host.trim_end_matches('/').to_string(),
            node: config.node_host.trim_end_matches('/').to_string(),
        })
    }

    fn explorer_url(&self, path: &str) -> String {
        format!("{}{}", self.explorer, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).query(query).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T> {
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }
}

fn page_query(page: u32, limit: usize) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("limit", limit.to_string())]
}

#[async_trait]
impl ExplorerApi for HttpClient {
    async fn address_balance(&self, address: &str) -> Result<AddressBalance> {
        self.get_json(self.explorer_url(&format!("/addresses/{}/balance", address)), &[])
            .await
    }

    async fn address_transactions(
        &self,
        address: &str,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Transaction>> {
        self.get_json(
            self.explorer_url(&format!("/addresses/{}/transactions", address)),
            &page_query(page, limit),
        )
        .await
    }

    async fn address_mempool_transactions(&self, address: &str) -> Result<Vec<MempoolTransaction>> {
        self.get_json(
            self.explorer_url(&format!("/addresses/{}/mempool/transactions", address)),
            &[],
        )
        .await
    }

    async fn address_tokens(&self, address: &str, page: u32, limit: usize) -> Result<Vec<String>> {
        self.get_json(
            self.explorer_url(&format!("/addresses/{}/tokens", address)),
            &page_query(page, limit),
        )
        .await
    }

    async fn address_token_balance(
        &self,
        address: &str,
        token_id: &str,
    ) -> Result<AddressBalance> {
        self.get_json(
            self.explorer_url(&format!("/addresses/{}/tokens/{}/balance", address, token_id)),
            &[],
        )
        .await
    }

    async fn addresses_used(&self, addresses: &[String]) -> Result<Vec<bool>> {
        let used: Vec<bool> = self
            .post_json(self.explorer_url("/addresses/used"), addresses)
            .await?;
        if used.len() != addresses.len() {
            return Err(Error::Decode(format!(
                "Expected {} flags, got {}",
                addresses.len(),
                used.len()
            )));
        }
        Ok(used)
    }

    async fn infos(&self) -> Result<ExplorerInfo> {
        self.get_json(self.explorer_url("/infos"), &[]).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    unsigned_tx: &'a str,
    signature: &'a str,
}

#[async_trait]
impl NodeApi for HttpClient {
    async fn submit_transaction(&self, unsigned_tx: &str, signature: &str) -> Result<SubmitResult> {
        let url = format!("{}/transactions/submit", self.node);
        let result: SubmitResult = self
            .post_json(
                url,
                &SubmitRequest {
                    unsigned_tx,
                    signature,
                },
            )
            .await?;
        tracing::info!("Submitted transaction {}", result.tx_id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halcyon_params::NetworkPreset;

    #[test]
    fn test_client_config_from_settings() {
        let settings = NetworkSettings::from_preset(&NetworkPreset::testnet());
        let config = ClientConfig::from_settings(&settings);
        assert_eq!(config.explorer_api_host, settings.explorer_api_host);
        assert_eq!(config.node_host, settings.node_host);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let config = ClientConfig {
            explorer_api_host: "http://127.0.0.1:9090/".to_string(),
            ..ClientConfig::default()
        };
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(
            client.explorer_url("/infos"),
            "http://127.0.0.1:9090/infos"
        );
    }

    #[test]
    fn test_balance_decodes_string_amounts() {
        let balance: AddressBalance =
            serde_json::from_str(r#"{"balance":"1000000000000000000000","lockedBalance":"0"}"#)
                .unwrap();
        assert_eq!(balance.balance, 1_000_000_000_000_000_000_000);
    }
}
