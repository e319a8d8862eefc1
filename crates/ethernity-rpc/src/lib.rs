/*!
 * Ethernity RPC
 *
 * Cliente RPC para obtenção de bytecode implantado em nodes Ethereum
 */

use ethernity_core::{Error, error::Result, traits::BytecodeSource, ContractAddress};
use web3::{
    Web3,
    transports::{Http, WebSocket},
    types::H160,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Variável de ambiente com o endpoint do node
pub const RPC_ENDPOINT_ENV: &str = "MAINNET_RPC";

/// Configuração do cliente RPC
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    /// Timeout de cada chamada `eth_getCode`
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub connection_pool_size: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            connection_pool_size: 4,
        }
    }
}

impl RpcConfig {
    /// Configuração padrão com o endpoint lido de `MAINNET_RPC`, quando definido
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(RPC_ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint.trim().to_string();
            }
        }
        config
    }

    /// Substitui o endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Enum para diferentes tipos de transporte
pub enum TransportType {
    Http(Web3<Http>),
    WebSocket(Web3<WebSocket>),
}

/// Cliente RPC para Ethereum
pub struct EthernityRpcClient {
    transport: TransportType,
    config: RpcConfig,
}

impl EthernityRpcClient {
    /// Cria um novo cliente RPC HTTP
    pub async fn new_http(config: RpcConfig) -> Result<Self> {
        let transport = Http::new(&config.endpoint)
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {}", e)))?;

        let client = Self {
            transport: TransportType::Http(Web3::new(transport)),
            config,
        };

        // Verifica a conexão
        client.get_block_number().await?;

        Ok(client)
    }

    /// Cria um novo cliente RPC WebSocket
    pub async fn new_websocket(config: RpcConfig) -> Result<Self> {
        let transport = WebSocket::new(&config.endpoint)
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via WebSocket: {}", e)))?;

        let client = Self {
            transport: TransportType::WebSocket(Web3::new(transport)),
            config,
        };

        // Verifica a conexão
        client.get_block_number().await?;

        Ok(client)
    }

    /// Cria um novo cliente baseado na URL
    pub async fn new(config: RpcConfig) -> Result<Self> {
        if config.endpoint.starts_with("ws") {
            Self::new_websocket(config).await
        } else {
            Self::new_http(config).await
        }
    }

    /// Configuração em uso
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Obtém o número do bloco atual
    pub async fn get_block_number(&self) -> Result<u64> {
        let request = async {
            match &self.transport {
                TransportType::Http(web3) => web3.eth().block_number().await,
                TransportType::WebSocket(web3) => web3.eth().block_number().await,
            }
        };

        let block_number = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| Error::TimeoutError(format!("eth_blockNumber excedeu {:?}", self.config.timeout)))?
            .map_err(|e| Error::RpcError(format!("Falha ao conectar ao node Ethereum: {}", e)))?;

        Ok(block_number.as_u64())
    }

    /// Uma única tentativa de `eth_getCode`, limitada pelo timeout configurado
    async fn fetch_code_once(&self, address: H160) -> Result<Vec<u8>> {
        let request = async {
            match &self.transport {
                TransportType::Http(web3) => web3.eth().code(address, None).await,
                TransportType::WebSocket(web3) => web3.eth().code(address, None).await,
            }
        };

        let code = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| Error::TimeoutError(format!("eth_getCode excedeu {:?}", self.config.timeout)))?
            .map_err(|e| Error::RpcError(format!("Falha ao obter código do contrato: {}", e)))?;

        Ok(code.0)
    }

    /// Obtém o código de um contrato, repetindo até `max_retries` vezes
    pub async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>> {
        let target = H160::from_slice(address.as_address().as_bytes());
        let mut attempt = 0u32;

        loop {
            match self.fetch_code_once(target).await {
                Ok(code) => {
                    debug!(%address, bytes = code.len(), "bytecode obtido");
                    return Ok(code);
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(%address, attempt, error = %e, "falha ao obter bytecode, tentando novamente");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl BytecodeSource for EthernityRpcClient {
    async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>> {
        EthernityRpcClient::get_code(self, address).await
    }
}

/// Pool de conexões RPC
pub struct RpcConnectionPool {
    clients: Vec<Arc<EthernityRpcClient>>,
    current_index: AtomicUsize,
}

impl RpcConnectionPool {
    /// Cria um novo pool de conexões
    pub async fn new(config: RpcConfig, pool_size: usize) -> Result<Self> {
        let pool_size = pool_size.max(1);
        let mut clients = Vec::with_capacity(pool_size);

        for _ in 0..pool_size {
            let client = Arc::new(EthernityRpcClient::new(config.clone()).await?);
            clients.push(client);
        }

        Ok(Self {
            clients,
            current_index: AtomicUsize::new(0),
        })
    }

    /// Obtém o próximo cliente do pool (round-robin)
    pub fn get_client(&self) -> Arc<EthernityRpcClient> {
        let index = self.current_index.fetch_add(1, Ordering::Relaxed) % self.clients.len();
        self.clients[index].clone()
    }

    /// Número de clientes no pool
    pub fn size(&self) -> usize {
        self.clients.len()
    }
}

/// Cliente RPC com balanceamento de carga
pub struct LoadBalancedRpcClient {
    pool: RpcConnectionPool,
}

impl LoadBalancedRpcClient {
    /// Cria um novo cliente com balanceamento de carga
    pub async fn new(config: RpcConfig) -> Result<Self> {
        let pool = RpcConnectionPool::new(config.clone(), config.connection_pool_size).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &RpcConnectionPool {
        &self.pool
    }
}

#[async_trait]
impl BytecodeSource for LoadBalancedRpcClient {
    async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>> {
        let client = self.pool.get_client();
        client.get_code(address).await
    }
}
