/*!
 * Ethernity Traits
 * 
 * Traits comuns usados em toda a workspace Ethernity
 */

use async_trait::async_trait;
use crate::error::Result;
use crate::types::ContractAddress;

/// Fonte de bytecode implantado
///
/// Implementações devem falhar com um erro de obtenção (`RpcError`,
/// `TimeoutError` ou `NotFound`) quando o node não responde. Bytecode vazio
/// é devolvido como está; cabe ao chamador decidir o que isso significa.
#[async_trait]
pub trait BytecodeSource: Send + Sync {
    /// Obtém o código de um contrato
    async fn get_code(&self, address: &ContractAddress) -> Result<Vec<u8>>;
}
