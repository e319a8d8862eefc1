/*!
 * Ethernity Types
 * 
 * Tipos comuns usados em toda a workspace Ethernity
 */

use ethereum_types::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::utils;

/// Endereço de contrato já validado
///
/// Só pode ser construído através de [`utils::normalize_address`], então
/// um valor desse tipo nunca carrega um endereço inválido.
/// A exibição usa o checksum EIP-55.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractAddress(Address);

impl ContractAddress {
    pub(crate) fn from_raw(address: Address) -> Self {
        Self(address)
    }

    /// Endereço bruto de 20 bytes
    pub fn as_address(&self) -> &Address {
        &self.0
    }

    /// Representação com checksum EIP-55
    pub fn to_checksum(&self) -> String {
        utils::to_checksum_address(&self.0)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for ContractAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for ContractAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        utils::normalize_address(&raw).map_err(serde::de::Error::custom)
    }
}

/// Severidade fixa de um padrão de vulnerabilidade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}
