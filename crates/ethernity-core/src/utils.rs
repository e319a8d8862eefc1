/*!
 * Ethernity Utils
 * 
 * Utilitários comuns usados em toda a workspace Ethernity
 */

use ethereum_types::Address;
use ethers::utils::to_checksum;

use crate::error::{Error, Result};
use crate::types::ContractAddress;

/// Remove o prefixo `0x` (ou `0X`), se houver
fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Converte uma string hexadecimal para Address, sem verificar checksum
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = strip_hex_prefix(hex);
    if hex_str.len() != 40 {
        return None;
    }
    let bytes = hex::decode(hex_str).ok()?;
    Some(Address::from_slice(&bytes))
}

/// Verifica se uma string é um endereço válido
///
/// Aceita 40 dígitos hexadecimais com ou sem `0x`. Strings totalmente
/// minúsculas ou maiúsculas são aceitas como estão; caixa mista precisa
/// bater com o checksum EIP-55.
pub fn is_valid_address(input: &str) -> bool {
    let hex_str = strip_hex_prefix(input.trim());
    let Some(address) = hex_to_address(hex_str) else {
        return false;
    };

    let has_lower = hex_str.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_str.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return to_checksum_address(&address)[2..] == *hex_str;
    }
    true
}

/// Valida e normaliza um endereço
pub fn normalize_address(input: &str) -> Result<ContractAddress> {
    if !is_valid_address(input) {
        return Err(Error::InvalidAddress(input.to_string()));
    }
    hex_to_address(input.trim())
        .map(ContractAddress::from_raw)
        .ok_or_else(|| Error::InvalidAddress(input.to_string()))
}

/// Formata um Address com checksum EIP-55
pub fn to_checksum_address(address: &Address) -> String {
    to_checksum(address, None)
}
