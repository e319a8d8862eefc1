use thiserror::Error;

/// Erros comuns da biblioteca Ethernity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Endereço malformado ou com checksum inválido
    #[error("Endereço inválido: {0}")]
    InvalidAddress(String),

    /// Erro de comunicação com o node Ethereum
    #[error("Erro de RPC: {0}")]
    RpcError(String),

    /// Erro de timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Recurso não encontrado (ex.: endereço sem código implantado)
    #[error("Não encontrado: {0}")]
    NotFound(String),

    /// Erro de codificação de dados
    #[error("Erro de codificação: {0}")]
    EncodeError(String),

    /// Erro de validação
    #[error("Erro de validação: {0}")]
    ValidationError(String),
}

impl Error {
    /// Indica se o erro veio da obtenção do bytecode (node inacessível,
    /// timeout ou contrato sem código)
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::RpcError(_) | Error::TimeoutError(_) | Error::NotFound(_)
        )
    }
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
