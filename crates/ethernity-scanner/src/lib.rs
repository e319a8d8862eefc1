/*!
 * Ethernity Scanner
 *
 * Varredura heurística de bytecode EVM implantado. Testa o código de cada
 * contrato contra um catálogo fixo de assinaturas de vulnerabilidade
 * (presença de recurso arriscado e ausência de mitigação) e produz um
 * veredito por padrão, um resumo e um relatório legível.
 */

mod detector;
mod engine;
mod patterns;
mod types;
pub mod report;

// Re-exportações públicas
pub use detector::*;
pub use engine::*;
pub use patterns::*;
pub use types::*;

/// Configuração do analisador
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Máximo de endereços analisados simultaneamente em um lote
    pub max_concurrency: usize,
    /// Habilita análise paralela de lotes
    pub enable_parallel: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            enable_parallel: true,
        }
    }
}
