/*!
 * Ethernity Scanner - Engine
 *
 * Executa todos os detectores do registro sobre o bytecode de um contrato
 * e agrega os resultados.
 */

use crate::patterns::{Registry, Signature};
use crate::types::{AnalysisResult, BatchResult, Bytecode, DetectionResult};
use crate::ScannerConfig;
use chrono::Utc;
use ethernity_core::{
    error::Result, traits::BytecodeSource, utils::normalize_address, ContractAddress, Error,
};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Aplica um único detector, convertendo falhas em dado
pub fn run_detector(signature: &Signature, address: ContractAddress, code: &Bytecode) -> DetectionResult {
    match signature.evaluate(code) {
        Ok(verdict) => DetectionResult::from_verdict(signature, address, verdict),
        Err(e) => {
            warn!(pattern = signature.key(), error = %e, "falha no detector");
            DetectionResult::failed(signature, address, &e)
        }
    }
}

/// Analisa um bytecode já obtido com todos os padrões do registro
pub fn analyze_bytecode(address: ContractAddress, code: &Bytecode) -> AnalysisResult {
    let patterns: BTreeMap<_, _> = Registry::list()
        .iter()
        .map(|signature| (signature.kind, run_detector(signature, address, code)))
        .collect();

    let result = AnalysisResult::new(address, Utc::now(), patterns);
    let summary = result.summary();
    info!(
        contract = %address,
        bytes = code.len(),
        vulnerabilities = summary.vulnerabilities_found,
        critical = summary.critical_issues,
        high = summary.high_issues,
        "análise concluída"
    );
    result
}

/// Resultado para um contrato cujo bytecode não pôde ser obtido
///
/// Cada padrão recebe o erro anexado e nenhum veredito.
fn fetch_failed(address: ContractAddress, error: &Error) -> AnalysisResult {
    if error.is_fetch_error() {
        warn!(contract = %address, error = %error, "falha ao obter bytecode");
    } else {
        error!(contract = %address, error = %error, "fonte de bytecode retornou erro inesperado");
    }
    let patterns = Registry::list()
        .iter()
        .map(|signature| (signature.kind, DetectionResult::failed(signature, address, error)))
        .collect();
    AnalysisResult::new(address, Utc::now(), patterns)
}

/// Analisador de bytecode de contratos
pub struct BytecodeScanner {
    config: ScannerConfig,
    source: Arc<dyn BytecodeSource>,
}

impl BytecodeScanner {
    /// Cria um novo analisador
    pub fn new(source: Arc<dyn BytecodeSource>, config: Option<ScannerConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
            source,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Obtém o bytecode; código vazio conta como falha de obtenção
    async fn fetch_code(&self, address: &ContractAddress) -> Result<Bytecode> {
        let code = self.source.get_code(address).await?;
        if code.is_empty() {
            return Err(Error::NotFound(format!("{} não possui código implantado", address)));
        }
        debug!(contract = %address, bytes = code.len(), "bytecode recebido");
        Ok(Bytecode::new(code))
    }

    /// Analisa um contrato pelo endereço
    ///
    /// Nunca falha: endereço inválido e erro de obtenção viram dados no
    /// resultado. Um endereço inválido não chega à fonte de bytecode.
    pub async fn analyze_contract(&self, address: &str) -> AnalysisResult {
        let address = match normalize_address(address) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(input = address, error = %e, "endereço rejeitado");
                return AnalysisResult::invalid(address, &e);
            }
        };

        match self.fetch_code(&address).await {
            Ok(code) => analyze_bytecode(address, &code),
            Err(e) => fetch_failed(address, &e),
        }
    }

    /// Analisa um bytecode já obtido
    pub fn analyze_bytecode(&self, address: ContractAddress, code: &Bytecode) -> AnalysisResult {
        analyze_bytecode(address, code)
    }

    /// Analisa um lote de endereços, preservando a ordem de entrada
    pub async fn analyze_batch<S: AsRef<str>>(&self, addresses: &[S]) -> BatchResult {
        let results = if self.config.enable_parallel {
            stream::iter(addresses)
                .map(|address| self.analyze_contract(address.as_ref()))
                .buffered(self.config.max_concurrency.max(1))
                .collect::<Vec<_>>()
                .await
        } else {
            let mut results = Vec::with_capacity(addresses.len());
            for address in addresses {
                results.push(self.analyze_contract(address.as_ref()).await);
            }
            results
        };

        let batch = BatchResult::from(results);
        info!(
            contracts = batch.len(),
            failed = batch.failed(),
            vulnerable = batch.vulnerable_contracts(),
            "lote concluído"
        );
        batch
    }
}
