/*!
 * Ethernity Scanner - Types
 *
 * Estruturas de resultado expostas pela varredura. O formato serializado
 * é o contrato com consumidores externos; mudanças incompatíveis exigem
 * incrementar `SCHEMA_VERSION`.
 */

use crate::detector::Verdict;
use crate::patterns::{PatternKind, Signature};
use chrono::{DateTime, Utc};
use ethernity_core::{ContractAddress, Error, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Versão do formato serializado de [`AnalysisResult`]
pub const SCHEMA_VERSION: u32 = 1;

/// Bytecode implantado, tratado como bytes opacos
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytecode(Vec<u8>);

impl Bytecode {
    pub fn new(code: Vec<u8>) -> Self {
        Self(code)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Busca de substring exata, sensível a maiúsculas
    pub fn contains(&self, marker: &[u8]) -> bool {
        if marker.is_empty() {
            return true;
        }
        self.0.windows(marker.len()).any(|window| window == marker)
    }
}

impl From<Vec<u8>> for Bytecode {
    fn from(code: Vec<u8>) -> Self {
        Self(code)
    }
}

impl From<&[u8]> for Bytecode {
    fn from(code: &[u8]) -> Self {
        Self(code.to_vec())
    }
}

impl AsRef<[u8]> for Bytecode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Resultado de um detector aplicado a um contrato
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Nome legível do padrão
    pub pattern: String,
    pub address: ContractAddress,
    pub severity: Severity,
    pub vulnerable: bool,
    #[serde(rename = "details")]
    pub evidence: Vec<String>,
    /// Presente quando o detector não pôde concluir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionResult {
    pub fn from_verdict(signature: &Signature, address: ContractAddress, verdict: Verdict) -> Self {
        Self {
            pattern: signature.name.to_string(),
            address,
            severity: signature.severity,
            vulnerable: verdict.vulnerable,
            evidence: verdict.evidence,
            error: None,
        }
    }

    /// Resultado sem veredito: `vulnerable` fica falso e o erro é anexado
    pub fn failed(signature: &Signature, address: ContractAddress, error: &Error) -> Self {
        Self {
            pattern: signature.name.to_string(),
            address,
            severity: signature.severity,
            vulnerable: false,
            evidence: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Contagens derivadas de um conjunto de detecções
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_patterns: usize,
    pub vulnerabilities_found: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
}

impl Summary {
    pub fn from_detections<'a, I>(detections: I) -> Self
    where
        I: IntoIterator<Item = &'a DetectionResult>,
    {
        let mut summary = Summary::default();
        for detection in detections {
            summary.total_patterns += 1;
            if !detection.vulnerable {
                continue;
            }
            summary.vulnerabilities_found += 1;
            match detection.severity {
                Severity::Critical => summary.critical_issues += 1,
                Severity::High => summary.high_issues += 1,
            }
        }
        summary
    }
}

/// Varredura completa de um contrato
///
/// O resumo não é armazenado: é recalculado a partir das detecções tanto
/// em [`AnalysisResult::summary`] quanto na serialização.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AnalysisRecord", from = "AnalysisRecord")]
pub struct AnalysisResult {
    contract: String,
    timestamp: DateTime<Utc>,
    patterns: BTreeMap<PatternKind, DetectionResult>,
    error: Option<String>,
}

impl AnalysisResult {
    pub fn new(
        address: ContractAddress,
        timestamp: DateTime<Utc>,
        patterns: BTreeMap<PatternKind, DetectionResult>,
    ) -> Self {
        Self {
            contract: address.to_checksum(),
            timestamp,
            patterns,
            error: None,
        }
    }

    /// Resultado para um endereço rejeitado antes de qualquer detecção
    pub fn invalid(input: &str, error: &Error) -> Self {
        Self {
            contract: input.to_string(),
            timestamp: Utc::now(),
            patterns: BTreeMap::new(),
            error: Some(error.to_string()),
        }
    }

    /// Endereço normalizado (ou a entrada original, se inválida)
    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Detecções por padrão, na ordem do registro
    pub fn patterns(&self) -> &BTreeMap<PatternKind, DetectionResult> {
        &self.patterns
    }

    pub fn get(&self, kind: PatternKind) -> Option<&DetectionResult> {
        self.patterns.get(&kind)
    }

    /// Erro que impediu a análise inteira (endereço inválido)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Verdadeiro se a análise ou algum detector terminou com erro
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.patterns.values().any(|p| p.error.is_some())
    }

    pub fn summary(&self) -> Summary {
        Summary::from_detections(self.patterns.values())
    }
}

/// Forma serializada de [`AnalysisResult`]
#[derive(Serialize, Deserialize)]
struct AnalysisRecord {
    schema_version: u32,
    contract: String,
    timestamp: DateTime<Utc>,
    patterns: BTreeMap<PatternKind, DetectionResult>,
    summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<AnalysisResult> for AnalysisRecord {
    fn from(result: AnalysisResult) -> Self {
        let summary = result.summary();
        Self {
            schema_version: SCHEMA_VERSION,
            contract: result.contract,
            timestamp: result.timestamp,
            patterns: result.patterns,
            summary,
            error: result.error,
        }
    }
}

impl From<AnalysisRecord> for AnalysisResult {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            contract: record.contract,
            timestamp: record.timestamp,
            patterns: record.patterns,
            error: record.error,
        }
    }
}

/// Resultados de um lote, na ordem dos endereços de entrada
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResult {
    pub results: Vec<AnalysisResult>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter()
    }

    /// Contratos cuja análise terminou com algum erro
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.has_errors()).count()
    }

    /// Contratos com ao menos uma vulnerabilidade
    pub fn vulnerable_contracts(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.summary().vulnerabilities_found > 0)
            .count()
    }
}

impl From<Vec<AnalysisResult>> for BatchResult {
    fn from(results: Vec<AnalysisResult>) -> Self {
        Self { results }
    }
}
