/*!
 * Ethernity Scanner - Report
 *
 * Formatação de resultados. Apenas apresentação: nenhuma contagem ou
 * veredito é recalculado aqui além do que `AnalysisResult` expõe.
 */

use crate::types::{AnalysisResult, BatchResult, DetectionResult};
use ethernity_core::{error::Result, Error};
use serde::Serialize;
use std::fmt::Write;

pub const REPORT_TITLE: &str = "========== Relatório de Vulnerabilidades Ethernity ==========";
pub const LABEL_TOTAL: &str = "Padrões analisados";
pub const LABEL_FOUND: &str = "Vulnerabilidades encontradas";
pub const LABEL_CRITICAL: &str = "Críticas";
pub const LABEL_HIGH: &str = "Altas";

/// Relatório legível de um contrato
pub fn render(result: &AnalysisResult) -> String {
    collect(|out| write_report(out, result))
}

/// Escrita em `String` não falha; o `fmt::Result` é descartado só aqui
fn collect(write: impl FnOnce(&mut String) -> std::fmt::Result) -> String {
    let mut out = String::new();
    let _ = write(&mut out);
    out
}

/// Rótulo de estado de uma detecção; sem veredito nunca aparece como seguro
fn status(detection: &DetectionResult) -> &'static str {
    if detection.error.is_some() {
        "ERRO"
    } else if detection.vulnerable {
        "VULNERÁVEL"
    } else {
        "SEGURO"
    }
}

fn write_report(out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
    writeln!(out, "{}", REPORT_TITLE)?;
    writeln!(out, "Contrato: {}", result.contract())?;
    writeln!(out, "Data: {}", result.timestamp().to_rfc3339())?;
    if let Some(error) = result.error() {
        writeln!(out, "Erro: {}", error)?;
    }

    let summary = result.summary();
    writeln!(out)?;
    writeln!(out, "Resumo:")?;
    writeln!(out, "  {}: {}", LABEL_TOTAL, summary.total_patterns)?;
    writeln!(out, "  {}: {}", LABEL_FOUND, summary.vulnerabilities_found)?;
    writeln!(out, "  {}: {}", LABEL_CRITICAL, summary.critical_issues)?;
    writeln!(out, "  {}: {}", LABEL_HIGH, summary.high_issues)?;

    if result.patterns().is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Resultados por padrão:")?;
    for detection in result.patterns().values() {
        writeln!(out, "  [{}] {} ({})", status(detection), detection.pattern, detection.severity)?;
        for line in &detection.evidence {
            writeln!(out, "    - {}", line)?;
        }
        if let Some(error) = &detection.error {
            writeln!(out, "    ! Erro: {}", error)?;
        }
    }
    Ok(())
}

/// Relatórios de todos os contratos seguidos de um rodapé do lote
pub fn render_batch(batch: &BatchResult) -> String {
    collect(|out| write_batch(out, batch))
}

fn write_batch(out: &mut String, batch: &BatchResult) -> std::fmt::Result {
    for result in batch.iter() {
        write_report(out, result)?;
        writeln!(out)?;
    }
    writeln!(out, "========== Lote ==========")?;
    writeln!(out, "Contratos analisados: {}", batch.len())?;
    writeln!(out, "Falhas: {}", batch.failed())?;
    writeln!(out, "Contratos vulneráveis: {}", batch.vulnerable_contracts())
}

/// JSON formatado de um resultado ou lote
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::EncodeError(format!("Falha ao serializar resultado: {}", e)))
}
