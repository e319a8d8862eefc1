/*!
 * Ethernity Scanner - Detector
 *
 * Avaliador genérico: aplica uma linha do catálogo de padrões a um bytecode.
 */

use crate::patterns::{Gate, Signature};
use crate::types::Bytecode;
use ethernity_core::{error::Result, Error};

/// Veredito de um detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub vulnerable: bool,
    pub evidence: Vec<String>,
}

/// Marcadores da lista presentes no código, na ordem da lista
fn markers_found(code: &Bytecode, markers: &'static [&'static str]) -> Vec<&'static str> {
    markers
        .iter()
        .copied()
        .filter(|marker| code.contains(marker.as_bytes()))
        .collect()
}

impl Signature {
    /// Marcador vazio casaria com qualquer código
    fn validate(&self) -> Result<()> {
        let lists = [self.risk_markers, self.mitigation_markers, self.context_markers];
        if lists.iter().flat_map(|list| list.iter()).any(|m| m.is_empty()) {
            return Err(Error::ValidationError(format!(
                "padrão {} possui marcador vazio",
                self.key()
            )));
        }
        Ok(())
    }

    /// Aplica a assinatura ao código
    ///
    /// Ausência de marcadores é um resultado normal; erro só é devolvido
    /// quando a própria definição do padrão é defeituosa.
    pub fn evaluate(&self, code: &Bytecode) -> Result<Verdict> {
        self.validate()?;

        let risks = markers_found(code, self.risk_markers);
        let mitigations = markers_found(code, self.mitigation_markers);
        let context = markers_found(code, self.context_markers);

        let mut evidence: Vec<String> = risks
            .iter()
            .map(|marker| format!("{}: {}", self.risk_label, marker))
            .collect();

        let vulnerable = match self.gate {
            Gate::Structural { min_code_len } => {
                let too_short = code.len() < min_code_len;
                if too_short {
                    evidence.push(format!(
                        "Código com {} bytes, abaixo do mínimo de {} (possível proxy não inicializado)",
                        code.len(),
                        min_code_len
                    ));
                }
                too_short || mitigations.is_empty()
            }
            Gate::RiskGated => !risks.is_empty() && mitigations.is_empty(),
            Gate::AbsenceOnly => mitigations.is_empty(),
        };

        if !mitigations.is_empty() {
            evidence.push(format!("{}: {}", self.mitigation_label, mitigations.join(", ")));
        } else if self.gate != Gate::RiskGated || !risks.is_empty() {
            evidence.push(self.missing_note.to_string());
        }

        if vulnerable && self.gate == Gate::AbsenceOnly && risks.is_empty() {
            if let Some(note) = self.no_risk_note {
                evidence.push(note.to_string());
            }
        }

        if !context.is_empty() {
            evidence.push(format!("{}: {}", self.context_label, context.join(", ")));
        }

        Ok(Verdict { vulnerable, evidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternKind;
    use ethernity_core::Severity;

    fn code(text: &str) -> Bytecode {
        Bytecode::from(text.as_bytes())
    }

    #[test]
    fn risk_gated_needs_risk_marker() {
        let signature = PatternKind::FlashLoanReentrancy.signature();

        let quiet = signature.evaluate(&code("transfer balanceOf")).unwrap();
        assert!(!quiet.vulnerable);
        assert!(quiet.evidence.is_empty());

        let exposed = signature.evaluate(&code("flashLoan flashMint")).unwrap();
        assert!(exposed.vulnerable);
        assert_eq!(
            exposed.evidence,
            vec![
                "Função de flash loan encontrada: flashLoan".to_string(),
                "Função de flash loan encontrada: flashMint".to_string(),
                "Nenhuma proteção contra reentrância detectada".to_string(),
            ]
        );

        let guarded = signature.evaluate(&code("flashLoan nonReentrant")).unwrap();
        assert!(!guarded.vulnerable);
    }

    #[test]
    fn structural_flags_short_code_even_with_initializer() {
        let signature = PatternKind::ProxyInit.signature();
        let verdict = signature.evaluate(&code("initialize")).unwrap();
        assert!(verdict.vulnerable);
        assert!(verdict.evidence[0].starts_with("Código com 10 bytes"));

        let mut long = vec![0u8; 120];
        long.extend_from_slice(b"initialize");
        let verdict = signature.evaluate(&Bytecode::new(long)).unwrap();
        assert!(!verdict.vulnerable);
    }

    #[test]
    fn structural_flags_missing_initializer() {
        let signature = PatternKind::ProxyInit.signature();
        let verdict = signature.evaluate(&Bytecode::new(vec![0x60; 200])).unwrap();
        assert!(verdict.vulnerable);
        assert_eq!(verdict.evidence, vec!["Nenhuma função de inicialização detectada".to_string()]);
    }

    #[test]
    fn governance_notes_missing_surface() {
        let signature = PatternKind::GovernanceManipulation.signature();
        let verdict = signature.evaluate(&code("transfer")).unwrap();
        assert!(verdict.vulnerable);
        assert_eq!(verdict.evidence.len(), 2);
        assert!(verdict.evidence[1].contains("veredito baseado apenas"));

        let verdict = signature.evaluate(&code("setFee")).unwrap();
        assert!(verdict.vulnerable);
        assert_eq!(verdict.evidence[0], "Função de governança encontrada: setFee");
        assert!(!verdict.evidence.iter().any(|e| e.contains("veredito baseado apenas")));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let signature = PatternKind::StorageCollision.signature();
        assert!(signature.evaluate(&code("__GAP")).unwrap().vulnerable);
        assert!(!signature.evaluate(&code("__gap")).unwrap().vulnerable);
    }

    #[test]
    fn context_markers_do_not_change_verdict() {
        let signature = PatternKind::StorageCollision.signature();
        let verdict = signature.evaluate(&code("slot storage")).unwrap();
        assert!(verdict.vulnerable);
        assert_eq!(verdict.evidence.last().unwrap(), "Referências de storage: slot, storage");
    }

    #[test]
    fn empty_marker_is_a_detector_fault() {
        let broken = Signature {
            kind: PatternKind::AccessControl,
            name: "Broken",
            severity: Severity::Critical,
            gate: Gate::AbsenceOnly,
            risk_markers: &[],
            risk_label: "",
            mitigation_markers: &[""],
            mitigation_label: "",
            missing_note: "",
            no_risk_note: None,
            context_markers: &[],
            context_label: "",
        };
        let err = broken.evaluate(&code("anything")).unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[test]
    fn works_on_non_utf8_bytes() {
        let mut raw = vec![0xff, 0xfe, 0x00];
        raw.extend_from_slice(b"onlyOwner");
        raw.push(0x80);
        let verdict = PatternKind::AccessControl.signature().evaluate(&Bytecode::new(raw)).unwrap();
        assert!(!verdict.vulnerable);
    }
}
