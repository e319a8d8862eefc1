/*!
 * Ethernity Scanner - Patterns
 *
 * Catálogo fechado de assinaturas de vulnerabilidade. Cada entrada descreve
 * quais marcadores indicam risco, quais indicam mitigação e como os dois se
 * combinam num veredito. Adicionar um padrão exige mudar este arquivo.
 */

use ethernity_core::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tamanho mínimo (em bytes) esperado de um contrato inicializável
pub const MIN_PROXY_CODE_LEN: usize = 100;

/// Chave de um padrão do catálogo
///
/// A ordem de declaração é a ordem do registro, usada também na
/// apresentação dos resultados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    ProxyInit,
    FlashLoanReentrancy,
    OracleStaleness,
    FlashSwapSlippage,
    GovernanceManipulation,
    AccessControl,
    SignatureValidation,
    StorageCollision,
}

impl PatternKind {
    /// Todos os padrões, na ordem do registro
    pub const ALL: [PatternKind; 8] = [
        PatternKind::ProxyInit,
        PatternKind::FlashLoanReentrancy,
        PatternKind::OracleStaleness,
        PatternKind::FlashSwapSlippage,
        PatternKind::GovernanceManipulation,
        PatternKind::AccessControl,
        PatternKind::SignatureValidation,
        PatternKind::StorageCollision,
    ];

    /// Chave estável usada na serialização
    pub fn key(&self) -> &'static str {
        match self {
            PatternKind::ProxyInit => "proxy_init",
            PatternKind::FlashLoanReentrancy => "flash_loan_reentrancy",
            PatternKind::OracleStaleness => "oracle_staleness",
            PatternKind::FlashSwapSlippage => "flash_swap_slippage",
            PatternKind::GovernanceManipulation => "governance_manipulation",
            PatternKind::AccessControl => "access_control",
            PatternKind::SignatureValidation => "signature_validation",
            PatternKind::StorageCollision => "storage_collision",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Assinatura associada ao padrão
    pub fn signature(&self) -> &'static Signature {
        &SIGNATURES[*self as usize]
    }

    pub fn severity(&self) -> Severity {
        self.signature().severity
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Regra que combina marcadores de risco e de mitigação
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Vulnerável quando o código é curto demais ou nenhum marcador de
    /// mitigação (inicializador) aparece
    Structural { min_code_len: usize },
    /// Vulnerável quando algum marcador de risco aparece e nenhum de mitigação
    RiskGated,
    /// Vulnerável quando nenhum marcador de mitigação aparece; marcadores de
    /// risco servem apenas como evidência
    AbsenceOnly,
}

/// Definição declarativa de um padrão
#[derive(Debug)]
pub struct Signature {
    pub kind: PatternKind,
    /// Nome legível do padrão
    pub name: &'static str,
    pub severity: Severity,
    pub gate: Gate,
    pub risk_markers: &'static [&'static str],
    pub risk_label: &'static str,
    pub mitigation_markers: &'static [&'static str],
    pub mitigation_label: &'static str,
    /// Nota registrada quando nenhuma mitigação é encontrada
    pub missing_note: &'static str,
    /// Nota extra para `AbsenceOnly` quando nenhum marcador de risco aparece
    pub no_risk_note: Option<&'static str>,
    /// Marcadores apenas informativos, nunca afetam o veredito
    pub context_markers: &'static [&'static str],
    pub context_label: &'static str,
}

impl Signature {
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }
}

static SIGNATURES: [Signature; 8] = [
    Signature {
        kind: PatternKind::ProxyInit,
        name: "Proxy Initialization Bypass",
        severity: Severity::Critical,
        gate: Gate::Structural { min_code_len: MIN_PROXY_CODE_LEN },
        risk_markers: &[],
        risk_label: "",
        mitigation_markers: &["initialize", "__init__"],
        mitigation_label: "Função de inicialização encontrada",
        missing_note: "Nenhuma função de inicialização detectada",
        no_risk_note: None,
        context_markers: &["delegatecall", "fallback", "proxy"],
        context_label: "Indícios de proxy",
    },
    Signature {
        kind: PatternKind::FlashLoanReentrancy,
        name: "Flash Loan Reentrancy",
        severity: Severity::Critical,
        gate: Gate::RiskGated,
        risk_markers: &["flashLoan", "flashMint", "receiveFlashLoan"],
        risk_label: "Função de flash loan encontrada",
        mitigation_markers: &["nonReentrant", "locked"],
        mitigation_label: "Proteção contra reentrância presente",
        missing_note: "Nenhuma proteção contra reentrância detectada",
        no_risk_note: None,
        context_markers: &[],
        context_label: "",
    },
    Signature {
        kind: PatternKind::OracleStaleness,
        name: "Oracle Staleness Exploitation",
        severity: Severity::High,
        gate: Gate::RiskGated,
        risk_markers: &["latestRoundData", "latestPrice", "getPrice", "peek", "read"],
        risk_label: "Chamada de oráculo encontrada",
        mitigation_markers: &["updatedAt", "timestamp"],
        mitigation_label: "Validação de atualidade presente",
        missing_note: "Nenhuma validação de timestamp para dados do oráculo",
        no_risk_note: None,
        context_markers: &[],
        context_label: "",
    },
    Signature {
        kind: PatternKind::FlashSwapSlippage,
        name: "Flash Swap Slippage Bypass",
        severity: Severity::High,
        gate: Gate::RiskGated,
        risk_markers: &["swap", "exchange"],
        risk_label: "Função de swap/exchange encontrada",
        mitigation_markers: &["minAmountOut", "maxSlippage", "amountOutMinimum"],
        mitigation_label: "Proteção de slippage presente",
        missing_note: "Nenhuma proteção de slippage detectada",
        no_risk_note: None,
        context_markers: &[],
        context_label: "",
    },
    Signature {
        kind: PatternKind::GovernanceManipulation,
        name: "Governance Manipulation",
        severity: Severity::Critical,
        gate: Gate::AbsenceOnly,
        risk_markers: &["setParameter", "updateConfig", "setFee", "setLimit", "proposeGovernance"],
        risk_label: "Função de governança encontrada",
        mitigation_markers: &["onlyOwner", "onlyGovernance"],
        mitigation_label: "Controle de acesso de governança presente",
        missing_note: "Controle de acesso fraco nas funções de governança",
        // heurística conhecidamente ruidosa: sinaliza mesmo sem superfície de governança
        no_risk_note: Some("Nenhuma função de governança encontrada; veredito baseado apenas na ausência de controle de acesso"),
        context_markers: &[],
        context_label: "",
    },
    Signature {
        kind: PatternKind::AccessControl,
        name: "Access Control Bypass",
        severity: Severity::Critical,
        gate: Gate::AbsenceOnly,
        risk_markers: &[],
        risk_label: "",
        mitigation_markers: &[
            "require(msg.sender",
            "require(_msgSender()",
            "onlyRole",
            "onlyOwner",
            "onlyAdmin",
        ],
        mitigation_label: "Controle de acesso encontrado",
        missing_note: "Nenhum controle de acesso detectado",
        no_risk_note: None,
        context_markers: &[],
        context_label: "",
    },
    Signature {
        kind: PatternKind::SignatureValidation,
        name: "Signature Validation Flaws",
        severity: Severity::High,
        gate: Gate::RiskGated,
        risk_markers: &["permit", "executeMetaTx"],
        risk_label: "Função baseada em assinatura encontrada",
        mitigation_markers: &["ecrecover", "checkSignature", "verifySignature", "domainSeparator"],
        mitigation_label: "Validação de assinatura presente",
        missing_note: "Validação de assinatura fraca ou ausente",
        no_risk_note: None,
        context_markers: &[],
        context_label: "",
    },
    Signature {
        kind: PatternKind::StorageCollision,
        name: "Storage Collision Vulnerabilities",
        severity: Severity::High,
        gate: Gate::AbsenceOnly,
        risk_markers: &[],
        risk_label: "",
        mitigation_markers: &["__gap"],
        mitigation_label: "Storage gap encontrado",
        missing_note: "Nenhum storage gap detectado",
        no_risk_note: None,
        context_markers: &["slot", "gap", "storage", "Layout"],
        context_label: "Referências de storage",
    },
];

/// Registro imutável dos padrões
///
/// Compartilhado sem sincronização entre análises concorrentes.
pub struct Registry;

impl Registry {
    /// Assinaturas na ordem do registro
    pub fn list() -> &'static [Signature] {
        &SIGNATURES
    }

    pub fn get(kind: PatternKind) -> &'static Signature {
        kind.signature()
    }

    /// Busca uma assinatura pela chave serializada (`"proxy_init"`, ...)
    pub fn lookup(key: &str) -> Option<&'static Signature> {
        PatternKind::from_key(key).map(|kind| kind.signature())
    }

    pub fn len() -> usize {
        SIGNATURES.len()
    }
}
