use ethernity_core::{utils::normalize_address, ContractAddress, Severity};
use ethernity_scanner::{analyze_bytecode, Bytecode, PatternKind, Registry, Summary};

fn addr(n: u64) -> ContractAddress {
    normalize_address(&format!("0x{:040x}", n)).unwrap()
}

fn code(text: &str) -> Bytecode {
    Bytecode::from(text.as_bytes())
}

/// Código longo o bastante para não disparar a checagem estrutural
fn padded(text: &str) -> Bytecode {
    let mut bytes = vec![0x5b; 128];
    bytes.extend_from_slice(text.as_bytes());
    Bytecode::new(bytes)
}

fn verdict(code: &Bytecode, kind: PatternKind) -> bool {
    analyze_bytecode(addr(1), code).get(kind).unwrap().vulnerable
}

#[test]
fn storage_gap_without_signatures_or_access_control() {
    let result = analyze_bytecode(addr(1), &code("__gap balanceOf"));

    assert!(!result.get(PatternKind::StorageCollision).unwrap().vulnerable);
    assert!(!result.get(PatternKind::SignatureValidation).unwrap().vulnerable);
    assert!(result.get(PatternKind::AccessControl).unwrap().vulnerable);
}

#[test]
fn flash_loan_without_guard_but_with_owner() {
    let result = analyze_bytecode(addr(1), &code("onlyOwner flashLoan"));

    let flash = result.get(PatternKind::FlashLoanReentrancy).unwrap();
    assert!(flash.vulnerable);
    assert!(flash.evidence.iter().any(|e| e.ends_with("flashLoan")));
    assert!(!result.get(PatternKind::AccessControl).unwrap().vulnerable);
    assert!(!result.get(PatternKind::GovernanceManipulation).unwrap().vulnerable);
}

#[test]
fn flash_loan_guard_variants() {
    assert!(!verdict(&code("flashMint nonReentrant"), PatternKind::FlashLoanReentrancy));
    assert!(!verdict(&code("receiveFlashLoan locked"), PatternKind::FlashLoanReentrancy));
    assert!(!verdict(&code("transfer"), PatternKind::FlashLoanReentrancy));
}

#[test]
fn oracle_needs_freshness_check() {
    assert!(verdict(&code("latestRoundData"), PatternKind::OracleStaleness));
    assert!(!verdict(&code("latestRoundData updatedAt"), PatternKind::OracleStaleness));
    assert!(!verdict(&code("getPrice timestamp"), PatternKind::OracleStaleness));
    assert!(!verdict(&code("transfer"), PatternKind::OracleStaleness));
}

#[test]
fn swap_needs_slippage_protection() {
    assert!(verdict(&code("exchange"), PatternKind::FlashSwapSlippage));
    assert!(!verdict(&code("swap amountOutMinimum"), PatternKind::FlashSwapSlippage));
    assert!(!verdict(&code("mint"), PatternKind::FlashSwapSlippage));
}

#[test]
fn signature_entry_point_needs_validation() {
    assert!(verdict(&code("permit"), PatternKind::SignatureValidation));
    assert!(verdict(&code("executeMetaTx"), PatternKind::SignatureValidation));
    assert!(!verdict(&code("permit ecrecover"), PatternKind::SignatureValidation));
    assert!(!verdict(&code("permit _domainSeparator"), PatternKind::SignatureValidation));
    assert!(!verdict(&code("permit domainSeparator"), PatternKind::SignatureValidation));
}

#[test]
fn governance_flags_on_missing_control_only() {
    assert!(verdict(&code("setFee"), PatternKind::GovernanceManipulation));
    assert!(verdict(&code("nothing here"), PatternKind::GovernanceManipulation));
    assert!(!verdict(&code("setFee onlyGovernance"), PatternKind::GovernanceManipulation));
}

#[test]
fn access_control_markers() {
    for marker in ["require(msg.sender", "require(_msgSender()", "onlyRole", "onlyOwner", "onlyAdmin"] {
        assert!(!verdict(&code(marker), PatternKind::AccessControl), "{}", marker);
    }
    assert!(verdict(&code("onlyowner"), PatternKind::AccessControl));
}

#[test]
fn proxy_init_structural_check() {
    assert!(verdict(&code("initialize"), PatternKind::ProxyInit));
    assert!(verdict(&padded("transfer"), PatternKind::ProxyInit));
    assert!(!verdict(&padded("initialize"), PatternKind::ProxyInit));
    assert!(!verdict(&padded("__init__"), PatternKind::ProxyInit));
}

#[test]
fn every_result_has_all_registry_keys_in_order() {
    let inputs = vec![
        Bytecode::new(Vec::new()),
        Bytecode::new(vec![0xff, 0x00, 0xfe, 0x80]),
        code("flashLoan swap permit setFee"),
        padded("initialize __gap onlyOwner nonReentrant minAmountOut ecrecover updatedAt"),
    ];

    for input in &inputs {
        let result = analyze_bytecode(addr(7), input);
        let kinds: Vec<_> = result.patterns().keys().copied().collect();
        assert_eq!(kinds, PatternKind::ALL.to_vec());
        for (kind, detection) in result.patterns() {
            let signature = Registry::get(*kind);
            assert_eq!(detection.pattern, signature.name);
            assert_eq!(detection.severity, signature.severity);
            assert_eq!(detection.address, addr(7));
            assert!(detection.error.is_none());
        }
    }
}

#[test]
fn same_bytes_give_same_detections() {
    let input = padded("flashLoan getPrice swap setLimit permit slot");
    let first = analyze_bytecode(addr(3), &input);
    let second = analyze_bytecode(addr(3), &input);
    assert_eq!(first.patterns(), second.patterns());
}

#[test]
fn summary_counts_match_detections() {
    let inputs = [
        code(""),
        code("flashLoan swap permit latestPrice"),
        padded("initialize __gap onlyOwner"),
        padded("initialize __gap onlyOwner nonReentrant"),
    ];

    for input in &inputs {
        let result = analyze_bytecode(addr(9), input);
        let summary = result.summary();
        let detections: Vec<_> = result.patterns().values().collect();

        assert_eq!(summary.total_patterns, 8);
        assert_eq!(
            summary.vulnerabilities_found,
            detections.iter().filter(|d| d.vulnerable).count()
        );
        assert_eq!(
            summary.critical_issues,
            detections.iter().filter(|d| d.vulnerable && d.severity == Severity::Critical).count()
        );
        assert_eq!(
            summary.high_issues,
            detections.iter().filter(|d| d.vulnerable && d.severity == Severity::High).count()
        );
        assert_eq!(summary, Summary::from_detections(result.patterns().values()));
    }
}

#[test]
fn fully_mitigated_contract_is_clean() {
    let result = analyze_bytecode(
        addr(2),
        &padded("initialize flashLoan nonReentrant swap minAmountOut permit ecrecover onlyOwner __gap"),
    );
    assert_eq!(result.summary().vulnerabilities_found, 0);
}

#[test]
fn empty_code_flags_only_ungated_patterns() {
    let result = analyze_bytecode(addr(4), &code(""));
    let flagged: Vec<_> = result
        .patterns()
        .iter()
        .filter(|(_, d)| d.vulnerable)
        .map(|(k, _)| *k)
        .collect();
    assert_eq!(
        flagged,
        vec![
            PatternKind::ProxyInit,
            PatternKind::GovernanceManipulation,
            PatternKind::AccessControl,
            PatternKind::StorageCollision,
        ]
    );
    let summary = result.summary();
    assert_eq!(summary.critical_issues, 3);
    assert_eq!(summary.high_issues, 1);
}
