//! Integration tests for score derivation ranges and reference scenarios.

use pishai_analysis_contract::{RiskBand, derive};

#[test]
fn score_derivation_tests_safe_verdicts_stay_in_range() {
    for confidence in 0..=100 {
        let confidence = f64::from(confidence);
        let result = derive(true, confidence);

        assert!((60..=90).contains(&result.security_score), "{result:?}");
        assert!(f64::from(result.trust_level) >= confidence, "{result:?}");
        assert!(result.trust_level <= 100);
        assert_eq!(u16::from(result.trust_level) + u16::from(result.risk_level), 100);
    }
}

#[test]
fn score_derivation_tests_unsafe_verdicts_stay_in_range() {
    for confidence in 0..=100 {
        let confidence = f64::from(confidence);
        let result = derive(false, confidence);

        assert!((10..=40).contains(&result.security_score), "{result:?}");
        assert!(f64::from(result.trust_level) <= confidence, "{result:?}");
        assert_eq!(u16::from(result.trust_level) + u16::from(result.risk_level), 100);
    }
}

#[test]
fn score_derivation_tests_fractional_confidences_keep_sum_invariant() {
    for step in 0..=1000 {
        let confidence = f64::from(step) / 10.0;
        for is_safe in [true, false] {
            let result = derive(is_safe, confidence);
            assert_eq!(
                u16::from(result.trust_level) + u16::from(result.risk_level),
                100,
                "safe={is_safe} confidence={confidence}"
            );
        }
    }
}

#[test]
fn score_derivation_tests_is_idempotent() {
    assert_eq!(derive(true, 42.5), derive(true, 42.5));
    assert_eq!(derive(false, 99.99), derive(false, 99.99));
}

#[test]
fn score_derivation_tests_safe_high_confidence_scenario() {
    let result = derive(true, 90.0);

    assert!(result.is_safe);
    assert_eq!(result.security_score, 87);
    // 90 + (100 - 90) * 0.15 = 91.5
    assert_eq!(result.trust_level, 92);
    assert_eq!(result.risk_level, 8);
    assert_eq!(result.band(), RiskBand::Secure);
    assert_eq!(
        result.threats,
        vec!["Secure: appears legitimate, minimal risk".to_string()]
    );
}

#[test]
fn score_derivation_tests_phishing_scenario() {
    let result = derive(false, 80.0);

    assert!(!result.is_safe);
    assert_eq!(result.security_score, 16);
    assert_eq!(result.trust_level, 60);
    assert_eq!(result.risk_level, 40);
    assert_eq!(result.band(), RiskBand::Moderate);
    assert_eq!(
        result.threats,
        vec!["Moderate Risk: unusual domain or tracker detected".to_string()]
    );
    assert_eq!(
        result.recommendations,
        vec!["Verify domain spelling and certificate before proceeding".to_string()]
    );
}
