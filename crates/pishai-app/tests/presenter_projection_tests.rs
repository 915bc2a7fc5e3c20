//! Integration tests for projecting checker state into display panels.

use pishai_analysis_contract::{ClassifierResponse, RiskBand};
use pishai_core::CheckKind;
use pishai_lifecycle::{RequestCoordinator, SubmitOutcome};
use pishai_ui::{CheckerView, Theme, project, render_text};

fn settled(kind: CheckKind, raw: &str, label: &str, confidence: f64) -> RequestCoordinator {
    let mut coordinator = RequestCoordinator::new(kind);
    let SubmitOutcome::Issued(ticket) = coordinator.submit(raw) else {
        panic!("submit should issue");
    };
    coordinator.on_response(
        ticket.sequence,
        &ClassifierResponse {
            status: Some("success".to_string()),
            label: label.to_string(),
            confidence,
        },
    );
    coordinator
}

#[test]
fn presenter_projection_tests_report_copies_result_fields() {
    let coordinator = settled(CheckKind::Url, "https://example.com", "Phishing/Malicious", 20.0);

    let panel = project(&coordinator, Theme::Light);

    let CheckerView::Report(report) = panel.view else {
        panic!("expected report view");
    };
    assert_eq!(report.verdict, "Potentially malicious");
    assert_eq!(report.security_score, 34);
    assert_eq!(report.trust_level, 15);
    assert_eq!(report.risk_level, 85);
    assert_eq!(report.band, RiskBand::Critical);
    assert_eq!(report.accent, "#b91c1c");
    assert_eq!(report.threats.len(), 1);
    assert_eq!(report.recommendations.len(), 1);
}

#[test]
fn presenter_projection_tests_theme_changes_only_accent() {
    let coordinator = settled(CheckKind::Url, "https://example.com", "Safe", 90.0);

    let light = project(&coordinator, Theme::Light);
    let dark = project(&coordinator, Theme::Dark);

    let (CheckerView::Report(light), CheckerView::Report(dark)) = (light.view, dark.view) else {
        panic!("expected report views");
    };
    assert_ne!(light.accent, dark.accent);
    assert_eq!(light.risk_level, dark.risk_level);
    assert_eq!(light.threats, dark.threats);
}

#[test]
fn presenter_projection_tests_text_render_lists_metrics() {
    let coordinator = settled(
        CheckKind::Email,
        "Lunch at noon?\nSee you there.",
        "Safe",
        90.0,
    );

    let text = render_text(&project(&coordinator, Theme::Light));

    assert!(text.starts_with("[email] Verdict: Safe"));
    assert!(text.contains("Checked:        Lunch at noon? See you there."));
    assert!(text.contains("Security score: 87/100"));
    assert!(text.contains("Trust level:    92%"));
    assert!(text.contains("Risk level:     8%"));
    assert!(text.contains("Threat:         Secure: appears legitimate, minimal risk"));
}

#[test]
fn presenter_projection_tests_json_panel_is_tagged_by_state() {
    let coordinator = RequestCoordinator::new(CheckKind::Url);

    let json = serde_json::to_value(project(&coordinator, Theme::Light))
        .expect("panel should serialize");

    assert_eq!(json["kind"], "url");
    assert_eq!(json["submit_enabled"], true);
    assert_eq!(json["view"]["state"], "idle");
    assert_eq!(json["view"]["prompt"], "Enter a URL to check");
}
