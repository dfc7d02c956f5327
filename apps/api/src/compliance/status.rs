use serde::{Deserialize, Serialize};

use crate::compliance::score::ComplianceScore;
use crate::trust::profile::{RiskTier, TrustProfile};

const NOT_COMPLIANT_BELOW: u32 = 50;
const NEEDS_REVIEW_BELOW: u32 = 70;
const CRITICAL_CONSISTENCY_BELOW: f64 = 30.0;
const CRITICAL_CERTIFICATION_RATIO_BELOW: f64 = 0.30;
const MAX_MISSING_OR_EXPIRED_CERTIFICATES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NeedsReview,
    NotCompliant,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NeedsReview => "needs_review",
            ComplianceStatus::NotCompliant => "not_compliant",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "compliant" => Some(ComplianceStatus::Compliant),
            "needs_review" => Some(ComplianceStatus::NeedsReview),
            "not_compliant" => Some(ComplianceStatus::NotCompliant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagCode {
    RiskTierCritical,
    LowBackgroundConsistency,
    LowCertificationCompliance,
    RiskTierHigh,
    RankProgressionAnomaly,
    CertificatesMissingOrExpired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceFlag {
    pub code: FlagCode,
    pub severity: FlagSeverity,
    pub detail: String,
}

impl ComplianceFlag {
    fn critical(code: FlagCode, detail: String) -> Self {
        Self {
            code,
            severity: FlagSeverity::Critical,
            detail,
        }
    }

    fn warning(code: FlagCode, detail: String) -> Self {
        Self {
            code,
            severity: FlagSeverity::Warning,
            detail,
        }
    }
}

/// Profile-level risk signals checked alongside the composite score.
/// Values are unrounded; the breakdown only carries display figures.
#[derive(Debug, Clone, Default)]
pub struct RiskIndicators {
    pub background_consistency: Option<f64>,
    pub risk_tier: Option<RiskTier>,
    pub rank_anomaly: bool,
    pub certificate_compliance_ratio: Option<f64>,
    pub missing_or_expired_certificates: u32,
}

impl RiskIndicators {
    pub fn from_profile(profile: &TrustProfile) -> Self {
        let stcw = profile.rank_stcw();
        Self {
            background_consistency: profile.background_consistency_score,
            risk_tier: profile.risk_tier,
            rank_anomaly: profile.rank_anomaly_flag,
            certificate_compliance_ratio: stcw.and_then(|d| d.certificate_compliance_ratio),
            missing_or_expired_certificates: stcw
                .map(|d| d.missing_certificates + d.expired_certificates)
                .unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResolution {
    pub status: ComplianceStatus,
    pub flags: Vec<ComplianceFlag>,
}

impl StatusResolution {
    pub fn has_critical(&self) -> bool {
        self.flags
            .iter()
            .any(|f| f.severity == FlagSeverity::Critical)
    }
}

/// Resolves the tri-state status. Every triggered flag is returned, whichever
/// rule decided the status.
///
/// Rules, first match wins:
/// 1. any critical flag or score < 50 → not compliant
/// 2. any warning flag or score < 70 → needs review
/// 3. otherwise compliant
pub fn resolve_status(score: &ComplianceScore, indicators: &RiskIndicators) -> StatusResolution {
    let mut flags = Vec::new();

    if indicators.risk_tier == Some(RiskTier::Critical) {
        flags.push(ComplianceFlag::critical(
            FlagCode::RiskTierCritical,
            "Candidate risk tier is critical".to_string(),
        ));
    }
    if let Some(consistency) = indicators.background_consistency {
        if consistency < CRITICAL_CONSISTENCY_BELOW {
            flags.push(ComplianceFlag::critical(
                FlagCode::LowBackgroundConsistency,
                format!(
                    "Background consistency score {consistency:.2} is below {CRITICAL_CONSISTENCY_BELOW}"
                ),
            ));
        }
    }
    if let Some(ratio) = indicators.certificate_compliance_ratio {
        if ratio < CRITICAL_CERTIFICATION_RATIO_BELOW {
            flags.push(ComplianceFlag::critical(
                FlagCode::LowCertificationCompliance,
                format!(
                    "Only {:.0}% of required certificates are valid",
                    ratio.clamp(0.0, 1.0) * 100.0
                ),
            ));
        }
    }

    if indicators.risk_tier == Some(RiskTier::High) {
        flags.push(ComplianceFlag::warning(
            FlagCode::RiskTierHigh,
            "Candidate risk tier is high".to_string(),
        ));
    }
    if indicators.rank_anomaly {
        flags.push(ComplianceFlag::warning(
            FlagCode::RankProgressionAnomaly,
            "Rank progression anomaly detected in career history".to_string(),
        ));
    }
    if indicators.missing_or_expired_certificates > MAX_MISSING_OR_EXPIRED_CERTIFICATES {
        flags.push(ComplianceFlag::warning(
            FlagCode::CertificatesMissingOrExpired,
            format!(
                "{} certificates are missing or expired",
                indicators.missing_or_expired_certificates
            ),
        ));
    }

    let has_critical = flags.iter().any(|f| f.severity == FlagSeverity::Critical);
    let has_warning = flags.iter().any(|f| f.severity == FlagSeverity::Warning);

    let status = if has_critical || score.score < NOT_COMPLIANT_BELOW {
        ComplianceStatus::NotCompliant
    } else if has_warning || score.score < NEEDS_REVIEW_BELOW {
        ComplianceStatus::NeedsReview
    } else {
        ComplianceStatus::Compliant
    };

    StatusResolution { status, flags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::score::{
        compute_compliance_score, ComplianceInputs, ComplianceSection,
    };

    fn score_from(consistency: f64, certification_ratio: f64) -> ComplianceScore {
        compute_compliance_score(&ComplianceInputs {
            background_consistency: Some(consistency),
            rank_readiness_ratio: Some(consistency / 100.0),
            certificate_compliance_ratio: Some(certification_ratio),
            ..Default::default()
        })
        .unwrap()
    }

    fn indicators(consistency: f64, ratio: f64) -> RiskIndicators {
        RiskIndicators {
            background_consistency: Some(consistency),
            certificate_compliance_ratio: Some(ratio),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_high_score_is_compliant() {
        let resolution = resolve_status(&score_from(85.0, 0.9), &indicators(85.0, 0.9));
        assert_eq!(resolution.status, ComplianceStatus::Compliant);
        assert!(resolution.flags.is_empty());
    }

    #[test]
    fn test_score_exactly_seventy_is_compliant() {
        let resolution = resolve_status(&score_from(70.0, 0.7), &indicators(70.0, 0.7));
        assert_eq!(resolution.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_score_bands_without_flags() {
        let review = resolve_status(&score_from(60.0, 0.6), &indicators(60.0, 0.6));
        assert_eq!(review.status, ComplianceStatus::NeedsReview);

        let failing = resolve_status(&score_from(40.0, 0.4), &indicators(40.0, 0.4));
        assert_eq!(failing.status, ComplianceStatus::NotCompliant);
        assert!(failing.flags.is_empty());
    }

    #[test]
    fn test_critical_flag_overrides_high_score() {
        let mut risk = indicators(95.0, 0.95);
        risk.risk_tier = Some(RiskTier::Critical);
        let resolution = resolve_status(&score_from(95.0, 0.95), &risk);
        assert_eq!(resolution.status, ComplianceStatus::NotCompliant);
        assert!(resolution.has_critical());
        assert_eq!(resolution.flags[0].code, FlagCode::RiskTierCritical);
    }

    #[test]
    fn test_low_consistency_is_critical() {
        let resolution = resolve_status(&score_from(20.0, 0.9), &indicators(20.0, 0.9));
        assert_eq!(resolution.status, ComplianceStatus::NotCompliant);
        assert_eq!(resolution.flags.len(), 1);
        assert_eq!(resolution.flags[0].code, FlagCode::LowBackgroundConsistency);
        assert_eq!(resolution.flags[0].severity, FlagSeverity::Critical);
    }

    #[test]
    fn test_consistency_just_below_threshold_is_critical() {
        // Rounds to 30.0 in the breakdown but is still below the gate.
        let score = score_from(29.96, 0.95);
        assert_eq!(
            score
                .section(ComplianceSection::BackgroundConsistency)
                .and_then(|s| s.raw_score),
            Some(30.0)
        );
        let resolution = resolve_status(&score, &indicators(29.96, 0.95));
        assert_eq!(resolution.status, ComplianceStatus::NotCompliant);
        assert_eq!(resolution.flags[0].code, FlagCode::LowBackgroundConsistency);
    }

    #[test]
    fn test_low_certification_ratio_is_critical() {
        let resolution = resolve_status(&score_from(90.0, 0.25), &indicators(90.0, 0.25));
        assert!(resolution
            .flags
            .iter()
            .any(|f| f.code == FlagCode::LowCertificationCompliance));
        assert_eq!(resolution.status, ComplianceStatus::NotCompliant);
    }

    #[test]
    fn test_warning_flags_force_review() {
        let risk = RiskIndicators {
            background_consistency: Some(90.0),
            risk_tier: Some(RiskTier::High),
            rank_anomaly: true,
            certificate_compliance_ratio: Some(0.9),
            missing_or_expired_certificates: 3,
        };
        let resolution = resolve_status(&score_from(90.0, 0.9), &risk);
        assert_eq!(resolution.status, ComplianceStatus::NeedsReview);
        let codes: Vec<_> = resolution.flags.iter().map(|f| f.code).collect();
        assert_eq!(
            codes,
            vec![
                FlagCode::RiskTierHigh,
                FlagCode::RankProgressionAnomaly,
                FlagCode::CertificatesMissingOrExpired,
            ]
        );
        assert!(!resolution.has_critical());
    }

    #[test]
    fn test_two_missing_certificates_is_not_a_warning() {
        let mut risk = indicators(90.0, 0.9);
        risk.missing_or_expired_certificates = 2;
        let resolution = resolve_status(&score_from(90.0, 0.9), &risk);
        assert!(resolution.flags.is_empty());
    }

    #[test]
    fn test_all_flags_returned_with_critical_status() {
        let risk = RiskIndicators {
            background_consistency: Some(25.0),
            risk_tier: Some(RiskTier::High),
            rank_anomaly: false,
            certificate_compliance_ratio: Some(0.1),
            missing_or_expired_certificates: 0,
        };
        let resolution = resolve_status(&score_from(25.0, 0.1), &risk);
        assert_eq!(resolution.status, ComplianceStatus::NotCompliant);
        assert_eq!(resolution.flags.len(), 3);
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            ComplianceStatus::Compliant,
            ComplianceStatus::NeedsReview,
            ComplianceStatus::NotCompliant,
        ] {
            assert_eq!(ComplianceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ComplianceStatus::parse("pending"), None);
    }
}
