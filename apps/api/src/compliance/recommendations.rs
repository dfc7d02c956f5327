use serde::{Deserialize, Serialize};

use crate::compliance::score::{ComplianceScore, ComplianceSection};

pub const MAX_RECOMMENDATIONS: usize = 5;
/// Sections at or above this raw score need no remediation.
const REMEDIATION_BELOW: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: u8, // 1 (urgent) – 3
    pub section: ComplianceSection,
    pub recommendation: String,
    pub action: String,
}

/// Fixed recommendation/action text per section.
fn section_guidance(section: ComplianceSection) -> (&'static str, &'static str) {
    match section {
        ComplianceSection::BackgroundConsistency => (
            "Employment history shows inconsistencies across sources",
            "Request seaman's book pages and employer references for the flagged contracts",
        ),
        ComplianceSection::TechnicalReadiness => (
            "Experience does not yet support the target rank",
            "Review rank-specific sea time and endorsements before promotion or placement",
        ),
        ComplianceSection::CareerStability => (
            "Career history shows frequent short contracts or elevated risk",
            "Interview the candidate about contract terminations and gaps between assignments",
        ),
        ComplianceSection::CertificationCompliance => (
            "Required STCW certificates are missing or expired",
            "Collect renewed certificates and verify them with the issuing administration",
        ),
        ComplianceSection::TrackingVerification => (
            "Vessel tracking confirms only part of the declared service",
            "Upload sign-on/sign-off documents for contracts with low tracking confidence",
        ),
    }
}

fn priority_for(section: ComplianceSection, raw: f64) -> u8 {
    let priority = if raw < 30.0 {
        1
    } else if raw < 50.0 {
        2
    } else {
        3
    };
    // Tracking is advisory, never urgent.
    if section == ComplianceSection::TrackingVerification {
        priority.max(2)
    } else {
        priority
    }
}

/// Builds up to `MAX_RECOMMENDATIONS` remediation items, weakest sections
/// first, then ordered by priority (stable on ties).
pub fn build_recommendations(score: &ComplianceScore) -> Vec<Recommendation> {
    let mut weak: Vec<(ComplianceSection, f64)> = score
        .sections
        .iter()
        .filter(|s| s.available)
        .filter_map(|s| s.raw_score.map(|raw| (s.section, raw)))
        .filter(|(_, raw)| *raw < REMEDIATION_BELOW)
        .collect();
    weak.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut recommendations: Vec<Recommendation> = weak
        .into_iter()
        .map(|(section, raw)| {
            let (recommendation, action) = section_guidance(section);
            Recommendation {
                priority: priority_for(section, raw),
                section,
                recommendation: recommendation.to_string(),
                action: action.to_string(),
            }
        })
        .take(MAX_RECOMMENDATIONS)
        .collect();

    recommendations.sort_by_key(|r| r.priority);
    recommendations
}
