//! Compliance Score: weighted composite over five independently sourced sections.
//!
//! Missing sections get weight 0 and the remaining base weights are
//! renormalized. Fewer than `MIN_AVAILABLE_SECTIONS` available sections yields
//! no score at all. Downstream code consumes only the `ComplianceScore`
//! breakdown, never the profile inputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contract::TrackingVerificationRow;
use crate::trust::profile::TrustProfile;

pub const MIN_AVAILABLE_SECTIONS: usize = 2;

const STABILITY_INDEX_CAP: f64 = 10.0;
const HALF_SCALE: f64 = 50.0;
/// Neutral value for a stability half whose input is missing.
const NEUTRAL_HALF: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceSection {
    BackgroundConsistency,
    TechnicalReadiness,
    CareerStability,
    CertificationCompliance,
    TrackingVerification,
}

impl ComplianceSection {
    pub const ALL: [ComplianceSection; 5] = [
        ComplianceSection::BackgroundConsistency,
        ComplianceSection::TechnicalReadiness,
        ComplianceSection::CareerStability,
        ComplianceSection::CertificationCompliance,
        ComplianceSection::TrackingVerification,
    ];

    /// Base weights sum to 1.0.
    pub fn base_weight(&self) -> f64 {
        match self {
            ComplianceSection::BackgroundConsistency => 0.30,
            ComplianceSection::TechnicalReadiness => 0.20,
            ComplianceSection::CareerStability => 0.15,
            ComplianceSection::CertificationCompliance => 0.25,
            ComplianceSection::TrackingVerification => 0.10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceSection::BackgroundConsistency => "background_consistency",
            ComplianceSection::TechnicalReadiness => "technical_readiness",
            ComplianceSection::CareerStability => "career_stability",
            ComplianceSection::CertificationCompliance => "certification_compliance",
            ComplianceSection::TrackingVerification => "tracking_verification",
        }
    }
}

/// Raw domain inputs for the five sections, all optional.
#[derive(Debug, Clone, Default)]
pub struct ComplianceInputs {
    pub background_consistency: Option<f64>, // 0–100
    pub rank_readiness_ratio: Option<f64>,   // 0–1
    pub stability_index: Option<f64>,        // 0–10+
    pub risk_score: Option<f64>,             // 0–1
    pub certificate_compliance_ratio: Option<f64>,
    pub tracking_confidences: Vec<f64>, // one per verified contract, 0–1
}

impl ComplianceInputs {
    pub fn from_profile(profile: &TrustProfile, verifications: &[TrackingVerificationRow]) -> Self {
        let stcw = profile.rank_stcw();
        Self {
            background_consistency: profile.background_consistency_score,
            rank_readiness_ratio: stcw.and_then(|d| d.rank_readiness_ratio),
            stability_index: profile.stability_index,
            risk_score: profile.risk_score,
            certificate_compliance_ratio: stcw.and_then(|d| d.certificate_compliance_ratio),
            tracking_confidences: tracking_confidences(verifications),
        }
    }
}

/// Confidence of the latest completed verification per contract.
/// Contracts without a completed, scored verification contribute nothing.
fn tracking_confidences(verifications: &[TrackingVerificationRow]) -> Vec<f64> {
    let mut latest: HashMap<Uuid, &TrackingVerificationRow> = HashMap::new();
    for verification in verifications
        .iter()
        .filter(|v| v.is_completed() && v.confidence.is_some())
    {
        latest
            .entry(verification.contract_id)
            .and_modify(|current| {
                if verification.verified_at > current.verified_at {
                    *current = verification;
                }
            })
            .or_insert(verification);
    }
    latest.values().filter_map(|v| v.confidence).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub section: ComplianceSection,
    pub raw_score: Option<f64>,     // 1 decimal
    pub effective_weight: f64,      // 4 decimals
    pub weighted_contribution: f64, // 2 decimals
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub score: u32, // 0 – 100
    pub sections: Vec<SectionScore>,
    pub available_sections: usize,
}

#[cfg(test)]
impl ComplianceScore {
    pub fn section(&self, section: ComplianceSection) -> Option<&SectionScore> {
        self.sections.iter().find(|s| s.section == section)
    }
}

/// Raw 0–100 score for one section, or `None` when its inputs are missing.
pub fn section_raw_score(section: ComplianceSection, inputs: &ComplianceInputs) -> Option<f64> {
    let raw = match section {
        ComplianceSection::BackgroundConsistency => inputs.background_consistency,
        ComplianceSection::TechnicalReadiness => inputs.rank_readiness_ratio.map(ratio_to_score),
        ComplianceSection::CareerStability => career_stability(inputs),
        ComplianceSection::CertificationCompliance => {
            inputs.certificate_compliance_ratio.map(ratio_to_score)
        }
        ComplianceSection::TrackingVerification => {
            if inputs.tracking_confidences.is_empty() {
                None
            } else {
                let sum: f64 = inputs
                    .tracking_confidences
                    .iter()
                    .map(|c| ratio_to_score(*c))
                    .sum();
                Some(sum / inputs.tracking_confidences.len() as f64)
            }
        }
    };
    raw.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 100.0))
}

fn ratio_to_score(ratio: f64) -> f64 {
    ratio.clamp(0.0, 1.0) * 100.0
}

/// Stability half (0–50) plus risk-complement half (0–50).
/// A missing half counts as its neutral midpoint; both missing means unavailable.
fn career_stability(inputs: &ComplianceInputs) -> Option<f64> {
    let stability_half = inputs
        .stability_index
        .map(|idx| idx.clamp(0.0, STABILITY_INDEX_CAP) / STABILITY_INDEX_CAP * HALF_SCALE);
    let risk_half = inputs
        .risk_score
        .map(|risk| (1.0 - risk.clamp(0.0, 1.0)) * HALF_SCALE);

    match (stability_half, risk_half) {
        (None, None) => None,
        (s, r) => Some(s.unwrap_or(NEUTRAL_HALF) + r.unwrap_or(NEUTRAL_HALF)),
    }
}

/// Computes the composite. Returns `None` below the minimum-data gate.
pub fn compute_compliance_score(inputs: &ComplianceInputs) -> Option<ComplianceScore> {
    let raws: Vec<(ComplianceSection, Option<f64>)> = ComplianceSection::ALL
        .iter()
        .map(|section| (*section, section_raw_score(*section, inputs)))
        .collect();

    let available_sections = raws.iter().filter(|(_, raw)| raw.is_some()).count();
    if available_sections < MIN_AVAILABLE_SECTIONS {
        return None;
    }

    let available_weight: f64 = raws
        .iter()
        .filter(|(_, raw)| raw.is_some())
        .map(|(section, _)| section.base_weight())
        .sum();

    let mut composite = 0.0;
    let sections = raws
        .into_iter()
        .map(|(section, raw)| match raw {
            Some(raw) => {
                let weight = section.base_weight() / available_weight;
                let contribution = raw * weight;
                composite += contribution;
                SectionScore {
                    section,
                    raw_score: Some(round_to(raw, 1)),
                    effective_weight: round_to(weight, 4),
                    weighted_contribution: round_to(contribution, 2),
                    available: true,
                }
            }
            None => SectionScore {
                section,
                raw_score: None,
                effective_weight: 0.0,
                weighted_contribution: 0.0,
                available: false,
            },
        })
        .collect();

    Some(ComplianceScore {
        score: composite.clamp(0.0, 100.0).round() as u32,
        sections,
        available_sections,
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
