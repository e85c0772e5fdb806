use crate::models::{Profile, Requirements, ScoreResult, ScoringWeights};

pub const REASON_GPA_MISSING: &str = "GPA көрсетілмеген, баға дәлдігі төмен";
pub const REASON_GPA_BELOW: &str = "GPA талаптан төмен";
pub const REASON_LANGUAGE_MISSING: &str = "Тіл сертификаты жоқ (IELTS/TOEFL)";
pub const REASON_IELTS_BELOW: &str = "IELTS талаптан төмен";
pub const REASON_TOEFL_BELOW: &str = "TOEFL талаптан төмен";
pub const REASON_SAT_MISSING: &str = "SAT көрсетілмеген (кей универге міндетті)";
pub const REASON_SAT_BELOW: &str = "SAT талаптан төмен";

const IELTS_MAX: f64 = 9.0;
const TOEFL_MAX: f64 = 120.0;
const SAT_MAX: f64 = 1600.0;

/// Points earned on one axis plus the reasons it produced
#[derive(Debug, Clone, PartialEq)]
struct Axis {
    points: f64,
    reasons: Vec<&'static str>,
}

impl Axis {
    fn missing(reason: &'static str) -> Self {
        Self {
            points: 0.0,
            reasons: vec![reason],
        }
    }

    fn earned(weight: f64, normalized: f64) -> Self {
        Self {
            points: (weight * clamp_unit(normalized)).round(),
            reasons: Vec::new(),
        }
    }

    // Threshold misses explain the score but never change it
    fn advise(mut self, below_floor: bool, reason: &'static str) -> Self {
        if below_floor {
            self.reasons.push(reason);
        }
        self
    }
}

/// Score an applicant against a program's requirements
///
/// Scoring model (points out of 100):
///   academic  = round(weights.academic * gpa / gpa_scale)
///   language  = round(weights.language * ielts / 9), or toefl / 120 without IELTS
///   test      = round(weights.test * sat / 1600)
///   remaining weight is reserved and scores 0
///
/// Reasons come out in axis order; on each axis a missing-data reason
/// comes before any threshold miss.
pub fn calculate_fit_score(
    profile: &Profile,
    requirements: &Requirements,
    weights: &ScoringWeights,
) -> ScoreResult {
    let axes = [
        academic_axis(profile, requirements, weights.academic),
        language_axis(profile, requirements, weights.language),
        test_axis(profile, requirements, weights.test),
    ];

    let total: f64 = axes.iter().map(|a| a.points).sum();
    let score = total.round().clamp(0.0, ScoringWeights::MAX_TOTAL) as u8;

    let reasons = axes
        .iter()
        .flat_map(|a| a.reasons.iter().map(|r| r.to_string()))
        .collect();

    ScoreResult { score, reasons }
}

/// Academic axis: GPA relative to its own scale
///
/// A non-positive scale earns nothing, but the floor is still checked
/// whenever both GPA and scale were given.
fn academic_axis(profile: &Profile, requirements: &Requirements, weight: f64) -> Axis {
    match (profile.gpa, profile.gpa_scale) {
        (Some(gpa), Some(scale)) => {
            let below = requirements.min_gpa.is_some_and(|min| gpa < min);
            let axis = if scale > 0.0 {
                Axis::earned(weight, gpa / scale)
            } else {
                Axis::missing(REASON_GPA_MISSING)
            };
            axis.advise(below, REASON_GPA_BELOW)
        }
        _ => Axis::missing(REASON_GPA_MISSING),
    }
}

/// Language axis: IELTS wins when both certificates are present
fn language_axis(profile: &Profile, requirements: &Requirements, weight: f64) -> Axis {
    if let Some(ielts) = profile.ielts {
        let below = requirements.min_ielts.is_some_and(|min| ielts < min);
        Axis::earned(weight, ielts / IELTS_MAX).advise(below, REASON_IELTS_BELOW)
    } else if let Some(toefl) = profile.toefl {
        let below = requirements.min_toefl.is_some_and(|min| toefl < min);
        Axis::earned(weight, f64::from(toefl) / TOEFL_MAX).advise(below, REASON_TOEFL_BELOW)
    } else {
        Axis::missing(REASON_LANGUAGE_MISSING)
    }
}

fn test_axis(profile: &Profile, requirements: &Requirements, weight: f64) -> Axis {
    match profile.sat {
        Some(sat) => {
            let below = requirements.min_sat.is_some_and(|min| sat < min);
            Axis::earned(weight, f64::from(sat) / SAT_MAX).advise(below, REASON_SAT_BELOW)
        }
        None => Axis::missing(REASON_SAT_MISSING),
    }
}

#[inline]
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Fit scorer holding the configured axis weights
#[derive(Debug, Clone, Copy)]
pub struct FitScorer {
    weights: ScoringWeights,
}

impl FitScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, profile: &Profile, requirements: &Requirements) -> ScoreResult {
        calculate_fit_score(profile, requirements, &self.weights)
    }
}

impl Default for FitScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
