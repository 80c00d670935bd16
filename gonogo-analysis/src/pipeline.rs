use gonogo_core::{SessionProfile, TrialResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::norms::{AgeBracket, NormTable, Rating};
use crate::stats::{FiveNumberSummary, Quartiles, sort_ascending};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("anticipatory threshold {0} ms must be non-negative")]
    AnticipatoryThreshold(f64),

    #[error("outlier multiplier {0} must be positive")]
    OutlierMultiplier(f64),

    #[error("age cutoffs must be non-empty, start at age 0 and ascend")]
    AgeCutoffs,

    #[error("norm table contains a non-positive standard deviation")]
    NormSd,
}

/// Upper reaction-time limit applying from `min_age` upwards.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeCutoff {
    pub min_age: u32,
    pub cutoff_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationParams {
    pub anticipatory_threshold_ms: f64,
    pub outlier_iqr_multiplier: f64,
    pub age_cutoffs: Vec<AgeCutoff>,
    pub norms: NormTable,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self {
            anticipatory_threshold_ms: 120.0,
            outlier_iqr_multiplier: 3.0,
            age_cutoffs: vec![
                AgeCutoff { min_age: 0, cutoff_ms: 1200.0 },
                AgeCutoff { min_age: 50, cutoff_ms: 1500.0 },
                AgeCutoff { min_age: 70, cutoff_ms: 1800.0 },
            ],
            norms: NormTable::default(),
        }
    }
}

impl EvaluationParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.anticipatory_threshold_ms >= 0.0) {
            return Err(ParamsError::AnticipatoryThreshold(self.anticipatory_threshold_ms));
        }
        if !(self.outlier_iqr_multiplier > 0.0) {
            return Err(ParamsError::OutlierMultiplier(self.outlier_iqr_multiplier));
        }
        let starts_at_zero = self.age_cutoffs.first().is_some_and(|c| c.min_age == 0);
        let ascending = self
            .age_cutoffs
            .windows(2)
            .all(|w| w[0].min_age < w[1].min_age);
        if !starts_at_zero || !ascending {
            return Err(ParamsError::AgeCutoffs);
        }
        if self.norms.norms().any(|n| !(n.sd > 0.0)) {
            return Err(ParamsError::NormSd);
        }
        Ok(())
    }

    /// Reaction times at or above this value are discarded for `age`.
    pub fn cutoff_for_age(&self, age: u32) -> f64 {
        self.age_cutoffs
            .iter()
            .rev()
            .find(|c| c.min_age <= age)
            .map_or(f64::INFINITY, |c| c.cutoff_ms)
    }
}

/// How many reaction times each stage kept or removed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    pub eligible: usize,
    pub anticipatory: usize,
    pub over_cutoff: usize,
    pub outliers: usize,
    pub kept: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub filtered_median_ms: f64,
    pub q1_ms: f64,
    pub q3_ms: f64,
    pub rating: Rating,
    pub group_mean_ms: f64,
    pub group_sd_ms: f64,
    pub diff_ms: f64,
    pub z_score: f64,
    pub bracket: AgeBracket,
    pub cutoff_ms: f64,
    pub counts: FilterCounts,
    pub distribution: Option<FiveNumberSummary>,
}

/// Outcome of the reaction-time pipeline. Running out of usable trials is a
/// normal outcome and is kept apart from any numeric score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Scored(EvaluationSummary),
    InsufficientData(FilterCounts),
}

impl Evaluation {
    pub fn summary(&self) -> Option<&EvaluationSummary> {
        match self {
            Self::Scored(s) => Some(s),
            Self::InsufficientData(_) => None,
        }
    }

    pub fn counts(&self) -> &FilterCounts {
        match self {
            Self::Scored(s) => &s.counts,
            Self::InsufficientData(c) => c,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    params: EvaluationParams,
}

impl Evaluator {
    pub fn new(params: EvaluationParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &EvaluationParams {
        &self.params
    }

    /// Filters reaction times, computes quartiles and rates the filtered
    /// median against the profile's reference group. Pure: the same inputs
    /// always give the same evaluation.
    pub fn evaluate(&self, results: &[TrialResult], profile: &SessionProfile) -> Evaluation {
        let p = &self.params;
        let mut counts = FilterCounts::default();

        let mut rts: Vec<f64> = results
            .iter()
            .filter(|r| r.category.is_go() && r.is_press())
            .filter_map(|r| r.reaction_time_ms)
            .collect();
        counts.eligible = rts.len();

        rts.retain(|&rt| rt >= p.anticipatory_threshold_ms);
        counts.anticipatory = counts.eligible - rts.len();

        let cutoff_ms = p.cutoff_for_age(profile.age());
        let before = rts.len();
        rts.retain(|&rt| rt < cutoff_ms);
        counts.over_cutoff = before - rts.len();

        sort_ascending(&mut rts);
        let Some(initial) = Quartiles::from_sorted(&rts) else {
            debug!(?counts, "no reaction times survived range filtering");
            return Evaluation::InsufficientData(counts);
        };

        let (lo, hi) = initial.fence(p.outlier_iqr_multiplier);
        let before = rts.len();
        rts.retain(|&rt| (lo..=hi).contains(&rt));
        counts.outliers = before - rts.len();
        counts.kept = rts.len();

        let Some(q) = Quartiles::from_sorted(&rts) else {
            debug!(?counts, "no reaction times survived outlier removal");
            return Evaluation::InsufficientData(counts);
        };

        let bracket = AgeBracket::for_age(profile.age());
        let norm = p.norms.lookup(profile.sex(), bracket);
        let z_score = (q.median - norm.mean) / norm.sd;
        let rating = Rating::from_z(z_score);
        debug!(
            ?counts,
            median_ms = q.median,
            %bracket,
            z_score,
            %rating,
            "reaction times evaluated"
        );

        Evaluation::Scored(EvaluationSummary {
            filtered_median_ms: q.median,
            q1_ms: q.q1,
            q3_ms: q.q3,
            rating,
            group_mean_ms: norm.mean,
            group_sd_ms: norm.sd,
            diff_ms: q.median - norm.mean,
            z_score,
            bracket,
            cutoff_ms,
            counts,
            distribution: FiveNumberSummary::from_sorted(&rts),
        })
    }
}

/// [`Evaluator::evaluate`] with the default parameters.
pub fn evaluate(results: &[TrialResult], profile: &SessionProfile) -> Evaluation {
    Evaluator::default().evaluate(results, profile)
}
