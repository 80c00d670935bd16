//! Post-session scoring: reaction-time filtering, quartiles and a
//! demographic rating, plus the unfiltered accuracy figures.

pub mod norms;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use norms::{AgeBracket, Norm, NormTable, Rating};
pub use pipeline::{
    AgeCutoff, Evaluation, EvaluationParams, EvaluationSummary, Evaluator, FilterCounts,
    ParamsError, evaluate,
};
pub use report::{SessionReport, accuracy, inhibition_rate};
pub use stats::{FiveNumberSummary, Quartiles};
