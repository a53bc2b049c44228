pub mod aggregate;
pub mod normalize;
pub mod scale;
pub mod solver;

pub use aggregate::{
    enrolled_credits, program_average, semester_average, subject_score, subject_score_text,
    CreditAverage, SubjectScore, INVALID_WEIGHTS,
};
pub use normalize::{normalize, normalize_weight};
pub use scale::ScoreScale;
pub use solver::{required_scores, RequiredScores};
