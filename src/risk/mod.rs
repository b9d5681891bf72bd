// Scoring engine: rolling history, normalization, scenario rules and the
// composite scorer that ties them together

pub mod errors;
pub mod history;
pub mod normalizer;
pub mod scenarios;
pub mod scorer;
pub mod signals;

// Re-export main types
pub use errors::*;
pub use history::*;
pub use normalizer::*;
pub use scenarios::*;
pub use scorer::*;
pub use signals::*;

// Score bounds
pub const MAX_RISK_SCORE: f64 = 1.0;
pub const MIN_RISK_SCORE: f64 = 0.0;
