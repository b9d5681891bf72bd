pub mod alert;
pub mod indicator;
pub mod risk_score;
pub mod snapshot;

pub use alert::*;
pub use indicator::*;
pub use risk_score::*;
pub use snapshot::*;
