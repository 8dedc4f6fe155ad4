// Report post-processing: data model, compliance filter, law table, marker layout.
// Everything here is synchronous and makes no network calls.

pub mod handlers;
pub mod laws;
pub mod markers;
pub mod model;
pub mod normalize;

pub use model::AnalysisResult;
pub use normalize::{normalize, normalize_value};
