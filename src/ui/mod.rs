/// Rendering layer: everything here only reads [`crate::state::AppState`]
/// or calls its mutators; no aggregation happens in the UI.
pub mod kpi;
pub mod panels;
pub mod plot;
