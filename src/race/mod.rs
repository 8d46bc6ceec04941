// Public API
pub use scoring::score_typed;
pub use text::{PassageTextSupplier, PetnameTextSupplier, TextSupplier, TextSupplyError};

// Internal modules
mod scoring;
mod text;
