mod corpus;
mod loader;
mod sampler;

pub use corpus::*;
pub use loader::*;
pub use sampler::*;

/// Column holding the review text when none is configured.
pub const DEFAULT_TEXT_COLUMN: &str = "text";
