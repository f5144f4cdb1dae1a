mod report;
mod sentiment;

pub use report::*;
pub use sentiment::*;
