pub mod measure;

pub use measure::*;
