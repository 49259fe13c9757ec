pub mod error;
pub mod display;
pub mod fallback;
pub mod options;
pub mod store;
mod counter;
mod utils;

pub use counter::{Health, VisitCounter, VisitResult};
pub use options::{Environment, Options, Seed, Strategy};
pub use store::Source;
