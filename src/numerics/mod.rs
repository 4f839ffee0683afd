pub mod root_finding;

pub use root_finding::{brent, RootError};
