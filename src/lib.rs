pub mod convergence;
pub mod csma;
pub mod error;
pub mod metrics;
pub mod queue;
pub mod rv;
pub mod scenario;
pub mod sim;
pub mod study;

pub use error::{Result, SimError};

#[cfg(test)]
mod test;
