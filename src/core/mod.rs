/// Capability traits and the error taxonomy.
pub mod base;
// admission breaker
pub mod circuitbreaker;
// retry collaborator
pub mod retry;
// rolling-window statistic structures
pub mod stat;

pub use self::base::*;
pub use self::circuitbreaker::*;
pub use self::retry::*;
pub use self::stat::*;
