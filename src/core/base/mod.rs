pub mod error;
pub mod interface;

pub use self::error::*;
pub use self::interface::*;
