pub mod adaptive;
pub mod callback;
pub mod config;

pub use self::adaptive::*;
pub use self::callback::*;
pub use self::config::*;
