pub mod bucket;
pub mod ring;
pub mod window;

pub use self::bucket::*;
pub use self::ring::*;
pub use self::window::*;
