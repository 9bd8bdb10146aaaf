pub mod error;
pub mod scorer;
pub mod session;
pub mod signals;
pub mod store;

pub use error::*;
pub use scorer::*;
pub use session::*;
pub use signals::*;
pub use store::*;
