mod notices;
mod session;

pub use notices::*;
pub use session::*;
