mod concurrent;
mod interface;
mod sequential;

pub use concurrent::*;
pub use interface::*;
pub use sequential::*;
