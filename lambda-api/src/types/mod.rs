mod format;
pub use format::*;

mod misc;
pub use misc::*;
