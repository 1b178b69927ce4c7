pub mod crop_rule;
pub mod evaluation;
pub mod zone;

pub use crop_rule::*;
pub use evaluation::*;
pub use zone::*;
