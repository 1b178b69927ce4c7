pub mod evaluation;
pub mod map;
pub mod zones;

pub use evaluation::EvaluationScreen;
pub use map::MapScreen;
pub use zones::ZonesScreen;
