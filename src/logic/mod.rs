pub mod classifier;
pub mod engine;
pub mod map;
pub mod readings;
pub mod session;

pub use session::Session;
