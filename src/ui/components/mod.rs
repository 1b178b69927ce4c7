pub mod input;
pub mod status;

pub use input::{CheckListWidget, InputWidget, SelectWidget};
pub use status::{NavBar, StatusLine};
