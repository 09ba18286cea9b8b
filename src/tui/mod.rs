pub mod input;
pub mod view;

pub use input::poll_input;
pub use view::{ViewState, render};
