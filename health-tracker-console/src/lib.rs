mod controller;
mod errors;
mod feedback;
mod intro;
mod menu;
mod render;
mod terminal;

pub use controller::Console;
pub use errors::*;
pub use intro::Intro;
pub use menu::Exit;
pub use terminal::{InteractiveTerminal, Terminal};
