pub mod command;
pub mod renderer;
pub mod resource;
pub mod runtime;
pub mod theme;
pub mod widgets;

pub use command::Command;
pub use resource::Resource;
pub use runtime::{DialogRuntime, Focus};
pub use theme::Theme;
