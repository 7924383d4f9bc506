pub mod dialog;
pub mod list;
