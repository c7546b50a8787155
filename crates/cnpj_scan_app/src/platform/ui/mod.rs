pub mod charts;
pub mod render;
pub mod terminal;
