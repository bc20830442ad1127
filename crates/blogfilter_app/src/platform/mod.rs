pub mod effects;
pub mod html;
pub mod logging;
pub mod persistence;
