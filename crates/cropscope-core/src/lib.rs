pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod io;
pub mod render;
pub mod selection;
pub mod selector;
pub mod source;
pub mod submit;
