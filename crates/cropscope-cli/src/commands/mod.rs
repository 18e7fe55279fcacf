pub mod config;
pub mod crop;
pub mod info;
pub mod select;
pub mod session;
