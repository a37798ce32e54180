pub mod analysis;
pub mod color;
pub mod config;
pub mod consts;
pub mod error;
pub mod features;
pub mod filters;
pub mod frame;
pub mod io;
pub mod prompt;
pub mod provider;
