pub mod assets;
pub mod auth;
pub mod config;
pub mod invest;
pub mod payments;
pub mod spending;
