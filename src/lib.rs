pub mod auth;
pub mod core;
pub mod daemon;
pub mod http;
pub mod provider;
pub mod util;
