pub mod album;
pub mod client;
mod consts;
pub mod publisher;
pub mod search;
pub mod settings;
pub mod store;
