pub mod ai;
pub mod chat;
pub mod http;
