pub mod config;
pub mod download;
pub mod http_client;
pub mod logger;
pub mod multipart;
pub mod output;
