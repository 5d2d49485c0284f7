pub mod area;
pub mod auth;
pub mod backup;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod image;
pub mod init;
pub mod inspection;
pub mod inspector;
pub mod log;
pub mod pmi;
pub mod response;
pub mod seed;
pub mod serve;
pub mod signature;
