pub mod attachment;
pub mod auth;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod inspection;
pub mod inspector;
pub mod log;
pub mod pmi;
pub mod response;
pub mod seed;
