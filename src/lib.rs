pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod db;
pub mod metrics;
pub mod model;
pub mod notifications;
pub mod registry;
pub mod scheduler;
pub mod security_log;
pub mod session;
pub mod state;
pub mod storage;
