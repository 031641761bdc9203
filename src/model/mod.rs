pub mod device;
pub mod incident;
pub mod notification;
pub mod security_log;
pub mod seller;
pub mod session;
pub mod toast;
pub mod website;
