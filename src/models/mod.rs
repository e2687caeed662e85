pub mod daily_log;
pub mod revision;
pub mod user_config;
