pub mod pet;
pub mod storage_object;
pub mod user;
pub mod webhook_log;
