pub mod auth;
pub mod function;
pub mod pet;
pub mod storage;
pub mod webhook_log;
