
mod client;
mod pets;
mod storage;
mod webhook;
