pub mod chat_request;
pub mod chat_service;
pub mod config;
pub mod constants;
pub mod controller;
pub mod credentials;
pub mod message;
pub mod mode;
pub mod models;
pub mod persistence;
pub mod transcript;
