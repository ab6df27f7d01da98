pub mod auth;
pub mod cli;
pub mod clients;
pub mod config;
pub mod events;
pub mod models;
pub mod runtime;
pub mod schedule;
pub mod tasks;
