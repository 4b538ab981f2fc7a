//! Daybook library
//!
//! This library exposes the diary core used by the `daybook` binary so it
//! can be driven from tests and other front ends.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod platform;
pub mod services;
pub mod storage;
pub mod theme;
