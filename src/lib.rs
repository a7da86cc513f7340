//! corscan - multi-threaded CORS misconfiguration scanner
//!
//! Sends each target a series of requests with crafted `Origin` headers and
//! records the CORS headers the server answers with, so permissive or
//! bypassable origin validation can be spotted.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod random;
pub mod report;
pub mod scanner;
pub mod targets;
