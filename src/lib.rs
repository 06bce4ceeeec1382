// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// tests can drive `mathdr::session::machine::SessionMachine` directly.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod engine;
pub mod generator;
pub mod session;
pub mod settings;
pub mod store;
pub mod subject;

// Private: only the binary's screens use these.
mod app;
mod config;
mod event;
mod ui;
