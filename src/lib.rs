//! `LedgerEdge` - a customer ledger service with AI-assisted insights
//!
//! Customers and their financial records (invoices, payments, refunds, credits)
//! live in `SQLite` through `SeaORM`. An HTTP API exposes CRUD, a filter/sort view,
//! balance statistics, and two AI operations (summary and key-record highlights)
//! that degrade to fixed fallbacks whenever the text-generation service fails.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    // Documentation - missing docs should be added gradually
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// HTTP JSON API - router, handlers, and error mapping
pub mod api;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - record queries, aggregation, view, and reconciliation
pub mod core;
/// `SeaORM` entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Text-generation gateway for summaries and highlights
pub mod gateway;
/// Input and transport types shared across layers
pub mod models;
/// Orchestration layer - validation, sign convention, and fallbacks
pub mod service;
/// Storage trait with `SQLite` and in-memory implementations
pub mod store;

#[cfg(test)]
pub mod test_utils;
