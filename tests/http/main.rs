//! HTTP endpoint integration tests.
//!
//! Starts an axum server backed by an in-memory catalog and drives a
//! browser against it through reqwest.

#![cfg(feature = "http")]

mod endpoint;
