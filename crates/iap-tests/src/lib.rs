//! Integration tests for the accessory protocol roles
//!
//! These tests wire a [`RemoteClient`](iap_remote::RemoteClient) to an
//! [`IpodEmulator`](iap_emulator::IpodEmulator) over a linked
//! [`MockTransport`](iap_core::MockTransport) pair, so every exchange goes
//! through both the dispatcher and the reply correlation.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p iap-tests
//! RUST_LOG=debug cargo test -p iap-tests -- --nocapture
//! ```
//!
//! # Test Structure
//!
//! - `e2e_test.rs` - Command exchanges between both roles
//! - `poll_test.rs` - Elapsed-time broadcasts and their interaction with waits

// This crate only contains tests, no library code
