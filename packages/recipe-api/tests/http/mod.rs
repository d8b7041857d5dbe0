//! HTTP integration tests.
//!
//! Each test starts a server on a free local port, drives it over a
//! real TCP connection and stops it again.

mod helpers;
mod lifecycle_tests;
