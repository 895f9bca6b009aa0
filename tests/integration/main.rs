//! Integration tests for the fetch layer and the mirror facade
//!
//! These tests use wiremock to stand in for a catalog mirror. The library
//! is blocking, so every client is built, used and dropped inside
//! `spawn_blocking`.

mod fetch_tests;
mod mirror_tests;
