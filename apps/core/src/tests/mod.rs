//! Test Module
//!
//! Cross-module test suite for the routing engine.
//!
//! ## Test Categories
//! - `router_tests`: full decision-pipeline behavior with mock collaborators
//! - `client_tests`: HTTP backend clients against wiremock servers
//!
//! Unit tests for the normalizer, brand matcher, classifier, catalog,
//! feedback machine and composer live next to their modules.

pub mod client_tests;
