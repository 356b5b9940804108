//! Common test utilities for integration tests.
//!
//! - [`http_mock::MockHttpServer`] - Stub the external catalogs, roster and
//!   follower API with `wiremock`
//! - [`fixtures`] - Minimal raw documents in each source's layout

#![allow(dead_code)]

pub mod fixtures;
pub mod http_mock;
