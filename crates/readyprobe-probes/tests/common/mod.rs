//! Shared test utilities for readyprobe-probes integration tests
#![allow(dead_code)]

pub mod fakes;
pub mod mock_server;

pub use fakes::*;
pub use mock_server::*;

use std::time::Duration;

/// Short delay so wiremock-backed polls stay fast
pub const TEST_DELAY: Duration = Duration::from_millis(10);

pub const LOGIN_URL: &str = "https://practice.expandtesting.com/login";
pub const REGISTER_URL: &str = "https://practice.expandtesting.com/register";
