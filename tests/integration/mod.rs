//! Integration tests for storeguard
//!
//! These tests verify the interaction between multiple filters and the
//! stores and transports they run against, without mocking internals.

pub mod defense_pipeline_tests;
pub mod ratelimit_flow_tests;
pub mod recovery_flow_tests;
pub mod upload_flow_tests;
