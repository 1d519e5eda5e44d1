//! Shared test utilities for the workspace browser
//!
//! - Deterministic ids and backend timestamps
//! - Backend payload builders and a mock-backed coordinator

#![allow(dead_code)]

pub mod fixtures;
