//! Test helpers module
//!
//! This module provides utilities and helpers for testing EventDesk.
//! It includes the Ollama mock server, recording collaborators, fixtures and
//! test context setup.

#![allow(dead_code)]

pub mod ollama_mock;
pub mod recording;
pub mod test_context;
pub mod test_data;

pub use ollama_mock::*;
pub use recording::*;
pub use test_context::*;
pub use test_data::*;
