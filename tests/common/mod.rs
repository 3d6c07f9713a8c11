//! Shared test utilities for kunj integration tests
//!
//! Every test runs against a throwaway git repository and a throwaway home directory,
//! so global configuration never leaks between tests or from the developer's machine.

pub mod assertions;
pub mod fixtures;
pub mod repository;
