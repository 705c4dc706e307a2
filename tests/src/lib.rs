//! Cross-crate integration tests for the mock gateway: full HTTP round
//! trips through the assembled router, and process-level startup checks.

#[cfg(test)]
mod integrate_test;
#[cfg(test)]
mod system_tests;
