//! CLI integration test harness.

mod common;

mod doctor_tests;
mod provision_tests;
