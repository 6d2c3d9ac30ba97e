//! Internal test modules - whitebox tests with crate access
//!
//! Scenario tests that drive the whole stack (feed parsing, registry,
//! adapter, recycler, TUI) through the test harness or crate internals.
