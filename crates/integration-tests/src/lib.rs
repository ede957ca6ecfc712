//! End-to-end tests for the proxy; see `tests/`
