//! Handler integration tests

pub mod commands_test;
pub mod dispatcher_test;
