//! Multi-turn scenario tests
