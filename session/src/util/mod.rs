//! Helpers shared by the session context and its front ends.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules keep navigation, token inspection, and input rules out of
//! the context itself so each can be tested in isolation.

pub mod guard;
pub mod jwt;
pub mod navigate;
pub mod validation;
