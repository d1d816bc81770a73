//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own account and token logic so route handlers can stay
//! focused on wire-format translation for each API variant.

pub mod accounts;
pub mod token;
