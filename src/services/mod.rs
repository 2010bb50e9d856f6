//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the gateway, comparison, and playground logic so
//! route handlers can stay focused on protocol translation.

pub mod compare;
pub mod gateway;
pub mod playground;
