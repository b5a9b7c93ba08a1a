//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic, chain orchestration and persistence
//! so route handlers can stay focused on request/response translation.

pub mod deploy;
pub mod draft;
pub mod proposal;
pub mod space;
pub mod vault;
