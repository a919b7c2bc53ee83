//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - For admin lists, a page-local filter built from `masterclass_core::filtering`

pub mod activity_log;
pub mod badge;
pub mod contact;
pub mod content;
pub mod email;
pub mod formation;
pub mod milestone;
pub mod notification;
pub mod points;
pub mod referral;
pub mod satisfaction;
pub mod session;
pub mod timeline;
pub mod user;
