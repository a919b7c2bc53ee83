//! Masterclass ONM domain logic.
//!
//! Pure types and computations shared by the database, delivery and HTTP
//! layers. Nothing in this crate performs I/O.

pub mod activity;
pub mod badge;
pub mod contact;
pub mod email_template;
pub mod error;
pub mod export;
pub mod filtering;
pub mod formation;
pub mod gamification;
pub mod notification;
pub mod referral;
pub mod roles;
pub mod satisfaction;
pub mod search;
pub mod timeline;
pub mod types;
