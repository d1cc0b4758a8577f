//! # Taste Match Store
//!
//! Persistence layer and service operations for the taste-match
//! engine:
//! - SQLite schema bootstrap (users, profiles, referral edges)
//! - Row access for users, profiles, and the referral ledger
//! - The four logical operations consumed by transport layers

pub mod db;
pub mod models;
pub mod service;

pub use models::{ReferralEdge, TasteProfile, TasteUser, UnlockStatus};
pub use service::{
    create_or_get_user, get_profile, get_referral_status, get_user, submit_quiz, ReferralStatus,
    UNLOCK_THRESHOLD,
};
