//! # Brain Module
//!
//! Fast, local analysis that runs before any network call.
//! Decides which signals (brand mention, intent tag, website wording) the
//! router can rely on for the current turn.
//!
//! ## Components
//! - `normalize`: text canonicalization for slug/substring matching
//! - `brands`: brand registry and brand-mention detection
//! - `intent`: bag-of-words intent classification with softmax confidence

pub mod brands;
pub mod intent;
pub mod normalize;

pub use brands::{is_website_intent, Brand, BrandRegistry};
pub use intent::{BagOfWordsModel, IntentModel};
pub use normalize::normalize;
