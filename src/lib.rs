//! Shukalafiya — bilingual (Hausa/English) plant disease diagnosis service.
//!
//! A user uploads a plant photo; the service forwards it to a vision-capable
//! language model and returns a normalized bilingual diagnosis with a
//! confidence score and recommendations, then answers follow-up questions
//! grounded in that diagnosis.

pub mod api;
pub mod config;
pub mod conversation;
pub mod models;
pub mod store;
pub mod upstream;
pub mod vision;
