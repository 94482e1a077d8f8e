//! API handlers module

pub mod health;
pub mod chat;
pub mod navigation;
pub mod risk;
pub mod multimodal;
