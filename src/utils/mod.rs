// src/utils/mod.rs

pub mod hash;
pub mod markdown;
pub mod validate;
