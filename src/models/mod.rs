// src/models/mod.rs

pub mod allowed_user;
pub mod result;
pub mod settings;
pub mod species;
