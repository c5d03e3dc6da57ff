pub mod analysis;
pub mod document;
pub mod error;
pub mod identity;
pub mod llm_config;
pub mod profile;
pub mod resource;
