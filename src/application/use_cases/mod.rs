pub mod analysis;
pub mod library;
pub mod profile;
pub mod prompts;
pub mod response_parser;
pub mod sampler;
pub mod upload;
