pub mod activity_log;
pub mod token_counter;
