pub mod client;
pub mod oauth;
pub mod slots;
pub mod token_manager;
