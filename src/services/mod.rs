pub mod selector_service;
pub mod session_store;
pub mod table_service;
