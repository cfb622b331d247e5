pub mod comic_service;
pub mod memory_store;
pub mod mongo_store;
pub mod store;
