pub mod entities;
pub mod tracker_storage;
