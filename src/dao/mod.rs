/// Session record storage and subscription operations.
pub mod models;
/// Session store backends and the trait they implement.
pub mod session_store;
/// Storage abstraction layer shared by every backend.
pub mod storage;
