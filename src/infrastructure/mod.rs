pub mod ai;
pub mod media;
pub mod storage;
