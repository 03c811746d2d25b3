// Data models for keypoint samples, gesture events, and pairing

pub mod event;
pub mod pairing;
pub mod sample;
