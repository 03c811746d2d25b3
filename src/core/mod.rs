pub mod config;
pub mod demux;
pub mod geometry;
pub mod gesture;
pub mod pairing_store;
pub mod pipeline;
pub mod pointer;
pub mod shape;
pub mod stream;
pub mod transport;
