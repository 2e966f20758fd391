pub mod cell;
pub mod cell_sink;
pub mod listener;
pub mod node;
pub mod sodium_ctx;
pub mod stream;
pub mod stream_sink;
