//! A Sodium-style reactive engine built around one operator: the stream of
//! distinct changes of a cell (`Cell::changes`).

mod impl_;

mod cell;
mod cell_sink;
mod changes;
mod error;
mod listener;
mod operational;
mod sodium_ctx;
mod stream;
mod stream_sink;

pub use crate::cell::Cell;
pub use crate::cell_sink::CellSink;
pub use crate::changes::{changes_of, Change};
pub use crate::error::SodiumError;
pub use crate::listener::Listener;
pub use crate::operational::Operational;
pub use crate::sodium_ctx::SodiumCtx;
pub use crate::stream::Stream;
pub use crate::stream_sink::StreamSink;

#[cfg(test)]
mod tests;
