//! Internal buffering of bytes read but not yet split off.
//!
//! It is an implementation detail and not part of the public API.

mod pending;

pub(crate) use pending::PendingBuffer;
