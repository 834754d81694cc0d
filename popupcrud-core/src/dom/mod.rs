//! Document model
//!
//! A small markup reader and an in-memory [`Page`](crate::traits::Page)
//! built on it.

mod fragment;
pub(crate) mod markup;
mod memory_page;

pub use memory_page::{
    BackdropSnapshot, DialogSnapshot, DispatchedEvent, MemoryPage, MemoryPageBuilder,
    SelectSnapshot,
};
