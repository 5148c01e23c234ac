//! Concrete [`ClientWrapper`](crate::client_wrapper::ClientWrapper) implementations.

pub mod common;
pub mod openai;
