#![doc = include_str!("../README.md")]

pub mod chat;
pub mod embeddings;
pub mod models;
pub mod text;

/// Temperature sent when the caller does not supply one.
///
/// Unlike the other optional parameters, `temperature` is always present in
/// `generateText` and `generateMessage` bodies.
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
