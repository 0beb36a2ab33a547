//! Pieces shared by the STT, translation, and TTS provider crates

#![allow(clippy::must_use_candidate)]

mod http_client;
pub mod text;

pub use http_client::{REQUEST_TIMEOUT, http_client, transfer_timeout};
