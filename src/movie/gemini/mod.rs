//! Gemini generative text and image integration

pub mod dto;

mod client;

pub use client::{GeminiClient, IMAGE_MODEL, TEXT_MODEL};
