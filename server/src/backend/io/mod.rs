//! # IO Module
//!
//! Adapters between the outside world and the domain services: the REST
//! API served to the web clients and the outbound text generation client.

pub mod gemini_client;
pub mod rest;
