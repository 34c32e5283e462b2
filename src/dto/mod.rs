//! Request, response, and event payloads exposed over the HTTP surface.

pub mod health;
pub mod score;
pub mod sse;
