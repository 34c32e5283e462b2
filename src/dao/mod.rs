/// Externally written pending-delta inbox.
pub mod pending;
/// Authoritative score record and its durable copy.
pub mod score_store;
/// Error types shared by the file-backed stores.
pub mod storage;
