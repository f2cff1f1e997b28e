//! Attest Ledger — the anchor registry abstraction and its backends.
//!
//! An anchor binds a credential's content hash to an immutable external
//! record, independent of the serving application's database. The engine
//! never assumes a specific chain: content hashes are opaque 32-byte values
//! in hex, and `verify` is a pure read.

pub mod client;
pub mod error;
pub mod memory;
pub mod rpc;
pub mod types;

pub use client::AnchorClient;
pub use error::LedgerError;
pub use memory::MemoryAnchorClient;
pub use rpc::JsonRpcAnchorClient;
pub use types::{AnchorReceipt, AnchorStatus, AnchorVerification};
