//! Pinning provider backends.

mod ipfs_node;
mod memory;
mod pinata;

pub use ipfs_node::IpfsNodePinner;
pub use memory::MemoryPinner;
pub use pinata::PinataPinner;
