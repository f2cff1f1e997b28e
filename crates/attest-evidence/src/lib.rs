//! Attest Evidence — evidence records, the pinning client abstraction with
//! its provider backends, and the asynchronous pin pipeline.

pub mod error;
pub mod intake;
pub mod pinner;
pub mod pipeline;
pub mod providers;
pub mod queue;
pub mod record;
pub mod store;

pub use error::{EvidenceError, PinError};
pub use intake::{ingest, EvidenceUpload};
pub use pinner::{pinner_from_config, Pinner};
pub use pipeline::PinPipeline;
pub use providers::{IpfsNodePinner, MemoryPinner, PinataPinner};
pub use queue::PinQueue;
pub use record::{Evidence, EvidenceMetadata, NewEvidence};
pub use store::{EvidenceStore, MemoryEvidenceStore};
