use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use attest_core::ContentHash;

use crate::error::PinError;
use crate::pinner::Pinner;

/// In-memory pinning backend.
///
/// Content-addressed over sha256 so repeated pins of the same bytes yield
/// the same CID. Supports injected failure and corruption modes, which makes
/// it the workhorse for lifecycle tests and local runs without a provider.
#[derive(Debug, Default)]
pub struct MemoryPinner {
    objects: DashMap<String, Vec<u8>>,
    fail_pin: AtomicBool,
    fail_fetch: AtomicBool,
    corrupt_fetch: AtomicBool,
    pin_delay_ms: AtomicU64,
}

impl MemoryPinner {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `pin` calls fail as unreachable.
    pub fn set_fail_pin(&self, fail: bool) {
        self.fail_pin.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `fetch` calls fail as unreachable.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `fetch` calls return tampered bytes.
    pub fn set_corrupt_fetch(&self, corrupt: bool) {
        self.corrupt_fetch.store(corrupt, Ordering::SeqCst);
    }

    /// Delay `pin` calls, simulating a slow provider.
    pub fn set_pin_delay(&self, delay: Duration) {
        self.pin_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the backend holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn derive_cid(bytes: &[u8]) -> String {
        format!("Qm{}", &ContentHash::from_bytes(bytes).to_hex()[..44])
    }
}

#[async_trait]
impl Pinner for MemoryPinner {
    async fn pin(&self, bytes: &[u8], _filename: &str) -> Result<String, PinError> {
        let delay = self.pin_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_pin.load(Ordering::SeqCst) {
            return Err(PinError::Unreachable("memory pinner offline".into()));
        }
        let cid = Self::derive_cid(bytes);
        self.objects.insert(cid.clone(), bytes.to_vec());
        Ok(cid)
    }

    async fn fetch(&self, cid: &str) -> Result<Vec<u8>, PinError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(PinError::Unreachable("memory pinner offline".into()));
        }
        let bytes = self
            .objects
            .get(cid)
            .map(|b| b.clone())
            .ok_or_else(|| PinError::RejectedByProvider(format!("unknown cid: {}", cid)))?;

        if self.corrupt_fetch.load(Ordering::SeqCst) {
            let mut tampered = bytes;
            match tampered.first_mut() {
                Some(byte) => *byte = byte.wrapping_add(1),
                None => tampered.push(0xff),
            }
            return Ok(tampered);
        }
        Ok(bytes)
    }

    fn provider_id(&self) -> &str {
        "pin-memory"
    }
}
