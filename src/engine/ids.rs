use std::sync::atomic::{AtomicU64, Ordering};

const MESSAGE_ID_PREFIX: &str = "msg_";

/// Produces unique message ids: a random per-process seed mixed with a counter.
pub(crate) struct MessageIdGenerator {
    seed: u128,
    counter: AtomicU64,
}

impl MessageIdGenerator {
    #[must_use]
    pub(crate) fn new() -> Self {
        let seed_hi = u128::from(fastrand::u64(..));
        let seed_lo = u128::from(fastrand::u64(..));
        Self {
            seed: (seed_hi << 64) | seed_lo,
            counter: AtomicU64::new(1),
        }
    }

    /// `msg_` followed by 32 lowercase hex digits.
    pub(crate) fn next_message_id(&self) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let uuid = uuid::Uuid::from_u128(self.seed ^ u128::from(seq));
        let mut out = String::with_capacity(MESSAGE_ID_PREFIX.len() + 32);
        out.push_str(MESSAGE_ID_PREFIX);
        out.push_str(uuid.simple().encode_lower(&mut uuid::Uuid::encode_buffer()));
        out
    }
}
