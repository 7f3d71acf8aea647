//! Per-request correlation and timing.

use std::time::Instant;

use uuid::Uuid;

/// Correlation identifier plus start-of-request timing.
///
/// Opened by the audit middleware before the handler runs and carried
/// through request extensions, so the scoring handler reports the same
/// identifier it is measured under.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    request_id: Uuid,
    started_at: Instant,
}

impl RequestContext {
    pub fn open() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            started_at: Instant::now(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Elapsed time since `open`, in milliseconds rounded to 2 decimals.
    pub fn close(&self) -> f64 {
        let elapsed_ms = self.started_at.elapsed().as_secs_f64() * 1000.0;
        (elapsed_ms * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_do_not_collide() {
        let a = RequestContext::open();
        let b = RequestContext::open();
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_close_is_non_negative_and_two_decimals() {
        let ctx = RequestContext::open();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let elapsed = ctx.close();
        assert!(elapsed >= 5.0);
        let cents = elapsed * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6);
    }
}
