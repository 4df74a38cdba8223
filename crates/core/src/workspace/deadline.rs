use crate::error::{Result, WayfinderError};
use std::time::{Duration, Instant};

/// Cooperative time budget for one operation, checked between files.
#[derive(Debug, Clone)]
pub struct Deadline {
    operation: &'static str,
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn new(operation: &'static str, timeout_ms: Option<u64>) -> Self {
        Self {
            operation,
            started: Instant::now(),
            limit: timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn unbounded(operation: &'static str) -> Self {
        Self::new(operation, None)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn is_expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.started.elapsed() >= limit)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_expired() {
            tracing::warn!(
                "{} exceeded its budget after {} ms",
                self.operation,
                self.elapsed_ms()
            );
            return Err(WayfinderError::Timeout {
                operation: self.operation,
                elapsed_ms: self.elapsed_ms(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_expires_immediately() {
        let deadline = Deadline::new("scan", Some(0));
        assert!(matches!(
            deadline.check(),
            Err(WayfinderError::Timeout { operation: "scan", .. })
        ));
        assert!(Deadline::unbounded("scan").check().is_ok());
    }
}
