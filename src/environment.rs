//! Host and environment metadata captured alongside benchmark runs.

use serde::{Deserialize, Serialize};

/// A snapshot of the environment a benchmark ran in.
///
/// Revision identifiers are supplied by the caller when known; the harness
/// does not guess at VCS state. Absent values are persisted as the literal
/// `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Random identifier for this run.
    pub uuid: String,
    /// Capture time, RFC 3339, UTC.
    pub timestamp: String,
    /// Revision of the runtime/toolchain, when the caller knows it.
    pub runtime_sha1: Option<String>,
    /// Revision of the benchmarked code's repository, when known.
    pub package_sha1: Option<String>,
    /// Operating system name.
    pub os: String,
    /// Logical CPU count.
    pub cpu_cores: usize,
    /// Target architecture.
    pub arch: String,
    /// Hostname, when determinable.
    pub machine: Option<String>,
    /// Pointer width in bits.
    pub word_size: usize,
}

impl Environment {
    /// Capture the current environment.
    pub fn capture() -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            runtime_sha1: None,
            package_sha1: None,
            os: std::env::consts::OS.to_string(),
            cpu_cores: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            arch: std::env::consts::ARCH.to_string(),
            machine: hostname(),
            word_size: usize::BITS as usize,
        }
    }

    /// Set the runtime revision identifier.
    pub fn runtime_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.runtime_sha1 = Some(sha1.into());
        self
    }

    /// Set the benchmarked package's revision identifier.
    pub fn package_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.package_sha1 = Some(sha1.into());
        self
    }
}

fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_plausible() {
        let env = Environment::capture();
        assert!(!env.uuid.is_empty());
        assert!(env.timestamp.contains('T'));
        assert!(env.cpu_cores >= 1);
        assert!(env.word_size == 32 || env.word_size == 64);
        assert_eq!(env.os, std::env::consts::OS);
        assert_eq!(env.runtime_sha1, None);
    }

    #[test]
    fn test_distinct_captures_get_distinct_ids() {
        let a = Environment::capture();
        let b = Environment::capture();
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn test_revision_setters() {
        let env = Environment::capture()
            .runtime_sha1("deadbeef")
            .package_sha1("cafebabe");
        assert_eq!(env.runtime_sha1.as_deref(), Some("deadbeef"));
        assert_eq!(env.package_sha1.as_deref(), Some("cafebabe"));
    }
}
