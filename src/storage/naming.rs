//! Unique naming
//!
//! Stored files are named `<requester>_<message>_<nanos>.<ext>`. Identities
//! are integers, so they can never carry path separators; the timestamp is
//! strictly increasing within a process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Nanoseconds since the epoch, bumped so no two calls in this process share a value
pub fn unique_timestamp() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut prev = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// Build a stored basename from its parts
pub fn format_stored_name(
    requester_id: i64,
    message_id: i64,
    timestamp: u64,
    extension: &str,
) -> String {
    format!("{requester_id}_{message_id}_{timestamp}.{extension}")
}

/// Generate a fresh stored basename
pub fn generate_stored_name(requester_id: i64, message_id: i64, extension: &str) -> String {
    format_stored_name(requester_id, message_id, unique_timestamp(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_negative_ids_kept_verbatim() {
        let name = format_stored_name(-1001234, -42, 7, "jpg");
        assert_eq!(name, "-1001234_-42_7.jpg");
    }

    #[test]
    fn test_same_identity_never_collides() {
        let names: HashSet<String> = (0..1000)
            .map(|_| generate_stored_name(5, 9, "png"))
            .collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_different_identity_same_tick_differs() {
        let a = format_stored_name(1, 23, 100, "pdf");
        let b = format_stored_name(12, 3, 100, "pdf");
        let c = format_stored_name(1, -23, 100, "pdf");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_name_is_a_plain_basename() {
        let name = generate_stored_name(i64::MIN, i64::MAX, "docx");
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(name.starts_with(&format!("{}_{}_", i64::MIN, i64::MAX)));
        assert!(name.ends_with(".docx"));
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let first = unique_timestamp();
        let second = unique_timestamp();
        assert!(second > first);
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..200)
                        .map(|_| generate_stored_name(1, 1, "jpg"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for name in handle.join().unwrap() {
                assert!(all.insert(name));
            }
        }
        assert_eq!(all.len(), 1600);
    }
}
