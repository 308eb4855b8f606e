use time::OffsetDateTime;
use time::macros::format_description;

/// Correlation token for one batch invocation: UTC stamp plus a random hex
/// suffix. Collisions are an accepted low-probability risk, not guarded
/// against.
pub fn generate_batch_id() -> String {
    let now = OffsetDateTime::now_utc();
    let stamp = now
        .format(format_description!(
            "[year][month][day]T[hour][minute][second]"
        ))
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    let mut raw = [0u8; 4];
    if getrandom::getrandom(&mut raw).is_err() {
        raw = now.nanosecond().to_le_bytes();
    }
    format!("{stamp}-{}", hex::encode(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_stamp_and_suffix() {
        let id = generate_batch_id();
        let (stamp, suffix) = id.rsplit_once('-').unwrap();
        assert_eq!(stamp.len(), 15); // YYYYMMDDThhmmss
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_ids_differ() {
        assert_ne!(generate_batch_id(), generate_batch_id());
    }
}
