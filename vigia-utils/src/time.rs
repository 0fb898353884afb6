use std::time::{SystemTime, UNIX_EPOCH};

/// Platform epoch (2015-01-01T00:00:00Z) in milliseconds.
const SNOWFLAKE_EPOCH_MS: u64 = 1_420_070_400_000;

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Creation time encoded in a snowflake id, as unix seconds.
pub fn snowflake_created_at(id: u64) -> u64 {
    ((id >> 22) + SNOWFLAKE_EPOCH_MS) / 1000
}

#[cfg(test)]
mod tests {
    use super::snowflake_created_at;

    #[test]
    fn decodes_snowflake_timestamps() {
        assert_eq!(snowflake_created_at(0), 1_420_070_400);
        assert_eq!(snowflake_created_at(175_928_847_299_117_063), 1_462_015_105);
    }
}
