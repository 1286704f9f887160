use rand::Rng;
use time::OffsetDateTime;

/// Millisecond timestamp of `now`, the id scheme both recipes and users use.
pub fn timestamp_id(now: OffsetDateTime) -> i64 {
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}

/// A timestamp id with a random offset, re-drawn until `taken` rejects it.
pub fn fresh_id(now: OffsetDateTime, taken: impl Fn(i64) -> bool) -> i64 {
    let base = timestamp_id(now);
    let mut rng = rand::thread_rng();
    loop {
        let id = base + rng.gen_range(0..1000);
        if !taken(id) {
            return id;
        }
    }
}
