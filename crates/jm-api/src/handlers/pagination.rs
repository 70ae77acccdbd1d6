pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 200;

/// Missing limits take `default`; anything else is clamped into `1..=MAX_LIMIT`.
pub fn clamp_limit(requested: Option<i64>, default: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(clamp_limit(None, DEFAULT_LIMIT), 20);
        assert_eq!(clamp_limit(Some(0), DEFAULT_LIMIT), 1);
        assert_eq!(clamp_limit(Some(-5), DEFAULT_LIMIT), 1);
        assert_eq!(clamp_limit(Some(75), DEFAULT_LIMIT), 75);
        assert_eq!(clamp_limit(Some(10_000), DEFAULT_LIMIT), MAX_LIMIT);
    }
}
