pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl LimitOffset {
    /// Clamp caller-supplied values into a window the database will accept.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_first_fifty_rows() {
        let page = LimitOffset::default();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn clamped_bounds_limit_and_offset() {
        assert_eq!(LimitOffset::clamped(Some(0), Some(-5)), LimitOffset { limit: 1, offset: 0 });
        assert_eq!(
            LimitOffset::clamped(Some(10_000), Some(40)),
            LimitOffset { limit: MAX_LIMIT, offset: 40 }
        );
        assert_eq!(LimitOffset::clamped(None, None), LimitOffset::default());
    }
}
