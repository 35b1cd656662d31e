//! Page/limit query handling shared by list endpoints.
//!
//! Query values arrive as raw strings and are read leniently: the leading
//! decimal digits are used (`"5abc"` is 5), anything else falls back to the
//! default. The resolved limit never exceeds the policy maximum.

use serde::Deserialize;
use utoipa::IntoParams;

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size (module default when omitted, clamped to the module maximum).
    #[param(example = "10")]
    pub limit: Option<String>,
}

/// Resolved, always-valid page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

/// Highest row position a storage backend can address (signed 64-bit).
pub const MAX_ROW_POSITION: u64 = i64::MAX as u64;

impl PageRequest {
    /// Number of records to skip before this page, or `None` when the window
    /// `offset + limit` lies past [`MAX_ROW_POSITION`]. Such a page is empty.
    pub fn offset(&self) -> Option<u64> {
        let offset = self.page.saturating_sub(1).checked_mul(self.limit)?;
        let end = offset.checked_add(self.limit)?;
        (end <= MAX_ROW_POSITION).then_some(offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl PagePolicy {
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn resolve(&self, query: &PageQuery) -> PageRequest {
        let page = query.page.as_deref().and_then(parse_positive).unwrap_or(1);
        let limit = query
            .limit
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(self.default_limit)
            .min(self.max_limit);
        PageRequest { page, limit }
    }
}

/// Leading decimal digits of `raw` (after surrounding whitespace) as a
/// positive integer. Overflow saturates.
fn parse_positive(raw: &str) -> Option<u64> {
    let digits: &str = {
        let s = raw.trim();
        let end = s
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(s.len(), |(i, _)| i);
        &s[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    (value > 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_owned),
            limit: limit.map(str::to_owned),
        }
    }

    #[test]
    fn defaults_when_absent() {
        let req = PagePolicy::default().resolve(&PageQuery::default());
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), Some(0));
    }

    #[test]
    fn leading_digits_are_used() {
        let req = PagePolicy::default().resolve(&q(Some("3rd"), Some("25 rows")));
        assert_eq!(req, PageRequest { page: 3, limit: 25 });
        assert_eq!(req.offset(), Some(50));
    }

    #[test]
    fn garbage_and_zero_fall_back() {
        for raw in ["", "abc", "0", "-4", "  "] {
            let req = PagePolicy::default().resolve(&q(Some(raw), Some(raw)));
            assert_eq!(req, PageRequest { page: 1, limit: 10 }, "input {raw:?}");
        }
    }

    #[test]
    fn limit_is_clamped_to_max() {
        let req = PagePolicy::new(10, 100).resolve(&q(None, Some("10000000")));
        assert_eq!(req.limit, 100);

        let req = PagePolicy::new(10, 100).resolve(&q(None, Some("99999999999999999999999")));
        assert_eq!(req.limit, 100);
    }

    #[test]
    fn policy_keeps_default_within_max() {
        let policy = PagePolicy::new(500, 50);
        assert_eq!(policy.default_limit, 50);
        assert_eq!(PagePolicy::new(0, 0).max_limit, 1);
    }

    #[test]
    fn window_past_row_range_has_no_offset() {
        let huge = PagePolicy::default().resolve(&q(Some("100000000000000000"), Some("100")));
        assert_eq!(huge.offset(), None);

        let saturated = PagePolicy::default().resolve(&q(Some("99999999999999999999"), None));
        assert_eq!(saturated.page, u64::MAX);
        assert_eq!(saturated.offset(), None);

        let last = PageRequest {
            page: MAX_ROW_POSITION / 100,
            limit: 100,
        };
        assert_eq!(last.offset(), Some(MAX_ROW_POSITION / 100 * 100 - 100));
    }
}
