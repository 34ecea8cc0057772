//! API response envelopes

use serde::{Deserialize, Serialize};

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 总记录数
    pub total: u64,
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总页数
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            ((total as f64) / (limit as f64)).ceil() as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// 由页码计算记录偏移
///
/// Widens to `u64` first so an extreme page number from a query string can
/// never overflow the multiplication.
pub fn page_offset(page: u32, limit: u32) -> u64 {
    (u64::from(page.max(1)) - 1) * u64::from(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_response_total_pages() {
        let items: Vec<i32> = (0..10).collect();
        let resp = PaginatedResponse::new(items, 101, 2, 10);

        assert_eq!(resp.total, 101);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total_pages, 11);
    }

    #[test]
    fn test_page_offset_extreme_page_does_not_overflow() {
        assert_eq!(page_offset(1, 50), 0);
        assert_eq!(page_offset(3, 50), 100);
        assert_eq!(page_offset(0, 50), 0);
        assert_eq!(page_offset(u32::MAX, 200), (u64::from(u32::MAX) - 1) * 200);
    }
}
