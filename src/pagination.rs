// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Parses page/limit query params and builds the count/next/previous envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! Page-number pagination
//!
//! Listings accept `page` (1-based) and `limit` query parameters; `limit`
//! overrides the configured default page size. Responses use the
//! `{count, next, previous, results}` envelope with absolute-path links that
//! carry the listing's remaining query parameters, so following `next` keeps
//! the active filters.

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Pagination query parameters shared by paginated listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Caller override of the page size
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Effective 1-based page number
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to the configured cap
    #[must_use]
    pub fn page_size(&self, default_size: u32) -> u32 {
        let requested = self.limit.unwrap_or(if default_size > 0 {
            default_size
        } else {
            DEFAULT_PAGE_SIZE
        });
        requested.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the effective page
    #[must_use]
    pub fn offset(&self, default_size: u32) -> i64 {
        i64::from(self.page_number() - 1) * i64::from(self.page_size(default_size))
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching rows
    pub count: i64,
    /// Link to the next page, if any
    pub next: Option<String>,
    /// Link to the previous page, if any
    pub previous: Option<String>,
    /// Rows of the current page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page envelope with next/previous links for `path`.
    /// `params` are the listing's non-pagination query parameters; they are
    /// appended to the links so filters survive page navigation.
    #[must_use]
    pub fn new(
        path: &str,
        params: &[(&str, String)],
        query: PageQuery,
        default_size: u32,
        count: i64,
        results: Vec<T>,
    ) -> Self {
        let page = query.page_number();
        let size = query.page_size(default_size);
        let total_pages = if count == 0 {
            1
        } else {
            (count + i64::from(size) - 1) / i64::from(size)
        };

        let link = |n: u32| {
            let mut url = format!("{path}?page={n}&limit={size}");
            for (key, value) in params {
                url.push('&');
                url.push_str(key);
                url.push('=');
                url.push_str(&urlencoding::encode(value));
            }
            Some(url)
        };
        let next = if i64::from(page) < total_pages {
            link(page + 1)
        } else {
            None
        };
        let previous = if page > 1 { link(page - 1) } else { None };

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}
