//! Page-number pagination for listings.
//!
//! Pages are 1-based. An empty listing still has one (empty) page; any
//! other out-of-range request is an error.

use std::str::FromStr;

use crate::{BlogError, Result};

/// A requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    /// An explicit 1-based page number.
    Number(i64),
    /// The last page, whatever its number.
    Last,
}

impl Default for PageNumber {
    fn default() -> Self {
        PageNumber::Number(1)
    }
}

impl FromStr for PageNumber {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "last" {
            return Ok(PageNumber::Last);
        }
        s.parse::<i64>()
            .map(PageNumber::Number)
            .map_err(|_| BlogError::NotFound(format!("page '{s}'")))
    }
}

impl PageNumber {
    /// Parse an optional raw query value; absent or empty means page 1.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self> {
        match raw {
            None => Ok(PageNumber::default()),
            Some(s) if s.trim().is_empty() => Ok(PageNumber::default()),
            Some(s) => s.parse(),
        }
    }
}

/// Splits `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: i64,
    total: i64,
}

impl Paginator {
    /// Create a paginator. A zero page size is treated as 1.
    pub fn new(per_page: u32, total: i64) -> Self {
        Self {
            per_page: i64::from(per_page.max(1)),
            total: total.max(0),
        }
    }

    /// Number of pages; at least 1.
    pub fn num_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve a requested page to a valid page number.
    pub fn resolve(&self, requested: PageNumber) -> Result<i64> {
        let number = match requested {
            PageNumber::Last => self.num_pages(),
            PageNumber::Number(n) => n,
        };
        if number < 1 || number > self.num_pages() {
            return Err(BlogError::NotFound(format!("page {number}")));
        }
        Ok(number)
    }

    /// Row offset of the given (resolved) page.
    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }

    /// Page size.
    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Wrap the rows of a resolved page.
    pub fn page<T>(&self, number: i64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            per_page: self.per_page,
            total: self.total,
            num_pages: self.num_pages(),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: i64,
    /// Page size.
    pub per_page: i64,
    /// Total number of items across all pages.
    pub total: i64,
    /// Total number of pages.
    pub num_pages: i64,
}

impl<T> Page<T> {
    /// Whether a following page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether a preceding page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether the listing spans more than one page.
    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}
