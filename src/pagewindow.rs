//! The page window: a skip/take pair and its string token codec.
//!
//! A [`PageWindow`] names a contiguous run of rows by the number of rows
//! to skip and the page size to take. Its canonical external form is the
//! token `"<skip>-<size>"`, which is what gets written to a
//! [`PageWindowStore`](crate::sync::PageWindowStore) under the table's
//! name, e.g. `products=20-10` for rows 20–29 at page size 10.
//!
//! Decoding is deliberately forgiving: an absent or malformed token
//! degrades to the first page at the caller's default size rather than
//! surfacing an error, so a hand-edited or truncated token can never
//! wedge the pagination state.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::pagewindow::PageWindow;
//!
//! let w = PageWindow::new(20, 10);
//! assert_eq!(w.encode(), "20-10");
//! assert_eq!(PageWindow::decode(Some("20-10"), 25), w);
//! assert_eq!(w.index(), 2);
//!
//! // Malformed tokens fall back to the defaults.
//! assert_eq!(PageWindow::decode(Some("twenty-ten"), 25), PageWindow::new(0, 25));
//! assert_eq!(PageWindow::decode(None, 25), PageWindow::new(0, 25));
//! ```

/// A window into a row set: `skip` rows skipped, `size` rows taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based row offset of the first row in the window.
    pub skip: usize,
    /// Number of rows in the window. Always at least 1 after
    /// construction through [`new`](Self::new) or
    /// [`decode`](Self::decode).
    pub size: usize,
}

impl PageWindow {
    /// Creates a window, clamping `size` to a minimum of 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::pagewindow::PageWindow;
    ///
    /// assert_eq!(PageWindow::new(0, 0).size, 1);
    /// ```
    pub fn new(skip: usize, size: usize) -> Self {
        Self {
            skip,
            size: size.max(1),
        }
    }

    /// Creates the window for a zero-based page index at a page size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::pagewindow::PageWindow;
    ///
    /// let w = PageWindow::from_index(3, 25);
    /// assert_eq!((w.skip, w.size), (75, 25));
    /// ```
    pub fn from_index(index: usize, size: usize) -> Self {
        let size = size.max(1);
        Self {
            skip: index * size,
            size,
        }
    }

    /// Encodes the window as its canonical `"<skip>-<size>"` token.
    pub fn encode(&self) -> String {
        format!("{}-{}", self.skip, self.size)
    }

    /// Decodes a token, falling back to `{skip: 0, size: default_size}`
    /// when the token is absent or malformed.
    ///
    /// A token is well-formed when it splits on a single `-` into two
    /// base-10 integers and the size part is at least 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::pagewindow::PageWindow;
    ///
    /// assert_eq!(PageWindow::decode(Some("40-20"), 10), PageWindow::new(40, 20));
    /// assert_eq!(PageWindow::decode(Some("40-"), 10), PageWindow::new(0, 10));
    /// assert_eq!(PageWindow::decode(Some("40-0"), 10), PageWindow::new(0, 10));
    /// ```
    pub fn decode(token: Option<&str>, default_size: usize) -> Self {
        let fallback = Self::new(0, default_size);
        let Some(token) = token else {
            return fallback;
        };
        let Some((skip, size)) = token.split_once('-') else {
            return fallback;
        };
        match (skip.parse::<usize>(), size.parse::<usize>()) {
            (Ok(skip), Ok(size)) if size >= 1 => Self { skip, size },
            _ => fallback,
        }
    }

    /// Returns the zero-based page index this window corresponds to.
    ///
    /// A `size` below 1 is treated as 1 so the division is always
    /// defined.
    pub fn index(&self) -> usize {
        self.skip / self.size.max(1)
    }
}
