//! Page state and page-window computation for the catalog table.

pub mod controls;

use thiserror::Error;

pub use controls::PageControl;

/// Number of neighbouring pages shown on each side of the current page.
pub const WINDOW_RADIUS: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PageChangeRejected {
    #[error("page {target} is outside 0..{total_pages}")]
    OutOfRange { target: i64, total_pages: usize },

    #[error("page {target} is already displayed")]
    AlreadyCurrent { target: usize },
}

/// Collaborator notified after a page change has been accepted.
pub trait PageChangeListener {
    fn on_page_changed(&mut self, new_page: usize);
}

impl<F: FnMut(usize)> PageChangeListener for F {
    fn on_page_changed(&mut self, new_page: usize) {
        self(new_page)
    }
}

/// Derived view of a [`PageState`]. Page indices are zero-based.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: usize,
    pub total_pages: usize,
    pub pages: Vec<usize>,
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub show_last: bool,
    pub trailing_ellipsis: bool,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Flatten the window into render order.
    pub fn controls(&self) -> Vec<PageControl> {
        controls::build_controls(self)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Paginator {
    state: PageState,
    total_elements: u64,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Store the totals reported by the server.
    ///
    /// Returns `true` when the current page fell outside the new range and was
    /// clamped to the last available page.
    pub fn set_total(&mut self, total_pages: usize, total_elements: u64) -> bool {
        self.state.total_pages = total_pages;
        self.total_elements = total_elements;

        let last = total_pages.saturating_sub(1);
        if self.state.current_page > last {
            self.state.current_page = last;
            return true;
        }
        false
    }

    pub fn request_page_change(&mut self, target: i64) -> Result<usize, PageChangeRejected> {
        let total_pages = self.state.total_pages;
        let index = usize::try_from(target)
            .ok()
            .filter(|page| *page < total_pages)
            .ok_or(PageChangeRejected::OutOfRange {
                target,
                total_pages,
            })?;
        if index == self.state.current_page {
            return Err(PageChangeRejected::AlreadyCurrent { target: index });
        }
        self.state.current_page = index;
        Ok(index)
    }

    /// Same as [`Paginator::request_page_change`], notifying `listener` on success.
    pub fn navigate<L>(&mut self, target: i64, listener: &mut L) -> Result<usize, PageChangeRejected>
    where
        L: PageChangeListener + ?Sized,
    {
        let page = self.request_page_change(target)?;
        listener.on_page_changed(page);
        Ok(page)
    }

    pub fn reset_to_first_page(&mut self) {
        self.state.current_page = 0;
    }

    pub fn next_target(&self) -> i64 {
        to_target(self.state.current_page) + 1
    }

    pub fn previous_target(&self) -> i64 {
        to_target(self.state.current_page) - 1
    }

    pub fn last_target(&self) -> i64 {
        to_target(self.state.total_pages) - 1
    }

    pub fn compute_window(&self) -> PageWindow {
        let PageState {
            current_page,
            total_pages,
        } = self.state;

        if total_pages <= 1 {
            return PageWindow {
                current_page,
                total_pages,
                ..PageWindow::default()
            };
        }

        let last = total_pages - 1;
        let start = current_page.saturating_sub(WINDOW_RADIUS);
        let end = current_page.saturating_add(WINDOW_RADIUS).min(last);

        PageWindow {
            current_page,
            total_pages,
            pages: (start..=end).collect(),
            show_first: start > 0,
            leading_ellipsis: start > 1,
            show_last: end < last,
            trailing_ellipsis: end + 1 < last,
            previous_enabled: current_page > 0,
            next_enabled: current_page < last,
        }
    }
}

fn to_target(page: usize) -> i64 {
    i64::try_from(page).unwrap_or(i64::MAX)
}
