use super::PageWindow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageControl {
    Previous { enabled: bool },
    Page { index: usize, current: bool },
    Ellipsis,
    Next { enabled: bool },
}

pub(crate) fn build_controls(window: &PageWindow) -> Vec<PageControl> {
    if window.is_empty() {
        return vec![];
    }

    let page = |index: usize| PageControl::Page {
        index,
        current: index == window.current_page,
    };

    let mut out = Vec::with_capacity(window.pages.len() + 6);
    out.push(PageControl::Previous {
        enabled: window.previous_enabled,
    });
    if window.show_first {
        out.push(page(0));
        if window.leading_ellipsis {
            out.push(PageControl::Ellipsis);
        }
    }
    out.extend(window.pages.iter().copied().map(page));
    if window.show_last {
        if window.trailing_ellipsis {
            out.push(PageControl::Ellipsis);
        }
        out.push(page(window.total_pages - 1));
    }
    out.push(PageControl::Next {
        enabled: window.next_enabled,
    });
    out
}
