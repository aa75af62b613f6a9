/// Scrolling moves the window toward one end of the interface list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    TowardTail,
    TowardHead,
}

/// The window of interface rows currently on screen.
///
/// Operates on arena slot indices; `row_offset` is the display index of
/// the first visible entry, so an entry's screen row is
/// `display_index - row_offset`. Entries outside the window are never
/// painted (virtualization over the live-growing list).
#[derive(Debug, Clone)]
pub struct ViewWindow {
    first: usize,
    last: usize,
    row_offset: u32,
    height: usize,
}

impl ViewWindow {
    /// Window anchored at the list head, covering up to `viewport_height`
    /// entries or the whole list, whichever ends first.
    pub fn prepare(list_len: usize, viewport_height: usize) -> Self {
        let height = viewport_height.max(1);
        let last = list_len.saturating_sub(1).min(height - 1);
        Self {
            first: 0,
            last,
            row_offset: 1,
            height,
        }
    }

    /// One-line scroll. No-op at the corresponding list end; otherwise
    /// both bounds shift and the newly exposed slot is returned so the
    /// caller can paint just that row.
    pub fn scroll_line(&mut self, direction: ScrollDirection, list_len: usize) -> Option<usize> {
        match direction {
            ScrollDirection::TowardTail => {
                if self.last + 1 >= list_len {
                    return None;
                }
                self.first += 1;
                self.last += 1;
                self.row_offset += 1;
                Some(self.last)
            }
            ScrollDirection::TowardHead => {
                if self.first == 0 {
                    return None;
                }
                self.first -= 1;
                self.last -= 1;
                self.row_offset -= 1;
                Some(self.first)
            }
        }
    }

    /// Up to (viewport height − 1) line scrolls, stopping early at the
    /// list end. Returns whether the window moved at all.
    pub fn scroll_page(&mut self, direction: ScrollDirection, list_len: usize) -> bool {
        let mut moved = false;
        for _ in 1..self.height {
            if self.scroll_line(direction, list_len).is_none() {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Admits entries appended since the window was built while it still
    /// has spare rows, so a hot-plugged interface shows up without a
    /// scroll when there is room for it.
    pub fn note_len(&mut self, list_len: usize) {
        while self.last + 1 < list_len && self.last - self.first + 1 < self.height {
            self.last += 1;
        }
    }

    #[must_use]
    pub fn first(&self) -> usize {
        self.first
    }

    #[must_use]
    pub fn last(&self) -> usize {
        self.last
    }

    #[must_use]
    pub fn row_offset(&self) -> u32 {
        self.row_offset
    }

    #[must_use]
    pub fn is_visible(&self, display_index: u32) -> bool {
        display_index >= self.row_offset && display_index < self.row_offset + self.height as u32
    }

    /// 0-based row within the table body, or `None` when off-screen.
    #[must_use]
    pub fn screen_row(&self, display_index: u32) -> Option<u16> {
        if self.is_visible(display_index) {
            Some((display_index - self.row_offset) as u16)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_short_list() {
        let view = ViewWindow::prepare(3, 10);
        assert_eq!(view.first(), 0);
        assert_eq!(view.last(), 2);
        assert_eq!(view.row_offset(), 1);
    }

    #[test]
    fn test_prepare_long_list() {
        let view = ViewWindow::prepare(20, 10);
        assert_eq!(view.first(), 0);
        assert_eq!(view.last(), 9);
    }

    #[test]
    fn test_scroll_round_trip() {
        let len = 10;
        let height = 4;
        let mut view = ViewWindow::prepare(len, height);
        let (first0, offset0) = (view.first(), view.row_offset());

        for _ in 0..height {
            view.scroll_line(ScrollDirection::TowardTail, len);
        }
        for _ in 0..height {
            view.scroll_line(ScrollDirection::TowardHead, len);
        }

        assert_eq!(view.first(), first0);
        assert_eq!(view.row_offset(), offset0);
    }

    #[test]
    fn test_scroll_noop_at_ends() {
        let len = 5;
        let mut view = ViewWindow::prepare(len, 3);

        assert!(view.scroll_line(ScrollDirection::TowardHead, len).is_none());

        // 2 steps to the tail, then pinned.
        assert_eq!(view.scroll_line(ScrollDirection::TowardTail, len), Some(3));
        assert_eq!(view.scroll_line(ScrollDirection::TowardTail, len), Some(4));
        assert!(view.scroll_line(ScrollDirection::TowardTail, len).is_none());
        assert_eq!(view.last(), len - 1);
    }

    #[test]
    fn test_window_width_invariant() {
        let len = 30;
        let height = 8;
        let mut view = ViewWindow::prepare(len, height);

        for _ in 0..40 {
            view.scroll_line(ScrollDirection::TowardTail, len);
            assert!(view.last() - view.first() <= height - 1);
            assert_eq!(view.row_offset() as usize, view.first() + 1);
        }
    }

    #[test]
    fn test_page_scroll_stops_at_end() {
        let len = 5;
        let mut view = ViewWindow::prepare(len, 4);

        assert!(view.scroll_page(ScrollDirection::TowardTail, len));
        // only one slot of slack existed
        assert_eq!(view.first(), 1);
        assert_eq!(view.last(), 4);

        assert!(!view.scroll_page(ScrollDirection::TowardTail, len));
    }

    #[test]
    fn test_virtualized_paint_range() {
        let mut view = ViewWindow::prepare(20, 5);
        view.scroll_line(ScrollDirection::TowardTail, 20);

        assert!(!view.is_visible(1));
        assert!(view.is_visible(2));
        assert!(view.is_visible(6));
        assert!(!view.is_visible(7));
        assert_eq!(view.screen_row(2), Some(0));
        assert_eq!(view.screen_row(6), Some(4));
        assert_eq!(view.screen_row(7), None);
    }

    #[test]
    fn test_note_len_admits_growth() {
        let mut view = ViewWindow::prepare(2, 5);
        assert_eq!(view.last(), 1);

        view.note_len(4);
        assert_eq!(view.last(), 3);

        // full window stays put
        view.note_len(10);
        assert_eq!(view.last(), 4);
        view.note_len(11);
        assert_eq!(view.last(), 4);
    }
}
