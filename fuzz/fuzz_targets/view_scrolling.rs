#![no_main]
use ifwatch::view::{ScrollDirection, ViewWindow};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let list_len = usize::from(data[0]).max(1);
    let height = usize::from(data[1] % 32).max(1);
    let mut view = ViewWindow::prepare(list_len, height);

    for &op in &data[2..] {
        match op % 5 {
            0 => {
                view.scroll_line(ScrollDirection::TowardTail, list_len);
            }
            1 => {
                view.scroll_line(ScrollDirection::TowardHead, list_len);
            }
            2 => {
                view.scroll_page(ScrollDirection::TowardTail, list_len);
            }
            3 => {
                view.scroll_page(ScrollDirection::TowardHead, list_len);
            }
            _ => view.note_len(list_len),
        }

        // Window invariants hold after every operation.
        assert!(view.first() <= view.last());
        assert!(view.last() < list_len);
        assert!(view.last() - view.first() < height);
        assert_eq!(view.row_offset() as usize, view.first() + 1);
    }
});
