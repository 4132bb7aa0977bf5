use crate::consts;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::error::Error;

/// Return a `Rect` of the given size centered within `area`, shrunk to fit
/// if `area` is too small
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [inner] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [inner] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(inner);
    inner
}

/// Render an error and all of its sources as one colon-separated line
pub(crate) fn error_chain(e: &dyn Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(src) = source {
        msg.push_str(": ");
        msg.push_str(&src.to_string());
        source = src.source();
    }
    msg
}

/// Regions of the terminal occupied by the various widgets
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Screen {
    pub(crate) board: Rect,
    pub(crate) panel: Rect,
    pub(crate) controls: Rect,
}

impl Screen {
    /// Lay out a board of size `board` with the side panel to its right and
    /// the control bar below, all centered within `area`
    pub(crate) fn new(area: Rect, board: Size) -> Screen {
        let width = board
            .width
            .saturating_add(1)
            .saturating_add(consts::PANEL_WIDTH);
        let height = board
            .height
            .max(consts::PANEL_HEIGHT)
            .saturating_add(consts::CONTROLS_HEIGHT);
        let display = center_rect(area, Size::new(width, height));
        let [top, controls] = Layout::vertical([
            display.height.saturating_sub(consts::CONTROLS_HEIGHT),
            consts::CONTROLS_HEIGHT,
        ])
        .areas(display);
        let [board, panel] = Layout::horizontal([board.width, consts::PANEL_WIDTH])
            .spacing(1)
            .areas(top);
        Screen {
            board,
            panel,
            controls,
        }
    }
}
