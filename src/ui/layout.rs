use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width in columns when open
const SIDEBAR_WIDTH: u16 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub sidebar_sections: Option<Rect>,
    pub sidebar_dataset: Option<Rect>,
    pub main: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect, sidebar_open: bool) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    if !sidebar_open {
        return UiAreas {
            size,
            header: vertical[0],
            sidebar: None,
            sidebar_sections: None,
            sidebar_dataset: None,
            main: vertical[1],
            status_line: vertical[2],
            command_line: vertical[3],
        };
    }

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(vertical[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(main_chunks[0]);

    UiAreas {
        size,
        header: vertical[0],
        sidebar: Some(main_chunks[0]),
        sidebar_sections: Some(sidebar_chunks[0]),
        sidebar_dataset: Some(sidebar_chunks[1]),
        main: main_chunks[1],
        status_line: vertical[2],
        command_line: vertical[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_open_takes_left_columns() {
        let size = Rect::new(0, 0, 100, 40);
        let areas = areas(size, true);
        let sidebar = areas.sidebar.unwrap();
        assert_eq!(sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(areas.main.x, SIDEBAR_WIDTH);
        assert_eq!(areas.main.width, 100 - SIDEBAR_WIDTH);
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.command_line.y, 39);
    }

    #[test]
    fn test_sidebar_closed_gives_full_width() {
        let size = Rect::new(0, 0, 100, 40);
        let areas = areas(size, false);
        assert!(areas.sidebar.is_none());
        assert_eq!(areas.main.width, 100);
        assert_eq!(areas.main.height, 40 - 3 - 2);
    }
}
