use std::fmt::{self, Display, Write};
use unicode_width::UnicodeWidthStr;
use unsegen::base::*;
use unsegen::widget::*;

use super::Theme;
use crate::grid::{Direction, DAYS_PER_WEEK};
use crate::markup::Element;
use crate::widget::arrow_class;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub weekend: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub day_num: String,
    pub other_month: bool,
    pub today: bool,
}

impl CellView {
    const CELL_HEIGHT: usize = 1;
    const CELL_WIDTH: usize = 4;

    fn fmt_with(&self, f: &mut dyn Write, today_char: Option<char>) -> fmt::Result {
        let marker = if self.today {
            today_char.unwrap_or(' ')
        } else {
            ' '
        };

        write!(f, " {}{:>2}", marker, self.day_num)
    }
}

impl Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, Some('*'))
    }
}

/// What a terminal needs from a rendered calendar container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLayout {
    pub title: String,
    pub left: String,
    pub right: String,
    pub labels: Vec<Label>,
    pub cells: Vec<CellView>,
}

impl MonthLayout {
    /// `None` if the container holds no rendered calendar.
    pub fn from_container(container: &Element) -> Option<Self> {
        let title = container.first_by_class("month-name")?.text_content();
        let left = container
            .first_by_class(arrow_class(Direction::Previous))?
            .text_content();
        let right = container
            .first_by_class(arrow_class(Direction::Next))?
            .text_content();

        let labels = container
            .first_by_class("day-of-week")?
            .children()
            .iter()
            .map(|label| Label {
                text: label.text_content(),
                weekend: label.has_class("weekend"),
            })
            .collect();

        let cells = container
            .first_by_class("date-grid")?
            .children()
            .iter()
            .map(|cell| CellView {
                day_num: cell.text_content(),
                other_month: cell.has_class("other-month"),
                today: cell.has_class("today"),
            })
            .collect();

        Some(MonthLayout {
            title,
            left,
            right,
            labels,
            cells,
        })
    }

    fn grid_width() -> usize {
        DAYS_PER_WEEK * CellView::CELL_WIDTH
    }

    fn arrows_width(&self) -> usize {
        self.left.width() + self.right.width()
    }

    /// Terminal columns needed: the grid, or the header if that is wider.
    pub fn width(&self) -> usize {
        Self::grid_width().max(self.title.width() + self.arrows_width())
    }

    /// The title padded to fill the space between the arrows.
    fn centered_title(&self) -> String {
        let space = self.width() - self.arrows_width();
        let pad = space.saturating_sub(self.title.width());
        let left = pad / 2;
        format!(
            "{}{}{}",
            " ".repeat(left),
            self.title,
            " ".repeat(pad - left)
        )
    }

    /// Plain text rendition for non-interactive output.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        if let Err(err) = self.write_plain(&mut out) {
            log::warn!("Error while formatting month: {}", err);
        }
        out
    }

    fn write_plain(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "{}{}{}", self.left, self.centered_title(), self.right)?;

        for label in &self.labels {
            write!(out, "{:>width$}", label.text, width = CellView::CELL_WIDTH)?;
        }
        writeln!(out)?;

        for week in self.cells.chunks(DAYS_PER_WEEK) {
            for cell in week {
                write!(out, "{}", cell)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

pub struct MonthPane<'a> {
    container: Option<&'a Element>,
    theme: &'a Theme,
}

impl<'a> MonthPane<'a> {
    const HEADER_ROWS: usize = 2;
    const MAX_ROWS: usize = 6;

    pub fn new(container: Option<&'a Element>, theme: &'a Theme) -> Self {
        MonthPane { container, theme }
    }

    fn draw_layout(&self, layout: &MonthLayout, cursor: &mut Cursor) -> fmt::Result {
        let theme = self.theme;

        cursor.set_style_modifier(theme.arrow_style);
        write!(cursor, "{}", layout.left)?;
        cursor.set_style_modifier(
            theme
                .month_header_style
                .format(theme.month_header_text_style),
        );
        write!(cursor, "{}", layout.centered_title())?;
        cursor.set_style_modifier(theme.arrow_style);
        writeln!(cursor, "{}", layout.right)?;

        for label in &layout.labels {
            cursor.set_style_modifier(if label.weekend {
                theme.weekend_label_style
            } else {
                theme.weekday_label_style
            });
            write!(
                cursor,
                "{:>width$}",
                label.text,
                width = CellView::CELL_WIDTH
            )?;
        }
        writeln!(cursor)?;

        for week in layout.cells.chunks(DAYS_PER_WEEK) {
            for cell in week {
                let style = if cell.today {
                    theme.today_day_style.format(theme.today_day_text_style)
                } else if cell.other_month {
                    theme.other_month_day_style
                } else {
                    theme.day_style.format(theme.day_text_style)
                };
                cursor.set_style_modifier(style);
                cell.fmt_with(cursor, theme.today_day_char)?;
            }
            writeln!(cursor)?;
        }

        Ok(())
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(
                self.container
                    .and_then(MonthLayout::from_container)
                    .map_or_else(MonthLayout::grid_width, |layout| layout.width()),
            ),
            height: RowDemand::exact(Self::HEADER_ROWS + Self::MAX_ROWS * CellView::CELL_HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let layout = match self.container.and_then(MonthLayout::from_container) {
            Some(layout) => layout,
            None => return,
        };

        let mut cursor = Cursor::new(&mut window).wrapping_mode(WrappingMode::Wrap);

        if let Err(err) = self.draw_layout(&layout, &mut cursor) {
            log::warn!("Error while drawing month: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{bootstrap_at, Document};
    use crate::widget::Settings;
    use chrono::{Locale, NaiveDate};
    use unicode_width::UnicodeWidthStr;

    fn rendered() -> Document {
        let mut doc = Document::page("day-by-day", 1);
        let settings = Settings {
            locale: Locale::en_US,
            ..Settings::default()
        };
        bootstrap_at(
            &mut doc,
            "day-by-day",
            settings,
            NaiveDate::from_ymd_opt(2024, 12, 18).unwrap(),
        );
        doc
    }

    #[test]
    fn layout_from_rendered_container() {
        let doc = rendered();
        let layout = MonthLayout::from_container(&doc.root().children()[0]).unwrap();

        assert_eq!(layout.title, "December 2024");
        assert_eq!(layout.left, "«");
        assert_eq!(layout.right, "»");
        assert_eq!(layout.labels.len(), 7);
        assert!(layout.labels[0].weekend);
        assert!(!layout.labels[1].weekend);
        assert_eq!(layout.cells.len(), 35);
        assert_eq!(layout.cells.iter().filter(|c| c.today).count(), 1);
        assert!(layout.cells[34].other_month);
    }

    #[test]
    fn empty_container_has_no_layout() {
        let doc = Document::page("day-by-day", 1);
        assert!(MonthLayout::from_container(&doc.root().children()[0]).is_none());
    }

    #[test]
    fn plain_text_rendition() {
        let doc = rendered();
        let text = MonthLayout::from_container(&doc.root().children()[0])
            .unwrap()
            .plain_text();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with('«'));
        assert!(lines[0].ends_with('»'));
        assert!(lines[0].contains("December 2024"));
        assert_eq!(lines[1], "   S   M   T   W   T   F   S");
        assert_eq!(lines[2], "   1   2   3   4   5   6   7");
        assert_eq!(lines[4], "  15  16  17 *18  19  20  21");
        assert_eq!(lines[6], "  29  30  31   1   2   3   4");
    }

    fn layout_titled(title: &str) -> MonthLayout {
        let doc = rendered();
        let mut layout = MonthLayout::from_container(&doc.root().children()[0]).unwrap();
        layout.title = title.to_owned();
        layout
    }

    #[test]
    fn short_title_keeps_grid_width() {
        let layout = layout_titled("May 2025");
        assert_eq!(layout.width(), 28);

        let text = layout.plain_text();
        let header = text.lines().next().unwrap();
        assert_eq!(header.width(), 28);
        assert_eq!(header, "«         May 2025         »");
    }

    #[test]
    fn wide_title_widens_the_pane() {
        // 12 double-width characters plus a space and four digits.
        let layout = layout_titled("十二月十二月十二月十二月 2024");
        assert_eq!(layout.width(), 31);

        let text = layout.plain_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "«十二月十二月十二月十二月 2024»");
        assert_eq!(lines[1], "   S   M   T   W   T   F   S");
    }
}
