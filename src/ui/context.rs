use chrono::{Local, NaiveDate};

use crate::document::Document;
use crate::grid::Direction;
use crate::markup::NodePath;
use crate::widget::{arrow_class, CalendarWidget};

use unsegen::base::style::*;

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub day_text_style: TextFormatModifier,
    pub other_month_day_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub today_day_text_style: TextFormatModifier,
    pub today_day_char: Option<char>,
    pub weekday_label_style: StyleModifier,
    pub weekend_label_style: StyleModifier,
    pub arrow_style: StyleModifier,
    pub month_header_style: StyleModifier,
    pub month_header_text_style: TextFormatModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            day_text_style: TextFormatModifier::default(),
            other_month_day_style: StyleModifier::default().fg_color(Color::LightBlack),
            today_day_style: StyleModifier::default().invert(true),
            today_day_text_style: TextFormatModifier::default().italic(true),
            today_day_char: Some('*'),
            weekday_label_style: StyleModifier::default(),
            weekend_label_style: StyleModifier::default().fg_color(Color::LightRed),
            arrow_style: StyleModifier::default().fg_color(Color::Cyan),
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            month_header_text_style: TextFormatModifier::default().bold(true),
        }
    }
}

/// Everything the terminal frontend draws from and acts on.
pub struct Context {
    document: Document,
    widgets: Vec<CalendarWidget>,
    theme: Theme,
}

impl Context {
    pub fn new(document: Document, widgets: Vec<CalendarWidget>) -> Self {
        Context {
            document,
            widgets,
            theme: Theme::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn widgets(&self) -> &[CalendarWidget] {
        &self.widgets
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn update(&mut self) {
        self.update_to(Local::now().date_naive());
    }

    pub fn update_to(&mut self, today: NaiveDate) {
        for widget in self.widgets.iter_mut() {
            if widget.update(today, &mut self.document) {
                log::debug!("Date changed to {}", today);
            }
        }
    }

    /// Activates the arrow control for `direction` in every widget, the same
    /// way a click on it would.
    pub fn press(&mut self, direction: Direction) -> bool {
        let document = &self.document;
        let targets: Vec<NodePath> = self
            .widgets
            .iter()
            .filter_map(|widget| {
                let container = document.element(widget.container())?;
                let arrow = container
                    .find_by_class(arrow_class(direction))
                    .into_iter()
                    .next()?;
                Some(widget.container().join(&arrow))
            })
            .collect();

        let mut hit = false;
        for target in targets {
            hit |= self.document.click(&mut self.widgets, &target);
        }
        hit
    }

    pub fn jump_to_today(&mut self) {
        self.jump_to(Local::now().date_naive());
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        for widget in self.widgets.iter_mut() {
            widget.reset(date, &mut self.document);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::bootstrap_at;
    use crate::widget::Settings;
    use chrono::{Datelike, Locale};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context() -> Context {
        let mut doc = Document::page("day-by-day", 1);
        let settings = Settings {
            locale: Locale::en_US,
            ..Settings::default()
        };
        let widgets = bootstrap_at(&mut doc, "day-by-day", settings, date(2024, 12, 18));
        Context::new(doc, widgets)
    }

    #[test]
    fn press_goes_through_arrows() {
        let mut ctx = context();

        assert!(ctx.press(Direction::Next));
        assert_eq!(ctx.widgets()[0].view().date().month(), 1);
        assert!(ctx.press(Direction::Previous));
        assert!(ctx.press(Direction::Previous));
        assert_eq!(ctx.widgets()[0].view().date().month(), 11);
    }

    #[test]
    fn press_without_widgets() {
        let mut ctx = Context::new(Document::page("day-by-day", 0), Vec::new());
        assert!(!ctx.press(Direction::Next));
    }

    #[test]
    fn jump_back_to_today() {
        let mut ctx = context();
        ctx.press(Direction::Next);
        ctx.press(Direction::Next);

        ctx.jump_to(date(2025, 6, 2));
        let widget = &ctx.widgets()[0];
        assert_eq!(widget.view().date(), date(2025, 6, 2));
        assert_eq!(widget.today(), date(2025, 6, 2));

        let grid = widget.grid();
        assert_eq!(grid.today().unwrap().date(), date(2025, 6, 2));
        let title = ctx.document().find_by_class("month-name");
        assert_eq!(title.len(), 1);
    }

    #[test]
    fn update_moves_today_marker() {
        let mut ctx = context();
        ctx.update_to(date(2024, 12, 19));

        let grid = ctx.widgets()[0].grid();
        assert_eq!(grid.today().unwrap().date(), date(2024, 12, 19));
    }
}
