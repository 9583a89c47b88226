use chrono::{Local, Locale, NaiveDate, Weekday};

use crate::config::Config;
use crate::document::Document;
use crate::grid::{self, Direction, MonthGrid, ViewDate};
use crate::locale;
use crate::markup::{Element, NodePath};

pub const ACTION_ATTR: &str = "data-action";

pub fn arrow_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Previous => "left-arrow",
        Direction::Next => "right-arrow",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub locale: Locale,
    pub week_start: Weekday,
    pub weekday_initials: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            locale: Locale::POSIX,
            week_start: Weekday::Sun,
            weekday_initials: true,
        }
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Settings {
            locale: locale::resolve(config.locale.as_deref()),
            week_start: config.week_start,
            weekday_initials: config.weekday_initials,
        }
    }
}

/// A month calendar bound to one container of a [`Document`].
///
/// The widget owns the container's children: every render drops them and
/// builds a fresh subtree.
#[derive(Debug, Clone)]
pub struct CalendarWidget {
    container: NodePath,
    view: ViewDate,
    today: NaiveDate,
    settings: Settings,
}

impl CalendarWidget {
    pub fn initialize(container: NodePath, document: &mut Document, settings: Settings) -> Self {
        Self::initialize_at(container, document, settings, Local::now().date_naive())
    }

    pub fn initialize_at(
        container: NodePath,
        document: &mut Document,
        settings: Settings,
        today: NaiveDate,
    ) -> Self {
        let widget = CalendarWidget {
            container,
            view: ViewDate::new(today),
            today,
            settings,
        };
        widget.render(document);
        widget
    }

    pub fn container(&self) -> &NodePath {
        &self.container
    }

    pub fn view(&self) -> ViewDate {
        self.view
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.view, self.today, self.settings.week_start)
    }

    /// Displays the month containing `date`.
    pub fn show(&mut self, date: NaiveDate, document: &mut Document) {
        self.view = ViewDate::new(date);
        self.render(document);
    }

    /// Moves both today and the view to `today`, rendering once.
    pub fn reset(&mut self, today: NaiveDate, document: &mut Document) {
        self.today = today;
        self.view = ViewDate::new(today);
        self.render(document);
    }

    pub fn render(&self, document: &mut Document) {
        let container = match document.element_mut(&self.container) {
            Some(container) => container,
            None => {
                log::debug!("Container {:?} is gone, skipping render", self.container);
                return;
            }
        };

        container.clear();
        container.append(self.make_header());
        container.append(Self::make_arrow(Direction::Previous));
        container.append(self.make_calendar());
        container.append(Self::make_arrow(Direction::Next));
    }

    fn make_header(&self) -> Element {
        let month_name = locale::month_name(self.view.date(), self.settings.locale);

        Element::new("h1")
            .class("month-name")
            .text(&format!("{} {}", month_name, self.view.year()))
    }

    fn make_arrow(direction: Direction) -> Element {
        let symbol = match direction {
            Direction::Previous => "«",
            Direction::Next => "»",
        };

        Element::new("div").class("arrow").child(
            Element::new("button")
                .class(arrow_class(direction))
                .attr(ACTION_ATTR, direction.as_str())
                .text(symbol),
        )
    }

    fn make_calendar(&self) -> Element {
        Element::new("div")
            .class("calendar")
            .child(self.build_weekday_row())
            .child(self.build_date_grid())
    }

    pub fn build_weekday_row(&self) -> Element {
        grid::weekday_row(
            self.today,
            self.settings.week_start,
            self.settings.locale,
            self.settings.weekday_initials,
        )
        .into_iter()
        .fold(Element::new("div").class("day-of-week"), |row, label| {
            row.child(Element::new("div").class(label.kind.class()).text(&label.text))
        })
    }

    pub fn build_date_grid(&self) -> Element {
        self.grid()
            .cells()
            .iter()
            .fold(Element::new("div").class("date-grid"), |grid, cell| {
                let mut button = Element::new("button");
                if cell.is_other_month() {
                    button.add_class("other-month");
                }
                if cell.is_today() {
                    button.add_class("today");
                }

                grid.child(
                    button.child(
                        Element::new("time")
                            .attr("datetime", &cell.datetime())
                            .text(&cell.day_num().to_string()),
                    ),
                )
            })
    }

    pub fn navigate(&mut self, direction: Direction, document: &mut Document) {
        match self.view.shifted(direction) {
            Some(view) => {
                self.view = view;
                self.render(document);
            }
            None => log::warn!(
                "Cannot go to {} month of {}-{}",
                direction.as_str(),
                self.view.year(),
                self.view.month().number_from_month()
            ),
        }
    }

    /// Handles a click on `target`. Returns whether it hit one of this
    /// widget's arrows.
    pub fn click(&mut self, target: &NodePath, document: &mut Document) -> bool {
        let direction = match self.container.relative(target) {
            Some(relative) => document
                .element(&self.container)
                .and_then(|container| action_on_path(container, &relative)),
            None => None,
        };

        match direction {
            Some(direction) => {
                self.navigate(direction, document);
                true
            }
            None => false,
        }
    }

    /// Sets the current date. Re-renders only if the date changed.
    pub fn update(&mut self, today: NaiveDate, document: &mut Document) -> bool {
        if today == self.today {
            return false;
        }

        self.today = today;
        self.render(document);
        true
    }
}

/// The innermost action along `path`, so clicks on content nested inside a
/// control still reach it.
fn action_on_path(container: &Element, path: &NodePath) -> Option<Direction> {
    let mut elem = container;
    let mut action = None;

    for &idx in path.indices() {
        elem = elem.children().get(idx)?;
        if let Some(direction) = elem.get_attr(ACTION_ATTR).and_then(Direction::from_action) {
            action = Some(direction);
        }
    }

    action
}
