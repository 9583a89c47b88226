use chrono::{Datelike, Duration, Locale, Month, Months, NaiveDate, Weekday};
use num_traits::FromPrimitive;

use crate::error::Result;
use crate::locale;

pub const DAYS_PER_WEEK: usize = 7;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// Number of days `date` lies after the most recent `week_start`.
pub fn week_offset(date: NaiveDate, week_start: Weekday) -> u32 {
    (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(
        &format!("{}-01", s.trim()),
        "%Y-%m-%d",
    )?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Previous => "previous",
            Direction::Next => "next",
        }
    }

    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "previous" => Some(Direction::Previous),
            "next" => Some(Direction::Next),
            _ => None,
        }
    }
}

/// The month a widget displays. The day component only matters for
/// navigation, where it is clamped to the length of the target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDate(NaiveDate);

impl ViewDate {
    pub fn new(date: NaiveDate) -> Self {
        ViewDate(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        Month::from_u32(self.0.month()).unwrap_or(Month::January)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0 - Duration::days(self.0.day0() as i64)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day() + Duration::days(days_of_month(&self.month(), self.year()) as i64 - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.0.month()
    }

    /// `None` when the shifted month is outside chrono's date range.
    pub fn shifted(&self, direction: Direction) -> Option<ViewDate> {
        match direction {
            Direction::Previous => self.0.checked_sub_months(Months::new(1)),
            Direction::Next => self.0.checked_add_months(Months::new(1)),
        }
        .map(ViewDate)
    }
}

impl From<NaiveDate> for ViewDate {
    fn from(date: NaiveDate) -> Self {
        ViewDate::new(date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    date: NaiveDate,
    other_month: bool,
    today: bool,
}

impl DayCell {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_num(&self) -> u32 {
        self.date.day()
    }

    pub fn is_other_month(&self) -> bool {
        self.other_month
    }

    pub fn is_today(&self) -> bool {
        self.today
    }

    /// Machine readable `YYYY-M-D`, without zero padding.
    pub fn datetime(&self) -> String {
        format!(
            "{}-{}-{}",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )
    }
}

#[derive(Debug, Clone)]
pub struct MonthGrid {
    view: ViewDate,
    week_start: Weekday,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn new(view: ViewDate, today: NaiveDate, week_start: Weekday) -> Self {
        let first = view.first_day();
        let last = view.last_day();

        let begin = first
            .checked_sub_signed(Duration::days(week_offset(first, week_start) as i64))
            .unwrap_or(NaiveDate::MIN);
        let end = last
            .checked_add_signed(Duration::days(6 - week_offset(last, week_start) as i64))
            .unwrap_or(NaiveDate::MAX);

        let cells = begin
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| DayCell {
                date,
                other_month: !view.contains(date),
                today: date == today,
            })
            .collect();

        MonthGrid {
            view,
            week_start,
            cells,
        }
    }

    pub fn view(&self) -> ViewDate {
        self.view
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn weeks(&self) -> std::slice::Chunks<'_, DayCell> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn leading_offset(&self) -> u32 {
        week_offset(self.view.first_day(), self.week_start)
    }

    pub fn today(&self) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekend,
    Weekday,
}

impl DayKind {
    pub fn class(&self) -> &'static str {
        match self {
            DayKind::Weekend => "weekend",
            DayKind::Weekday => "weekday",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayLabel {
    pub text: String,
    pub kind: DayKind,
}

/// Labels for the seven columns, named after the week that started on the
/// most recent `week_start` before `now`.
///
/// Columns are classified by position only: the first and the last one are
/// weekend columns whatever `week_start` is.
pub fn weekday_row(
    now: NaiveDate,
    week_start: Weekday,
    locale: Locale,
    initials: bool,
) -> Vec<WeekdayLabel> {
    let begin = now
        .checked_sub_signed(Duration::days(week_offset(now, week_start) as i64))
        .unwrap_or(now);

    begin
        .iter_days()
        .take(DAYS_PER_WEEK)
        .enumerate()
        .map(|(idx, date)| {
            let short = locale::weekday_short(date, locale);
            let text = if initials {
                short.chars().next().map(String::from).unwrap_or_default()
            } else {
                short
            };

            WeekdayLabel {
                text,
                kind: if idx % 6 == 0 {
                    DayKind::Weekend
                } else {
                    DayKind::Weekday
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn december_2024() {
        let grid = MonthGrid::new(date(2024, 12, 15).into(), date(2000, 1, 1), Weekday::Sun);

        assert_eq!(grid.cells().first().unwrap().date(), date(2024, 12, 1));
        assert_eq!(grid.cells().last().unwrap().date(), date(2025, 1, 4));
        assert_eq!(grid.cells().len(), 35);
        assert_eq!(grid.leading_offset(), 0);
    }

    #[test]
    fn monday_start_pulls_in_previous_month() {
        let grid = MonthGrid::new(date(2024, 12, 1).into(), date(2000, 1, 1), Weekday::Mon);

        assert_eq!(grid.cells().first().unwrap().date(), date(2024, 11, 25));
        assert_eq!(grid.cells().last().unwrap().date(), date(2025, 1, 5));
        assert_eq!(grid.leading_offset(), 6);
    }

    #[test]
    fn grid_spans_full_weeks() {
        for year in 1999..=2031 {
            for month in 1..=12 {
                for &week_start in WEEKDAYS.iter() {
                    let view = ViewDate::new(date(year, month, 1));
                    let grid = MonthGrid::new(view, date(2000, 1, 1), week_start);
                    let cells = grid.cells();

                    assert_eq!(cells.len() % DAYS_PER_WEEK, 0);
                    assert_eq!(cells[0].date().weekday(), week_start);
                    assert_eq!(cells[cells.len() - 1].date().weekday(), week_start.pred());

                    let days = days_of_month(&view.month(), year);
                    let rows = (days + grid.leading_offset() + 6) / 7;
                    assert_eq!(grid.weeks().count() as u32, rows);
                }
            }
        }
    }

    #[test]
    fn other_month_flags() {
        let view = ViewDate::new(date(2023, 2, 10));
        let grid = MonthGrid::new(view, date(2000, 1, 1), Weekday::Sun);

        for cell in grid.cells() {
            assert_eq!(cell.is_other_month(), cell.date().month() != 2);
        }
        let inside = grid.cells().iter().filter(|c| !c.is_other_month()).count();
        assert_eq!(inside, 28);
    }

    #[test]
    fn today_marked_once_when_visible() {
        let view = ViewDate::new(date(2024, 12, 1));

        let grid = MonthGrid::new(view, date(2024, 12, 24), Weekday::Sun);
        assert_eq!(grid.cells().iter().filter(|c| c.is_today()).count(), 1);
        assert_eq!(grid.today().unwrap().date(), date(2024, 12, 24));

        // trailing day of the next month is still inside the window
        let grid = MonthGrid::new(view, date(2025, 1, 3), Weekday::Sun);
        let today = grid.today().unwrap();
        assert!(today.is_other_month());

        let grid = MonthGrid::new(view, date(2025, 1, 5), Weekday::Sun);
        assert!(grid.today().is_none());
    }

    #[test]
    fn datetime_is_not_padded() {
        let grid = MonthGrid::new(date(2025, 1, 1).into(), date(2000, 1, 1), Weekday::Sun);
        let first_jan = grid.cells().iter().find(|c| !c.is_other_month()).unwrap();
        assert_eq!(first_jan.datetime(), "2025-1-1");
        assert_eq!(grid.cells()[0].datetime(), "2024-12-29");
    }

    #[test]
    fn days_of_month_handles_leap_years() {
        assert_eq!(days_of_month(&Month::February, 2024), 29);
        assert_eq!(days_of_month(&Month::February, 1900), 28);
        assert_eq!(days_of_month(&Month::February, 2000), 29);
        assert_eq!(days_of_month(&Month::April, 2023), 30);
        assert_eq!(days_of_month(&Month::December, 2023), 31);
    }

    #[test]
    fn first_and_last_day() {
        let view = ViewDate::new(date(2024, 2, 17));
        assert_eq!(view.first_day(), date(2024, 2, 1));
        assert_eq!(view.last_day(), date(2024, 2, 29));
    }

    #[test]
    fn navigation_round_trip() {
        for &start in [date(2024, 1, 31), date(2024, 3, 31), date(2023, 12, 15)].iter() {
            let view = ViewDate::new(start);
            let there = view.shifted(Direction::Next).unwrap();
            let back = there.shifted(Direction::Previous).unwrap();

            assert_eq!(back.year(), view.year());
            assert_eq!(back.month(), view.month());
        }
    }

    #[test]
    fn navigation_clamps_day() {
        let view = ViewDate::new(date(2024, 1, 31));
        let feb = view.shifted(Direction::Next).unwrap();
        assert_eq!(feb.date(), date(2024, 2, 29));

        let view = ViewDate::new(date(2024, 1, 15));
        let dec = view.shifted(Direction::Previous).unwrap();
        assert_eq!(dec.date(), date(2023, 12, 15));
    }

    #[test]
    fn navigation_stops_at_range_end() {
        let view = ViewDate::new(NaiveDate::MAX);
        assert!(view.shifted(Direction::Next).is_none());
    }

    #[test]
    fn weekday_row_starts_on_week_start() {
        // 2024-12-04 is a Wednesday
        let row = weekday_row(date(2024, 12, 4), Weekday::Sun, Locale::en_US, false);
        let texts: Vec<_> = row.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);

        let row = weekday_row(date(2024, 12, 4), Weekday::Mon, Locale::en_US, true);
        let texts: Vec<_> = row.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["M", "T", "W", "T", "F", "S", "S"]);
    }

    #[test]
    fn weekday_row_marks_outer_columns_as_weekend() {
        let row = weekday_row(date(2024, 12, 4), Weekday::Sun, Locale::en_US, true);
        let kinds: Vec<_> = row.iter().map(|l| l.kind).collect();

        assert_eq!(kinds[0], DayKind::Weekend);
        assert_eq!(kinds[6], DayKind::Weekend);
        assert!(kinds[1..6].iter().all(|k| *k == DayKind::Weekday));
    }

    #[test]
    fn parse_month_arg() {
        assert_eq!(parse_month("2024-12").unwrap(), date(2024, 12, 1));
        assert_eq!(parse_month(" 1999-7 ").unwrap(), date(1999, 7, 1));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("December").is_err());
    }

    #[test]
    fn direction_actions() {
        assert_eq!(Direction::from_action("next"), Some(Direction::Next));
        assert_eq!(
            Direction::from_action(Direction::Previous.as_str()),
            Some(Direction::Previous)
        );
        assert_eq!(Direction::from_action("today"), None);
    }
}
