use chrono::format::{DelayedFormat, StrftimeItems};
use chrono::{Datelike, Locale, NaiveDate};
use pure_rust_locales::locale_match;
use std::convert::TryFrom;
use std::env;

use crate::error::{Error, ErrorKind, Result};

const LOCALE_ENV_VARS: &[&str] = &["LC_ALL", "LC_TIME", "LANG"];

/// Parses names like `de_DE`, `de_DE.UTF-8` or `sr_RS@latin`.
///
/// Codeset suffixes are dropped. A `@modifier` is first tried as part of the
/// name and dropped if that is unknown.
pub fn parse_locale(name: &str) -> Result<Locale> {
    let (base, modifier) = match name.split_once('@') {
        Some((base, modifier)) => (base, Some(modifier)),
        None => (name, None),
    };

    let base = base.split('.').next().unwrap_or(base).trim();

    if base.is_empty() {
        return Err(Error::new(ErrorKind::LocaleParse, name));
    }

    if let Some(modifier) = modifier {
        if let Ok(locale) = Locale::try_from(format!("{}@{}", base, modifier).as_str()) {
            return Ok(locale);
        }
    }

    match base {
        "C" | "POSIX" => Ok(Locale::POSIX),
        _ => Locale::try_from(base).map_err(|_| Error::new(ErrorKind::LocaleParse, name)),
    }
}

/// Picks the configured locale if usable, then the environment, then `POSIX`.
pub fn resolve(configured: Option<&str>) -> Locale {
    let from_env = LOCALE_ENV_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .filter(|value| !value.is_empty());

    for name in configured.map(str::to_owned).into_iter().chain(from_env) {
        match parse_locale(&name) {
            Ok(locale) => {
                log::debug!("Using locale '{}'", name);
                return locale;
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    Locale::POSIX
}

fn format_localized(date: NaiveDate, fmt: &str, locale: Locale) -> String {
    let items = StrftimeItems::new_with_locale(fmt, locale);
    DelayedFormat::new_with_locale(Some(date), None, items, locale).to_string()
}

/// Stand-alone (nominative) month name.
///
/// `%B` gives the form used inside a date, which is genitive in languages
/// like Russian or Polish ("декабря" instead of "Декабрь"). Locales without
/// separate stand-alone names fall back to the regular ones.
pub fn month_name(date: NaiveDate, locale: Locale) -> String {
    let names = locale_match!(locale => LC_TIME::ALT_MON)
        .unwrap_or_else(|| locale_match!(locale => LC_TIME::MON));

    match names.get(date.month0() as usize) {
        Some(name) => (*name).to_owned(),
        None => format_localized(date, "%B", locale),
    }
}

pub fn weekday_short(date: NaiveDate, locale: Locale) -> String {
    format_localized(date, "%a", locale)
}
