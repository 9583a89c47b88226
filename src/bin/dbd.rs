extern crate daybyday as lib;

use chrono::NaiveDate;
use flexi_logger::{FileSpec, Logger};
use lib::config::Config;
use lib::events::Dispatcher;
use lib::grid::parse_month;
use lib::ui::{App, Context, MonthLayout};
use lib::{CalendarWidget, Document};
use nix::sys::{signal, termios};
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "dbd",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Day by day - a month calendar for the terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "m",
        long = "month",
        help = "month to show first (YYYY-MM)",
        parse(try_from_str = parse_month)
    )]
    pub month: Option<NaiveDate>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "html", help = "print the calendar as HTML and exit")]
    pub html: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn mount(config: &Config, month: Option<NaiveDate>) -> (Document, Vec<CalendarWidget>) {
    let mut document = Document::page(&config.marker_class, 1);
    let mut widgets = lib::bootstrap(&mut document, config);

    if let Some(month) = month {
        for widget in widgets.iter_mut() {
            widget.show(month, &mut document);
        }
    }

    (document, widgets)
}

fn run_interactive(
    config: &Config,
    document: Document,
    widgets: Vec<CalendarWidget>,
) -> Result<(), Box<dyn std::error::Error>> {
    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("Day by day ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);

    let dispatcher = Dispatcher::from_config(config, signals_to_wait);

    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(Context::new(document, widgets));

    app.run(dispatcher, term)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let (document, widgets) = mount(&config, args.month);

    if args.html {
        println!("{}", document);
        return Ok(());
    }

    if args.show {
        for widget in &widgets {
            if let Some(layout) = document
                .element(widget.container())
                .and_then(MonthLayout::from_container)
            {
                print!("{}", layout.plain_text());
            }
        }
        return Ok(());
    }

    run_interactive(&config, document, widgets)
}
