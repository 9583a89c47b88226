use crate::events::{Dispatcher, Event};
use crate::grid::Direction;

use super::{Context, MonthPane};

use unsegen::base::{GraphemeCluster, Terminal};
use unsegen::input::{Key, OperationResult, ScrollBehavior, Scrollable};
use unsegen::widget::*;

const HELP_LINE: &str = "h/\u{2190} previous  l/\u{2192} next  t today  q quit";

pub struct App {
    context: Context,
}

impl App {
    pub fn new(context: Context) -> App {
        App { context }
    }

    fn bottom_bar(&self) -> impl Widget {
        let spacer = " ".with_demand(|_| Demand2D {
            width: ColDemand::exact(1),
            height: RowDemand::exact(1),
        });

        HLayout::new()
            .separator(GraphemeCluster::space())
            .widget(spacer)
            .widget(HELP_LINE)
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        let mut months = HLayout::new().separator(GraphemeCluster::space());
        for widget in self.context.widgets() {
            months = months.widget(MonthPane::new(
                self.context.document().element(widget.container()),
                self.context.theme(),
            ));
        }

        VLayout::new().widget(months).widget(self.bottom_bar())
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut run = true;

        while run {
            // Handle events
            if let Ok(event) = dispatcher.next() {
                match event {
                    Event::Update => self.context.update(),
                    Event::Resize => log::debug!("Terminal resized"),
                    Event::Input(input) => {
                        input
                            .chain((Key::Char('q'), || run = false))
                            .chain((Key::Char('t'), || self.context.jump_to_today()))
                            .chain(
                                ScrollBehavior::new(&mut MonthBehaviour(&mut self.context))
                                    .backwards_on(Key::Char('h'))
                                    .backwards_on(Key::Left)
                                    .forwards_on(Key::Char('l'))
                                    .forwards_on(Key::Right),
                            )
                            .finish();
                    }
                }
            } else {
                log::warn!("Event channel closed");
                break;
            }

            // Draw
            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();
        }

        Ok(())
    }
}

/// Maps scrolling onto the arrow controls of the calendar.
struct MonthBehaviour<'a>(&'a mut Context);

impl Scrollable for MonthBehaviour<'_> {
    fn scroll_backwards(&mut self) -> OperationResult {
        if self.0.press(Direction::Previous) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn scroll_forwards(&mut self) -> OperationResult {
        if self.0.press(Direction::Next) {
            Ok(())
        } else {
            Err(())
        }
    }
}
