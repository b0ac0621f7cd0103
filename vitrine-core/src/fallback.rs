//! Locally drawn frames: the placeholder dashboard and the closing notice.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X13, FONT_9X15, FONT_9X18_BOLD, FONT_10X20};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text};
use jiff::Zoned;
use vitrine_common::Frame;

const CLOSED_MESSAGE: &str = "vitrine is closed, come back later...";

/// Produces the frames that never depend on the network.
///
/// Rendering draws onto a [`Frame`], which cannot fail, so this is the
/// guaranteed-success path of every cycle.
pub struct FallbackRenderer;

impl FallbackRenderer {
    /// The placeholder dashboard: title, clock, and the empty widget grid
    /// the portal would normally fill.
    pub fn render(&self, width: u32, height: u32) -> Frame {
        let mut frame = Frame::white(width, height);
        let w = width as i32;

        let ink = BinaryColor::On;
        let title_style = MonoTextStyle::new(&FONT_9X18_BOLD, ink);
        let clock_style = MonoTextStyle::new(&FONT_10X20, ink);
        let text_style = MonoTextStyle::new(&FONT_9X15, ink);
        let small_style = MonoTextStyle::new(&FONT_6X13, ink);
        let stroke = PrimitiveStyle::with_stroke(ink, 1);

        let now = Zoned::now();
        let time = format!("{}", now.strftime("%H:%M:%S"));
        let date = format!("{}", now.strftime("%A, %B %d"));

        let _ = Text::with_baseline(
            "Vitrine.io Dashboard",
            Point::new(10, 2),
            title_style,
            Baseline::Top,
        )
        .draw(&mut frame);
        let _ =
            Text::with_baseline(&time, Point::new(10, 30), clock_style, Baseline::Top).draw(&mut frame);
        let _ =
            Text::with_baseline(&date, Point::new(10, 70), text_style, Baseline::Top).draw(&mut frame);
        let _ = Line::new(Point::new(10, 110), Point::new(w - 10, 110))
            .into_styled(stroke)
            .draw(&mut frame);

        // Empty widget grid, mirroring the portal's own placeholder layout.
        let y = 120;
        let pad = 10;
        let boxes = [
            (pad, y, w / 2 - pad, y + 100),
            (w / 2 + pad, y, w - pad, y + 100),
            (pad, y + 110, w / 2 - pad, y + 200),
            (w / 2 + pad, y + 110, w - pad, y + 200),
        ];
        let labels: [&[&str]; 4] = [
            &["Time & Date", &time, &date],
            &["Weather", "Configure API key", "to see weather"],
            &["Calendar", "Configure Google", "Calendar API"],
            &["News", "Configure RSS", "feed URL"],
        ];
        for ((left, top, right, bottom), lines) in boxes.into_iter().zip(labels) {
            let _ = Rectangle::with_corners(Point::new(left, top), Point::new(right, bottom))
                .into_styled(stroke)
                .draw(&mut frame);
            for (row, line) in lines.iter().copied().enumerate() {
                let _ = Text::with_baseline(
                    line,
                    Point::new(left + 5, top + 5 + 22 * row as i32),
                    small_style,
                    Baseline::Top,
                )
                .draw(&mut frame);
            }
        }

        frame
    }

    /// The final frame of the process lifetime.
    pub fn render_closed(&self, width: u32, height: u32) -> Frame {
        let mut frame = Frame::white(width, height);
        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let center = Point::new(width as i32 / 2, height as i32 / 2);
        let _ = Text::with_alignment(CLOSED_MESSAGE, center, style, Alignment::Center)
            .draw(&mut frame);
        frame
    }
}
