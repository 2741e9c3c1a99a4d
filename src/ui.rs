use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::App,
    metrics::{self, Outcome},
    session::Session,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const PLACEHOLDER: &str = "Start typing here...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccuracyGrade {
    Good,
    Fair,
    Poor,
}

impl AccuracyGrade {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            AccuracyGrade::Good
        } else if accuracy >= 80.0 {
            AccuracyGrade::Fair
        } else {
            AccuracyGrade::Poor
        }
    }

    fn color(self) -> Color {
        match self {
            AccuracyGrade::Good => Color::Green,
            AccuracyGrade::Fair => Color::Cyan,
            AccuracyGrade::Poor => Color::Red,
        }
    }
}

/// Labels and formatted values for the stats panel
#[derive(Clone, Debug, PartialEq)]
pub struct StatsView {
    pub time_label: &'static str,
    pub wpm_label: &'static str,
    pub accuracy_label: &'static str,
    pub elapsed: String,
    pub wpm: String,
    pub accuracy: String,
    pub grade: AccuracyGrade,
}

impl StatsView {
    pub fn from_session(session: &Session) -> Self {
        let m = session.metrics();
        let is_final = session.is_complete();

        Self {
            time_label: if is_final { "Total Time" } else { "Elapsed" },
            wpm_label: if is_final { "Final WPM" } else { "WPM" },
            accuracy_label: if is_final { "Final Accuracy" } else { "Accuracy" },
            elapsed: format!("{:.1}s", m.elapsed.as_secs_f64()),
            wpm: format!("{:.1}", m.wpm),
            accuracy: format!("{:.1}%", m.accuracy),
            grade: AccuracyGrade::from_accuracy(m.accuracy),
        }
    }
}

/// Rows `paragraph` takes once word-wrapped to `width` columns
fn wrapped_height(paragraph: &Paragraph, width: u16) -> u16 {
    let lines = paragraph.line_count(width).max(1);
    u16::try_from(lines).unwrap_or(u16::MAX)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let target = session.target().as_str();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default()
            .patch(bold_style)
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let caret_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);

        let spans = metrics::char_marks(session.typed(), target, session.is_complete())
            .into_iter()
            .map(|mark| {
                let style = match (mark.outcome, mark.caret) {
                    (_, true) => caret_style,
                    (Outcome::Correct, _) => green_bold_style,
                    (Outcome::Incorrect, _) => red_bold_style,
                    (Outcome::Pending, _) => dim_bold_style,
                };
                let symbol = match mark.expected {
                    Some(c) => c.to_string(),
                    None => "·".to_string(),
                };
                Span::styled(symbol, style)
            })
            .collect::<Vec<Span>>();

        // measured after wrapping, overflow marks included
        let sentence = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false });
        let sentence_lines = wrapped_height(&sentence, inner_width);

        let input_title = if session.is_complete() {
            " input (done) "
        } else {
            " input "
        };
        let input_text = if session.typed().is_empty() && !session.is_complete() {
            Span::styled(PLACEHOLDER, dim_bold_style.patch(italic_style))
        } else {
            Span::raw(session.typed())
        };
        let input = Paragraph::new(input_text).wrap(Wrap { trim: false });
        // plus top and bottom border
        let input_lines = wrapped_height(&input, inner_width.saturating_sub(2)) + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),              // title
                Constraint::Length(2),              // subtitle
                Constraint::Length(sentence_lines), // target sentence
                Constraint::Length(1),              // padding
                Constraint::Length(input_lines),    // input box
                Constraint::Length(1),              // padding
                Constraint::Length(2),              // stats
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled("typespeed", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            "Type the sentence below as quickly and accurately as you can.",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

        sentence
            .alignment(if sentence_lines == 1 {
                // fits on one line: center it
                Alignment::Center
            } else {
                Alignment::Left
            })
            .render(chunks[2], buf);

        input
            .block(Block::default().borders(Borders::ALL).title(input_title))
            .render(chunks[4], buf);

        render_stats(&StatsView::from_session(session), chunks[6], buf);

        let legend = if session.is_complete() {
            "(r)etry / (n)ew sentence / (esc)ape"
        } else {
            "(←) reset / (→) try another / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[8], buf);
    }
}

fn render_stats(view: &StatsView, area: Rect, buf: &mut Buffer) {
    let label_style = Style::default().add_modifier(Modifier::DIM);
    let value_style = Style::default().add_modifier(Modifier::BOLD);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let cells = [
        (view.time_label, &view.elapsed, value_style.fg(Color::Blue)),
        (view.wpm_label, &view.wpm, value_style.fg(Color::Green)),
        (
            view.accuracy_label,
            &view.accuracy,
            value_style.fg(view.grade.color()),
        ),
    ];

    for ((label, value, style), column) in cells.into_iter().zip(columns.iter()) {
        Paragraph::new(vec![
            Line::from(Span::styled(label, label_style)),
            Line::from(Span::styled(value.as_str(), style)),
        ])
        .alignment(Alignment::Center)
        .render(*column, buf);
    }
}
