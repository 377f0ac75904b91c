use std::time::Instant;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState};
use crate::session::{RenderModel, WordState};

const HORIZONTAL_MARGIN: u16 = 5;

/// How many already-judged words stay visible behind the cursor.
const PRIOR_WINDOW: usize = 8;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Help => render_help(area, buf),
            AppState::Results => match self.session.result() {
                Some(_) => render_results(self, area, buf),
                None => render_typing(self, area, buf),
            },
            AppState::Typing => render_typing(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let now = Instant::now();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold = Style::default().patch(bold).add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(8) / 2),
                Constraint::Length(1), // header
                Constraint::Length(1),
                Constraint::Length(3), // word stream
                Constraint::Length(1),
                Constraint::Length(1), // input field
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let header = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {:.0}% acc   {}s left",
            app.session.wpm(now),
            app.session.accuracy(),
            app.session.remaining_secs(now),
        ),
        bold,
    ))
    .alignment(Alignment::Center);
    header.render(chunks[1], buf);

    let max_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2) as usize;
    let spans = stream_spans(&app.session.snapshot(), max_width);
    let stream = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    stream.render(chunks[3], buf);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", dim_bold),
        Span::styled(app.input.clone(), bold),
        Span::styled("█", dim_bold),
    ]));
    input.render(chunks[5], buf);
}

/// Builds the colored span row for the visible slice of the stream:
/// a short window of judged words, the current word, and as many
/// upcoming words as fit in roughly three wrapped lines.
fn stream_spans(view: &RenderModel<'_>, max_width: usize) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green_bold = Style::default().patch(bold).fg(Color::Green);
    let red_bold = Style::default().patch(bold).fg(Color::Red);
    let dim_bold = Style::default().patch(bold).add_modifier(Modifier::DIM);
    let underlined_bold = Style::default().patch(bold).add_modifier(Modifier::UNDERLINED);

    let prior_start = view.prior.len().saturating_sub(PRIOR_WINDOW);
    let mut spans: Vec<Span> = view.prior[prior_start..]
        .iter()
        .map(|slot| {
            let style = match slot.state {
                WordState::Correct => green_bold,
                WordState::Incorrect => red_bold,
                // Judged slice should only hold judged slots
                WordState::Pending | WordState::Current => dim_bold,
            };
            Span::styled(slot.text.clone(), style)
        })
        .collect();

    if let Some(current) = view.current {
        spans.push(Span::styled(current.text.clone(), underlined_bold));
    }

    let mut budget = max_width.saturating_mul(3);
    for slot in view.upcoming {
        let width = slot.text.width() + 1;
        if width > budget {
            break;
        }
        budget -= width;
        spans.push(Span::styled(slot.text.clone(), dim_bold));
    }

    Itertools::intersperse(spans.into_iter(), Span::raw(" ")).collect()
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let magenta = Style::default().fg(Color::Magenta);

    let Some(result) = app.session.result() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(10) / 2),
                Constraint::Length(1), // headline stats
                Constraint::Length(1), // word counts
                Constraint::Length(1),
                Constraint::Length(3), // performance graph
                Constraint::Length(1),
                Constraint::Length(1), // percentile
                Constraint::Length(1),
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled(
        format!("{} wpm   {:.0}% acc", result.wpm, result.accuracy),
        bold,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} correct   {} incorrect   {} keystrokes",
            result.correct_words, result.incorrect_words, result.total_keystrokes
        ),
        bold,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let graph_lines: Vec<Line> = result
        .graph
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), magenta)))
        .collect();
    Paragraph::new(graph_lines)
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        format!("estimated percentile: {:.0}", result.percentile),
        bold,
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);

    Paragraph::new(Span::styled("(r)estart   (esc)ape", italic))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let lines = [
        "Typing Test Help",
        "",
        "- Type the underlined word in the input field",
        "- Press space to submit the word and move to the next one",
        "- Correct words turn green, incorrect words turn red",
        "- Your wpm and the remaining time are shown at the top",
        "- Press ctrl+h to toggle this help screen",
        "- Press esc to quit",
        "",
        "Press any key to close this help screen",
    ];

    let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
