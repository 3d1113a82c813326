use std::collections::VecDeque;

use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Sparkline, Wrap};
use ratatui::Frame;

use crate::view::{ScoreView, APR_FOOTER};

pub struct UiState {
    pub view: ScoreView,
    pub score_series: Vec<u64>,
    pub logs: VecDeque<String>,
    pub max_logs: usize,
}

impl UiState {
    pub fn new(view: ScoreView) -> Self {
        Self {
            view,
            score_series: Vec::new(),
            logs: VecDeque::new(),
            max_logs: 8,
        }
    }

    pub fn set_view(&mut self, view: ScoreView, score_series: Vec<u64>) {
        self.view = view;
        self.score_series = score_series;
    }

    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }
}

pub fn draw_ui(frame: &mut Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Min(5),
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], &state.view);
    draw_score(frame, chunks[1], state);
    draw_metrics(frame, chunks[2], &state.view);
    draw_commands(frame, chunks[3], &state.view);
    draw_logs(frame, chunks[4], state);
}

fn inner(area: Rect) -> Rect {
    area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    })
}

fn draw_header(frame: &mut Frame, area: Rect, view: &ScoreView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("NayaFlow AI-Powered Scoring");
    let status = if view.live {
        Span::styled("Live", Style::default().fg(Color::Green))
    } else {
        Span::styled("Idle", Style::default().fg(Color::DarkGray))
    };
    let line = Line::from(vec![
        status,
        Span::raw(format!(" | tick {}", view.tick)),
        Span::raw(" | q to exit"),
    ]);
    let text = Paragraph::new(line).wrap(Wrap { trim: true });
    frame.render_widget(block, area);
    frame.render_widget(text, inner(area));
}

fn draw_score(frame: &mut Frame, area: Rect, state: &UiState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(10)])
        .split(area);

    let view = &state.view;
    let mut score_line = vec![Span::styled(
        format!("{}", view.score),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(delta) = view.delta_text() {
        let color = match view.delta {
            Some(d) if d < 0 => Color::Red,
            _ => Color::Green,
        };
        score_line.push(Span::styled(format!("  {delta}"), Style::default().fg(color)));
    }
    let lines = vec![
        Line::from(score_line),
        Line::from(Span::styled(
            view.caption,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default().borders(Borders::ALL).title("Score");
    frame.render_widget(block, columns[0]);
    frame.render_widget(Paragraph::new(lines), inner(columns[0]));

    let sparkline = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("Recent Scores"))
        .data(&state.score_series)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(sparkline, columns[1]);
}

fn draw_metrics(frame: &mut Frame, area: Rect, view: &ScoreView) {
    let block = Block::default().borders(Borders::ALL).title("Sub-metrics");
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); view.bars.len()])
        .split(inner(area));

    for (bar, row) in view.bars.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(bar.label))
            .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
            .percent(bar.percent)
            .label(format!("{}%", bar.percent));
        frame.render_widget(gauge, *row);
    }
}

fn draw_commands(frame: &mut Frame, area: Rect, view: &ScoreView) {
    let lines = vec![
        Line::from(vec![
            Span::styled("l/space", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {}", view.toggle_label)),
        ]),
        Line::from(vec![
            Span::styled("s", Style::default().fg(Color::Yellow)),
            Span::raw("      Quick Scan"),
        ]),
        Line::from(vec![
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::raw("      Reset"),
        ]),
        Line::from(vec![
            Span::styled(".", Style::default().fg(Color::Yellow)),
            Span::raw("      Single Step"),
        ]),
        Line::from(vec![
            Span::styled("q/Esc", Style::default().fg(Color::Yellow)),
            Span::raw("  Quit"),
        ]),
        Line::from(Span::styled(APR_FOOTER, Style::default().fg(Color::DarkGray))),
    ];
    let block = Block::default().borders(Borders::ALL).title("Commands");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner(area));
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::raw(entry)))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner(area));
}
