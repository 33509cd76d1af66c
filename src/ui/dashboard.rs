use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::game::Suggestion;

use super::ResultTone;

pub struct StatusBar<'a> {
    pub ticker: Option<&'a str>,
    pub date: Option<String>,
    pub score: u32,
    pub model_score: Option<u32>,
    pub loading: bool,
    pub ended: bool,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let state = if self.loading {
            Span::styled(
                " LOADING ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else if self.ended {
            Span::styled(" GAME OVER ", Style::default().fg(Color::Red))
        } else if self.ticker.is_some() {
            Span::styled(" IN ROUND ", Style::default().fg(Color::Green))
        } else {
            Span::styled(" IDLE ", Style::default().fg(Color::DarkGray))
        };

        let mut spans = vec![
            Span::styled(
                " ticker-guess ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(self.ticker.unwrap_or("—"), Style::default().fg(Color::Cyan)),
            sep(),
            Span::styled(
                self.date.unwrap_or_else(|| "—".to_string()),
                Style::default().fg(Color::White),
            ),
            sep(),
            Span::styled(
                format!("score: {}", self.score),
                Style::default().fg(Color::White),
            ),
        ];
        if let Some(model) = self.model_score {
            spans.push(sep());
            spans.push(Span::styled(
                format!("model: {}", model),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(sep());
        spans.push(state);

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

pub struct TickerForm<'a> {
    pub input: &'a str,
    pub focused: bool,
    pub loading: bool,
    pub error: &'a str,
    pub note: &'a str,
}

impl Widget for TickerForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cursor = if self.focused && !self.loading { "_" } else { "" };
        let border = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("Ticker: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{}{}", self.input, cursor),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(self.error, Style::default().fg(Color::Red))),
            Line::from(Span::styled(self.note, Style::default().fg(Color::DarkGray))),
        ];

        let block = Block::default()
            .title(" Ticker ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct RoundPanel<'a> {
    pub result: &'a str,
    pub tone: ResultTone,
    pub suggestion: Option<Suggestion>,
    pub sma: Option<f64>,
    pub guesses: usize,
}

impl Widget for RoundPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let result_color = match self.tone {
            ResultTone::Win => Color::Green,
            ResultTone::Lose => Color::Red,
            ResultTone::Neutral => Color::White,
        };

        let mut lines = vec![
            Line::from(Span::styled(self.result, Style::default().fg(result_color))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Rounds: ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{}", self.guesses), Style::default().fg(Color::White)),
            ]),
        ];
        if let Some(suggestion) = self.suggestion {
            let sma_str = self
                .sma
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "---".to_string());
            lines.push(Line::from(vec![
                Span::styled("Model:  ", Style::default().fg(Color::DarkGray)),
                Span::styled(suggestion.to_string(), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("SMA:    ", Style::default().fg(Color::DarkGray)),
                Span::styled(sma_str, Style::default().fg(Color::White)),
            ]));
        }

        let block = Block::default()
            .title(" Round ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = block.inner(area).height as usize;

        let start = self.messages.len().saturating_sub(inner_height);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|m| {
                let color = if m.starts_with("[ERR]") {
                    Color::Red
                } else {
                    Color::DarkGray
                };
                Line::from(Span::styled(m.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar {
    pub typing: bool,
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Yellow);
        let text = Style::default().fg(Color::DarkGray);
        let line = if self.typing {
            Line::from(vec![
                Span::styled(" [Enter]", key),
                Span::styled(" start  ", text),
                Span::styled("[Esc]", key),
                Span::styled(" back to game  ", text),
            ])
        } else {
            Line::from(vec![
                Span::styled(" [↑]", key),
                Span::styled(" up  ", text),
                Span::styled("[↓]", key),
                Span::styled(" down  ", text),
                Span::styled("[E]", key),
                Span::styled("nd  ", text),
                Span::styled("[R]", key),
                Span::styled("estart  ", text),
                Span::styled("[Tab]", key),
                Span::styled(" ticker  ", text),
                Span::styled("[Q]", key),
                Span::styled("uit", text),
            ])
        };

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
