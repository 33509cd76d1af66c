use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

/// Receiver for the price line shown to the player.
pub trait ChartSink {
    /// Replace everything with an initial window.
    fn init_chart(&mut self, labels: Vec<NaiveDate>, values: Vec<f64>);
    fn append_point(&mut self, date: NaiveDate, value: f64);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    labels: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl PriceHistory {
    pub fn labels(&self) -> &[NaiveDate] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.values.clear();
    }
}

impl ChartSink for PriceHistory {
    fn init_chart(&mut self, labels: Vec<NaiveDate>, values: Vec<f64>) {
        let n = labels.len().min(values.len());
        self.labels = labels;
        self.values = values;
        self.labels.truncate(n);
        self.values.truncate(n);
    }

    fn append_point(&mut self, date: NaiveDate, value: f64) {
        self.labels.push(date);
        self.values.push(value);
    }
}

pub struct PriceChart<'a> {
    history: &'a PriceHistory,
    title: String,
    sma: Option<f64>,
}

impl<'a> PriceChart<'a> {
    pub fn new(history: &'a PriceHistory, ticker: Option<&str>) -> Self {
        let title = match ticker {
            Some(t) => format!(" Close ({}) ", t),
            None => " Close ".to_string(),
        };
        Self {
            history,
            title,
            sma: None,
        }
    }

    pub fn sma(mut self, val: Option<f64>) -> Self {
        self.sma = val;
        self
    }
}

fn row_for(price: f64, min_price: f64, range: f64, chart_height: usize) -> usize {
    let normalized = (price - min_price) / range;
    let scaled = ((normalized * (chart_height - 1) as f64) as usize).min(chart_height - 1);
    chart_height - 1 - scaled
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 12 {
            return;
        }
        if self.history.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                "Enter a ticker to start a round.",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        // last row holds the date axis
        let chart_height = inner.height.saturating_sub(1) as usize;
        let chart_width = inner.width as usize;

        let values = self.history.values();
        let labels = self.history.labels();
        let skip = values.len().saturating_sub(chart_width);
        let visible = &values[skip..];
        let visible_labels = &labels[skip..];

        let min_price = visible.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = visible.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let range = max_price - min_price;
        let range = if range < 0.01 { 1.0 } else { range };

        // spread points over the full width
        let step = if visible.len() > 1 {
            (chart_width - 1) as f64 / (visible.len() - 1) as f64
        } else {
            0.0
        };

        let last = visible.len() - 1;
        for (i, &price) in visible.iter().enumerate() {
            let x = inner.x + (i as f64 * step).round() as u16;
            let y = inner.y + row_for(price, min_price, range, chart_height) as u16;
            let color = if i == last {
                match visible.get(last.wrapping_sub(1)) {
                    Some(prev) if price > *prev => Color::Green,
                    Some(prev) if price < *prev => Color::Red,
                    _ => Color::White,
                }
            } else {
                Color::Cyan
            };
            buf.set_string(x, y, "●", Style::default().fg(color));
        }

        if let Some(sma) = self.sma {
            if sma >= min_price && sma <= max_price {
                let y = inner.y + row_for(sma, min_price, range, chart_height) as u16;
                let x = inner.x + inner.width - 1;
                buf.set_string(x, y, "M", Style::default().fg(Color::Yellow));
            }
        }

        let axis = Style::default().fg(Color::DarkGray);
        buf.set_string(inner.x, inner.y, format!("{:.2}", max_price), axis);
        buf.set_string(
            inner.x,
            inner.y + chart_height as u16 - 1,
            format!("{:.2}", min_price),
            axis,
        );

        let label_y = inner.y + inner.height - 1;
        if let Some(first) = visible_labels.first() {
            buf.set_string(inner.x, label_y, first.to_string(), axis);
        }
        if let Some(last_label) = visible_labels.last() {
            let text = last_label.to_string();
            let x = inner.x + inner.width.saturating_sub(text.len() as u16);
            buf.set_string(x, label_y, text, axis);
        }
    }
}
