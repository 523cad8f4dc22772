//! Render-summary interface and the bundled renderers.

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use mev_inspector_aggregation::DashboardSummary;
use std::io::{self, Stdout, Write};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};

/// Message shown while the log is missing or has no attacks.
pub const WAITING_MESSAGE: &str =
    "Scanning blocks... No sandwiches detected yet. (Wait a few minutes)";

const TITLE: &str = "Real-Time MEV Sandwich Detector";
const SUBTITLE: &str = "Monitoring Ethereum Mainnet for Sandwich Attacks...";
const BAR_GAP: u16 = 2;

// block, bot, victim, front-run tx
const TABLE_WIDTHS: [Constraint; 4] = [
    Constraint::Length(12),
    Constraint::Length(44),
    Constraint::Length(44),
    Constraint::Min(10),
];

/// Error type for renderers.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Consumer of one dashboard frame per refresh.
///
/// Implementations must render the same output for the same summary and
/// must not hold on to the summary after returning.
pub trait SummaryRenderer {
    fn render(&mut self, summary: &DashboardSummary) -> Result<(), RenderError>;
}

impl<T: SummaryRenderer + ?Sized> SummaryRenderer for Box<T> {
    fn render(&mut self, summary: &DashboardSummary) -> Result<(), RenderError> {
        (**self).render(summary)
    }
}

/// Leaves the alternate screen and restores the cursor when dropped.
struct AlternateScreen;

impl AlternateScreen {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for AlternateScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

/// Full-screen dashboard: metrics, latest attacks table, top bots chart.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    _screen: Option<AlternateScreen>,
}

impl TerminalRenderer<CrosstermBackend<Stdout>> {
    /// Draw on stdout, optionally inside the alternate screen.
    pub fn stdout(alternate_screen: bool) -> io::Result<Self> {
        let mut out = io::stdout();
        let screen = if alternate_screen {
            Some(AlternateScreen::enter(&mut out)?)
        } else {
            None
        };

        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            _screen: screen,
        })
    }
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(backend: B) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            _screen: None,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> SummaryRenderer for TerminalRenderer<B> {
    fn render(&mut self, summary: &DashboardSummary) -> Result<(), RenderError> {
        self.terminal.draw(|f| draw_summary(f, summary))?;
        Ok(())
    }
}

fn draw_summary<B: Backend>(f: &mut Frame<B>, summary: &DashboardSummary) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title
            Constraint::Length(3), // Metrics
            Constraint::Min(5),    // Table and chart
        ])
        .split(f.size());

    let header = Paragraph::new(format!("{}\n{}", TITLE, SUBTITLE))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("MEV Inspector"));
    f.render_widget(header, chunks[0]);

    draw_metrics(f, chunks[1], summary);

    if summary.is_empty() {
        let waiting = Paragraph::new(WAITING_MESSAGE)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(waiting, chunks[2]);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    draw_latest_attacks(f, body[0], summary);
    draw_top_bots(f, body[1], summary);
}

fn draw_metrics<B: Backend>(f: &mut Frame<B>, area: Rect, summary: &DashboardSummary) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let metrics = [
        ("Total Attacks Detected", summary.total_attacks.to_string()),
        ("Unique Bots Active", summary.unique_bots.to_string()),
        ("Last Attack Block", summary.last_block.to_string()),
    ];
    for ((label, value), column) in metrics.into_iter().zip(columns) {
        let metric = Paragraph::new(value)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(label));
        f.render_widget(metric, column);
    }
}

fn draw_latest_attacks<B: Backend>(f: &mut Frame<B>, area: Rect, summary: &DashboardSummary) {
    let header = Row::new(["block_number", "bot_address", "victim_address", "tx_front"].map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = summary.latest_records.iter().map(|record| {
        Row::new(vec![
            Cell::from(record.block_number.to_string()),
            Cell::from(record.bot_address.as_str()),
            Cell::from(record.victim_address.as_str()),
            Cell::from(record.tx_front.as_str()),
        ])
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Latest Attacks"))
        .widths(&TABLE_WIDTHS)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn draw_top_bots<B: Backend>(f: &mut Frame<B>, area: Rect, summary: &DashboardSummary) {
    let data: Vec<(&str, u64)> = summary
        .top_bots
        .iter()
        .map(|bot| (bot.bot_address.as_str(), bot.count as u64))
        .collect();

    let bars = data.len().max(1) as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width.saturating_sub(BAR_GAP * (bars - 1)) / bars).max(1);

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Top Sandwich Bots"))
        .data(&data)
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .bar_style(Style::default().fg(Color::Red))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, area);
}

/// Writes each summary as a single JSON line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl JsonRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SummaryRenderer for JsonRenderer<W> {
    fn render(&mut self, summary: &DashboardSummary) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.out, summary)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mev_inspector_aggregation::summarize;
    use mev_inspector_events::SandwichEvent;
    use tui::backend::TestBackend;

    fn screen(renderer: &TerminalRenderer<TestBackend>) -> Vec<String> {
        let buffer = renderer.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol.as_str())
                    .collect::<String>()
            })
            .collect()
    }

    fn render_terminal(summary: &DashboardSummary) -> Vec<String> {
        let mut renderer = TerminalRenderer::new(TestBackend::new(140, 40)).unwrap();
        renderer.render(summary).unwrap();
        screen(&renderer)
    }

    fn line_of(lines: &[String], needle: &str) -> usize {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("{:?} not on screen", needle))
    }

    fn scenario() -> DashboardSummary {
        summarize(&[
            SandwichEvent::new(105, "0xA", "0xV2", "0xT2"),
            SandwichEvent::new(102, "0xB", "0xV3", "0xT3"),
            SandwichEvent::new(100, "0xA", "0xV1", "0xT1"),
        ])
    }

    #[test]
    fn test_waiting_state() {
        let lines = render_terminal(&summarize(&[]));
        let text = lines.join("\n");
        assert!(text.contains(WAITING_MESSAGE));
        assert!(text.contains("Waiting..."));
        assert!(!text.contains("Latest Attacks"));
        assert!(!text.contains("Top Sandwich Bots"));
    }

    #[test]
    fn test_metrics_row() {
        let lines = render_terminal(&scenario());
        let row = line_of(&lines, "Total Attacks Detected") + 1;
        let values: Vec<&str> = lines[row]
            .split(|c: char| c.is_whitespace() || c == '│')
            .filter(|token| !token.is_empty())
            .collect();
        assert_eq!(values, vec!["3", "2", "105"]);
    }

    #[test]
    fn test_latest_attacks_table() {
        let lines = render_terminal(&scenario());
        let text = lines.join("\n");
        assert!(!text.contains(WAITING_MESSAGE));

        let title = line_of(&lines, "Latest Attacks");
        let header = line_of(&lines, "block_number");
        let first = line_of(&lines, "0xT2");
        let second = line_of(&lines, "0xT3");
        let third = line_of(&lines, "0xT1");
        assert!(title < header && header < first);
        assert!(first < second && second < third);
        assert!(lines[first].contains("105"));
    }

    #[test]
    fn test_top_bots_chart() {
        let lines = render_terminal(&scenario());
        let title = line_of(&lines, "Top Sandwich Bots");
        let labels = lines[title..]
            .iter()
            .find(|l| l.contains("0xA") && l.contains("0xB"))
            .expect("bar labels");
        assert!(labels.find("0xA") < labels.find("0xB"));
    }

    #[test]
    fn test_same_summary_same_frame() {
        let mut renderer = TerminalRenderer::new(TestBackend::new(140, 40)).unwrap();
        renderer.render(&scenario()).unwrap();
        let first = screen(&renderer);
        renderer.render(&scenario()).unwrap();
        assert_eq!(screen(&renderer), first);
        assert_eq!(render_terminal(&scenario()), first);
    }

    #[test]
    fn test_json_lines() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&summarize(&[])).unwrap();
        renderer.render(&scenario()).unwrap();
        renderer.render(&scenario()).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let frames: Vec<&str> = output.lines().collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], frames[2]);

        let empty: serde_json::Value = serde_json::from_str(frames[0]).unwrap();
        let full: serde_json::Value = serde_json::from_str(frames[1]).unwrap();
        assert!(empty["last_block"].is_null());
        assert_eq!(full["last_block"], 105);
        assert_eq!(full["top_bots"][0]["bot_address"], "0xA");
        assert_eq!(full["latest_records"].as_array().unwrap().len(), 3);
    }
}
