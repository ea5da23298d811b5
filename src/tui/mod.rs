//! Ratatui-based terminal UI.
//!
//! The TUI shows the curated pools grouped into category tabs, a detail view
//! with a 12-month APY chart per pool, and a wallet-connect dialog that gates
//! the Yield Aggregator detail view.

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Terminal,
};

use crate::app::pipeline::{self, Dashboard, PoolView};
use crate::cli::TuiArgs;
use crate::data::LlamaClient;
use crate::domain::{PoolCategory, WalletSession};
use crate::error::AppError;
use crate::report::{format_currency, format_percentage, month_label, truncate};

mod plotters_chart;

use plotters_chart::ApyChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which screen the body shows.
enum Screen {
    PoolList,
    PoolDetail(PoolView),
}

struct App {
    client: LlamaClient,
    wallet: WalletSession,
    tab: usize,
    selected: usize,
    dashboard: Option<Dashboard>,
    screen: Screen,
    wallet_dialog: bool,
    /// Pool to open once the wallet dialog resolves to "connected".
    pending_pool: Option<String>,
    status: String,
}

impl App {
    fn new(args: TuiArgs) -> Result<Self, AppError> {
        let client = LlamaClient::from_env()?;
        let tab = args
            .category
            .and_then(|c| PoolCategory::ALL.iter().position(|&x| x == c))
            .unwrap_or(0);
        let mut app = Self {
            client,
            wallet: WalletSession::default(),
            tab,
            selected: 0,
            dashboard: None,
            screen: Screen::PoolList,
            wallet_dialog: false,
            pending_pool: None,
            status: "Fetching pools...".to_string(),
        };
        app.refresh_dashboard()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.wallet_dialog {
            return self.handle_wallet_dialog(code);
        }
        if matches!(self.screen, Screen::PoolDetail(_)) {
            return self.handle_detail_key(code);
        }
        self.handle_list_key(code)
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Left => {
                if self.tab > 0 {
                    self.tab -= 1;
                } else {
                    self.tab = PoolCategory::ALL.len() - 1;
                }
                self.selected = 0;
            }
            KeyCode::Right => {
                self.tab = (self.tab + 1) % PoolCategory::ALL.len();
                self.selected = 0;
            }
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                let count = self.current_pool_count();
                if count > 0 && self.selected < count - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.open_selected_pool()?,
            KeyCode::Char('w') => {
                if self.wallet.is_connected() {
                    self.wallet.disconnect();
                    self.status = "Wallet disconnected.".to_string();
                } else {
                    self.wallet_dialog = true;
                    self.pending_pool = None;
                }
            }
            KeyCode::Char('r') => self.refresh_dashboard()?,
            _ => {}
        }
        Ok(false)
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.screen = Screen::PoolList;
                self.status = "Back to pool list.".to_string();
            }
            KeyCode::Char('r') => {
                if let Screen::PoolDetail(view) = &self.screen {
                    let pool_id = view.pool.pool.clone();
                    self.open_pool(&pool_id)?;
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_wallet_dialog(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.wallet.connect();
                self.wallet_dialog = false;
                self.status = "Wallet connected.".to_string();
                if let Some(pool_id) = self.pending_pool.take() {
                    self.open_pool(&pool_id)?;
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.wallet_dialog = false;
                self.pending_pool = None;
                self.status = "Wallet connection canceled.".to_string();
            }
            _ => {}
        }
        Ok(false)
    }

    fn current_category(&self) -> PoolCategory {
        PoolCategory::ALL[self.tab.min(PoolCategory::ALL.len() - 1)]
    }

    fn current_pool_count(&self) -> usize {
        self.dashboard
            .as_ref()
            .map(|d| d.pools_in(self.current_category()).len())
            .unwrap_or(0)
    }

    fn open_selected_pool(&mut self) -> Result<(), AppError> {
        let category = self.current_category();
        let Some(dashboard) = &self.dashboard else {
            self.status = "No pool data available.".to_string();
            return Ok(());
        };
        let pools = dashboard.pools_in(category);
        let Some(entry) = pools.get(self.selected) else {
            self.status = "No pool selected.".to_string();
            return Ok(());
        };
        let pool_id = entry.pool.pool.clone();

        // The gate: Yield Aggregator detail is locked until connected. Instead
        // of failing, offer to connect and remember which pool to open.
        if !self.wallet.may_view(category) {
            self.pending_pool = Some(pool_id);
            self.wallet_dialog = true;
            return Ok(());
        }

        self.open_pool(&pool_id)
    }

    fn open_pool(&mut self, pool_id: &str) -> Result<(), AppError> {
        self.status = "Fetching chart...".to_string();
        match pipeline::load_pool_view(&self.client, pool_id, self.wallet, Utc::now()) {
            Ok(view) => {
                self.status = format!("{} — {} months", view.pool.project, view.series.len());
                self.screen = Screen::PoolDetail(view);
            }
            Err(err) => {
                // Network/API failures stay inside the TUI as a status message
                // with a retry affordance, rather than tearing the UI down.
                self.status = format!("{err} (press r to retry)");
            }
        }
        Ok(())
    }

    fn refresh_dashboard(&mut self) -> Result<(), AppError> {
        self.status = "Fetching pools...".to_string();
        match pipeline::load_dashboard(&self.client) {
            Ok(dashboard) => {
                self.status = format!("{} curated pools loaded.", dashboard.pools.len());
                self.dashboard = Some(dashboard);
                let count = self.current_pool_count();
                if count == 0 {
                    self.selected = 0;
                } else if self.selected >= count {
                    self.selected = count - 1;
                }
            }
            Err(err) => {
                self.status = format!("{err} (press r to retry)");
            }
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match &self.screen {
            Screen::PoolList => self.draw_pool_list(frame, chunks[1]),
            Screen::PoolDetail(view) => draw_pool_detail(frame, chunks[1], view),
        }
        self.draw_footer(frame, chunks[2]);

        if self.wallet_dialog {
            self.draw_wallet_dialog(frame, size);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let wallet_span = if self.wallet.is_connected() {
            Span::styled("wallet: connected", Style::default().fg(Color::Green))
        } else {
            Span::styled("wallet: not connected", Style::default().fg(Color::Red))
        };

        let n = self
            .dashboard
            .as_ref()
            .map(|d| d.pools.len())
            .unwrap_or(0);

        let lines = vec![
            Line::from(vec![
                Span::styled("yd", Style::default().fg(Color::Cyan)),
                Span::raw(" — DeFi yield pools (yields.llama.fi)"),
            ]),
            Line::from(vec![
                Span::styled(
                    format!("pools: {n} | "),
                    Style::default().fg(Color::Gray),
                ),
                wallet_span,
            ]),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_pool_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let titles: Vec<Line> = PoolCategory::ALL
            .iter()
            .map(|c| {
                let locked = c.requires_wallet() && !self.wallet.is_connected();
                let label = if locked {
                    format!("{} [locked]", c.display_name())
                } else {
                    c.display_name().to_string()
                };
                Line::from(label)
            })
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.tab)
            .block(Block::default().title("Categories").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        let category = self.current_category();
        let mut items: Vec<ListItem> = Vec::new();
        if let Some(dashboard) = &self.dashboard {
            for entry in dashboard.pools_in(category) {
                let p = &entry.pool;
                let apy = p
                    .apy
                    .map(format_percentage)
                    .unwrap_or_else(|| "N/A".to_string());
                items.push(ListItem::new(format!(
                    "{:<16} {:<12} {:<10} {:>10} {:>8}",
                    truncate(&p.project, 16),
                    truncate(&p.symbol, 12),
                    truncate(&p.chain, 10),
                    format_currency(p.tvl_usd),
                    apy,
                )));
            }
        }
        if items.is_empty() {
            items.push(ListItem::new("(no pools loaded — press r to fetch)"));
        }

        let title = format!(
            "{:<16} {:<12} {:<10} {:>10} {:>8}",
            "project", "symbol", "chain", "tvl", "apy"
        );
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_wallet_dialog(&self, frame: &mut ratatui::Frame<'_>, size: Rect) {
        let rect = centered_rect(size, 50, 7);
        frame.render_widget(Clear, rect);

        let text = Text::from(vec![
            Line::from(""),
            Line::from("This Yield Aggregator pool is locked until"),
            Line::from("you connect a crypto wallet."),
            Line::from(""),
            Line::from(Span::styled(
                "y: connect   n/Esc: cancel",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ]);

        let dialog = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title("Connect Wallet Required")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        frame.render_widget(dialog, rect);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match &self.screen {
            Screen::PoolList => "←/→ category  ↑/↓ select  Enter detail  w wallet  r refresh  q quit",
            Screen::PoolDetail(_) => "Esc back  r refresh chart  q back",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_pool_detail(frame: &mut ratatui::Frame<'_>, area: Rect, view: &PoolView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    draw_detail_stats(frame, chunks[0], view);
    draw_detail_chart(frame, chunks[1], view);
}

fn draw_detail_stats(frame: &mut ratatui::Frame<'_>, area: Rect, view: &PoolView) {
    let p = &view.pool;
    let category = view
        .category
        .map(|c| c.display_name())
        .unwrap_or("Uncategorized");

    let apy = p.apy.map(format_percentage).unwrap_or_else(|| "N/A".to_string());
    let apy_30d = p
        .apy_mean_30d
        .map(format_percentage)
        .unwrap_or_else(|| "N/A".to_string());
    let sigma = p
        .sigma
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "N/A".to_string());

    let lines = vec![
        Line::from(Span::styled(
            format!("{} — {} ({})", p.project, p.symbol, p.chain),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("category: {category}")),
        Line::from(format!(
            "tvl: {} | apy: {apy} | apy 30d: {apy_30d} | sigma: {sigma}",
            format_currency(p.tvl_usd)
        )),
        Line::from(Span::styled(
            format!("pool: {}", p.pool),
            Style::default().fg(Color::Gray),
        )),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Pool").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_detail_chart(frame: &mut ratatui::Frame<'_>, area: Rect, view: &PoolView) {
    let block = Block::default()
        .title("APY — trailing 12 months")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if view.series.is_empty() {
        let msg = Paragraph::new("No chart data in the window.")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    }

    let (series, labels, x_bounds, y_bounds) = chart_series(view);

    let (chart_rect, insets) = chart_layout(inner);
    let widget = ApyChart {
        series: &series,
        x_bounds,
        y_bounds,
    };

    frame.render_widget(widget, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, inner, chart_rect, insets, &labels, y_bounds);
    }
}

/// Build the chart series: x = month index, y = APY percent.
fn chart_series(view: &PoolView) -> (Vec<(f64, f64)>, Vec<String>, [f64; 2], [f64; 2]) {
    let series: Vec<(f64, f64)> = view
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.apy))
        .collect();
    let labels: Vec<String> = view
        .series
        .iter()
        .map(|s| month_label(&s.timestamp))
        .collect();

    let x_max = (series.len().saturating_sub(1)).max(1) as f64;
    let x_bounds = [0.0, x_max];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &series {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        // Flat series: synthesize a band around the level.
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (series, labels, x_bounds, y_bounds)
}

fn centered_rect(size: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(size.width);
    let height = height.min(size.height);
    Rect {
        x: size.x + (size.width - width) / 2,
        y: size.y + (size.height - height) / 2,
        width,
        height,
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    month_labels: &[String],
    y_bounds: [f64; 2],
) {
    let style = Style::default().fg(Color::Gray);

    // X ticks: month labels at up to 4 evenly spaced indices.
    let n = month_labels.len();
    if n > 0 {
        let ticks = n.min(4);
        for i in 0..ticks {
            let u = if ticks == 1 {
                0.0
            } else {
                i as f64 / (ticks as f64 - 1.0)
            };
            let idx = ((n as f64 - 1.0) * u).round() as usize;
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let label = month_labels[idx].clone();
            let label_len = label.len() as u16;
            let start = x.saturating_sub((label.len() / 2) as u16);
            let y = chart.y + chart.height;
            if y >= inner.y + inner.height - 1 {
                continue;
            }
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y,
                    width: label_len,
                    height: 1,
                },
            );
        }
    }

    // Y ticks: APY values.
    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let y_label = Paragraph::new("apy (%)")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthlySample, Pool};

    fn view(apys: &[f64]) -> PoolView {
        PoolView {
            pool: Pool {
                pool: "p".to_string(),
                chain: "Ethereum".to_string(),
                project: "aave-v3".to_string(),
                symbol: "USDC".to_string(),
                tvl_usd: 1.0,
                apy: None,
                apy_mean_30d: None,
                apy_base: None,
                apy_reward: None,
                sigma: None,
                stablecoin: None,
                il_risk: None,
                exposure: None,
                pool_meta: None,
                predictions: None,
            },
            category: None,
            series: apys
                .iter()
                .enumerate()
                .map(|(i, &apy)| MonthlySample {
                    timestamp: format!("2024-{:02}-01", i + 1),
                    apy,
                })
                .collect(),
        }
    }

    #[test]
    fn chart_series_indexes_months_and_pads_y() {
        let (series, labels, x_bounds, y_bounds) = chart_series(&view(&[2.0, 4.0, 3.0]));
        assert_eq!(series, vec![(0.0, 2.0), (1.0, 4.0), (2.0, 3.0)]);
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(x_bounds, [0.0, 2.0]);
        assert!(y_bounds[0] < 2.0 && y_bounds[1] > 4.0);
    }

    #[test]
    fn chart_series_flat_band_keeps_positive_span() {
        let (_, _, _, y_bounds) = chart_series(&view(&[3.0, 3.0]));
        assert!(y_bounds[1] > y_bounds[0]);
    }

    #[test]
    fn centered_rect_stays_inside_parent() {
        let parent = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let rect = centered_rect(parent, 50, 7);
        assert!(rect.x + rect.width <= parent.width);
        assert!(rect.y + rect.height <= parent.height);

        // Larger than the parent: clamped, not panicking.
        let tiny = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 4,
        };
        let rect = centered_rect(tiny, 50, 7);
        assert!(rect.width <= 20 && rect.height <= 4);
    }
}
