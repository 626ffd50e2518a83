//! Interactive TUI dashboard - country selector, tariff metrics, price
//! impact chart and the economic chatbot.
//!
//! One user interaction is handled to completion before the next is
//! accepted; the gateway call blocks the loop, matching the synchronous
//! pipeline model. There is no mid-flight cancel.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use tariff_common::pipeline;
use tariff_common::{
    projection, ChatSession, CompletionGateway, CountryRecord, ExplorerConfig, Role, TariffDataset,
};

use crate::resources;

/// Dashboard state
struct Dashboard<'a> {
    dataset: &'a TariffDataset,
    countries: Vec<String>,
    selected: usize,
    session: ChatSession,
    gateway: CompletionGateway,
    /// Chat input buffer
    input: String,
    /// Last gateway error, rendered in the status line
    error: Option<String>,
    /// Reference links rendered under the transcript
    resource_links: Vec<String>,
    /// Utterance accepted but not yet sent (drawn as "thinking" first)
    pending: Option<String>,
    should_quit: bool,
}

impl<'a> Dashboard<'a> {
    fn new(config: &ExplorerConfig, dataset: &'a TariffDataset) -> Self {
        let countries: Vec<String> = dataset.countries().iter().map(|c| c.to_string()).collect();

        // A misconfigured gateway still leaves the dashboard usable:
        // shortcuts work and model calls surface the configuration error.
        let gateway = CompletionGateway::from_config(&config.gateway).unwrap_or_else(|e| {
            tracing::warn!("completion gateway not usable: {}", e);
            CompletionGateway::unconfigured(e.to_string())
        });

        let mut session = ChatSession::new();
        if let Some(first) = countries.first() {
            session.select_country(first);
        }

        Self {
            dataset,
            countries,
            selected: 0,
            session,
            gateway,
            input: String::new(),
            error: None,
            resource_links: Vec::new(),
            pending: None,
            should_quit: false,
        }
    }

    fn record(&self) -> Option<&CountryRecord> {
        self.countries
            .get(self.selected)
            .and_then(|c| self.dataset.lookup(c))
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        let country = self.countries[index].clone();
        // Clears the transcript only when the country actually changes
        self.session.select_country(&country);
        self.error = None;
        self.resource_links.clear();
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                if self.selected > 0 {
                    self.select(self.selected - 1);
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.countries.len() {
                    self.select(self.selected + 1);
                }
            }
            KeyCode::Enter => {
                let utterance = self.input.trim().to_string();
                if !utterance.is_empty() {
                    self.pending = Some(utterance);
                    self.input.clear();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Run the pending utterance through the turn pipeline. Blocks on the
    /// gateway call.
    fn submit_pending(&mut self) {
        let Some(utterance) = self.pending.take() else {
            return;
        };
        let Some(record) = self.record().cloned() else {
            return;
        };

        self.error = None;
        self.resource_links.clear();

        match pipeline::run_turn(&mut self.session, &record, &self.gateway, &utterance) {
            Ok(reply) => {
                if reply.suggest_resources {
                    self.resource_links = resources::reference_links(&record.country)
                        .into_iter()
                        .map(|(label, url)| format!("{} - {}", label, url))
                        .collect();
                }
            }
            // Recoverable: shown to the user, transcript left as-is
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

fn draw(f: &mut Frame, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // body
            Constraint::Length(3), // chat input
            Constraint::Length(3), // footer
        ])
        .split(f.size());

    draw_header(f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // country selector
            Constraint::Length(40), // metrics + chart
            Constraint::Min(30),    // chat
        ])
        .split(chunks[1]);

    draw_countries(f, body[0], dashboard);
    draw_overview(f, body[1], dashboard);
    draw_chat(f, body[2], dashboard);
    draw_input(f, chunks[2], dashboard);
    draw_footer(f, chunks[3]);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("U.S. Tariff Impact Visualizer + Economic Chatbot")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn draw_countries(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let items: Vec<ListItem> = dashboard
        .countries
        .iter()
        .enumerate()
        .map(|(i, country)| {
            let style = if i == dashboard.selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(country.as_str()).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Countries "),
    );
    f.render_widget(list, area);
}

fn draw_overview(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(10)])
        .split(area);

    let Some(record) = dashboard.record() else {
        let empty = Paragraph::new("No country selected")
            .block(Block::default().borders(Borders::ALL).title(" Tariff Facts "));
        f.render_widget(empty, chunks[0]);
        return;
    };

    let delta = projection::delta_pct(record.tariff_rate);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Tariff:        "),
            Span::styled(
                format!("{}%", record.tariff_rate),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Import Value:  "),
            Span::styled(
                format!("${}B", record.import_value),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::raw("Price Delta:   "),
            Span::styled(
                format!("+{:.1}%", delta),
                Style::default().fg(Color::Magenta),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Product Impact",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Categories: {}", record.top_categories)),
        Line::from(format!("Products:   {}", record.specific_products)),
        Line::from(format!("Suppliers:  {}", record.alternative_suppliers)),
        Line::from(format!("Impact:     {}", record.use_case_impact)),
    ];

    let facts = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(format!(" Tariff Facts: {} ", record.country)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(facts, chunks[0]);

    // Two-bar before/after price chart
    let series = projection::project(record.tariff_rate);
    let data: Vec<(&str, u64)> = series
        .iter()
        .map(|p| (p.label, p.price.round() as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Price Impact (USD) "),
        )
        .data(&data)
        .bar_width(14)
        .bar_gap(3)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, chunks[1]);
}

fn draw_chat(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let mut lines: Vec<Line> = Vec::new();

    for turn in dashboard.session.turns() {
        let (tag, color) = match turn.role {
            Role::User => ("you", Color::Cyan),
            Role::Assistant => ("assistant", Color::Green),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", tag),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(turn.content.clone()),
        ]));
        lines.push(Line::from(""));
    }

    if !dashboard.resource_links.is_empty() {
        lines.push(Line::from(Span::styled(
            "Explore further:",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for link in &dashboard.resource_links {
            lines.push(Line::from(format!("  - {}", link)));
        }
        lines.push(Line::from(""));
    }

    if dashboard.pending.is_some() {
        lines.push(Line::from(Span::styled(
            "Generating explanation...",
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(error) = &dashboard.error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    // Keep the tail visible once the transcript outgrows the pane
    let visible = area.height.saturating_sub(2) as usize;
    if lines.len() > visible {
        lines.drain(..lines.len() - visible);
    }

    let title = match dashboard.session.country() {
        Some(country) => format!(" Ask about the tariff on {} ", country),
        None => " Chatbot ".to_string(),
    };

    let chat = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(chat, area);
}

fn draw_input(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let input = Paragraph::new(format!("> {}", dashboard.input)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Ask about economic policy, tariffs, or trade "),
    );
    f.render_widget(input, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Quit  "),
        Span::styled(" Up/Down ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Select country (resets chat)  "),
        Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Send"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    )
    .alignment(Alignment::Left);
    f.render_widget(footer, area);
}

/// Run the dashboard TUI.
pub fn run(config: &ExplorerConfig, dataset: &TariffDataset) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dashboard = Dashboard::new(config, dataset);

    let result = run_loop(&mut terminal, &mut dashboard);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dashboard: &mut Dashboard,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, dashboard))?;

        // The "Generating explanation..." frame is on screen; now make the
        // blocking call and redraw with the outcome.
        if dashboard.pending.is_some() {
            dashboard.submit_pending();
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            dashboard.handle_event(event);
        }

        if dashboard.should_quit {
            break;
        }
    }

    Ok(())
}
