use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokemon_battle::compare::{
    fetch_records, Battle, ComparisonState, PriceSlot, Side, StatOutcome, Ticket,
};
use pokemon_battle::{BattleBackend, Comparator, PokemonRecord, PriceQuote};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Results coming back from network tasks, tagged with their request
pub enum Message {
    Lookup {
        ticket: Ticket,
        outcome: Result<(PokemonRecord, PokemonRecord)>,
    },
    Price {
        generation: u64,
        side: Side,
        quote: PriceQuote,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit(Ticket),
}

pub struct App {
    pub left_input: String,
    pub right_input: String,
    pub focus: Side,
    pub comparator: Comparator,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            left_input: String::new(),
            right_input: String::new(),
            focus: Side::Left,
            comparator: Comparator::new(),
        }
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Side::Left => &mut self.left_input,
            Side::Right => &mut self.right_input,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                Action::None
            }
            KeyCode::Enter if self.comparator.is_loading() => Action::None,
            KeyCode::Enter => {
                let (left, right) = (self.left_input.clone(), self.right_input.clone());
                match self.comparator.submit(&left, &right) {
                    Some(ticket) => Action::Submit(ticket),
                    None => Action::None,
                }
            }
            KeyCode::Backspace => {
                self.focused_input().pop();
                Action::None
            }
            KeyCode::Char(c) => {
                self.focused_input().push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Apply a finished network task. Returns a ticket when prices should be fetched next.
    pub fn apply(&mut self, message: Message) -> Option<Ticket> {
        match message {
            Message::Lookup { ticket, outcome } => {
                let applied = self.comparator.finish_lookup(ticket.generation, outcome);
                let done = matches!(self.comparator.state(), ComparisonState::Done(_));
                (applied && done).then_some(ticket)
            }
            Message::Price {
                generation,
                side,
                quote,
            } => {
                self.comparator.finish_price(generation, side, quote);
                None
            }
        }
    }
}

fn spawn_lookup(handle: &Handle, backend: Arc<dyn BattleBackend>, ticket: Ticket, tx: Sender<Message>) {
    handle.spawn(async move {
        let outcome = fetch_records(backend.as_ref(), &ticket).await;
        let _ = tx.send(Message::Lookup { ticket, outcome });
    });
}

/// One task per side so each price shows up as soon as it lands
fn spawn_prices(handle: &Handle, backend: Arc<dyn BattleBackend>, ticket: Ticket, tx: Sender<Message>) {
    for (side, name) in [(Side::Left, ticket.left.clone()), (Side::Right, ticket.right.clone())] {
        let backend = Arc::clone(&backend);
        let tx = tx.clone();
        let generation = ticket.generation;
        handle.spawn(async move {
            let quote = backend.price(&name).await;
            let _ = tx.send(Message::Price {
                generation,
                side,
                quote,
            });
        });
    }
}

pub fn run_ui(app: &mut App, backend: Arc<dyn BattleBackend>, handle: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    // Run the app
    let res = run_app(&mut terminal, app, backend, handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    backend: Arc<dyn BattleBackend>,
    handle: Handle,
) -> io::Result<()> {
    let (tx, rx): (Sender<Message>, Receiver<Message>) = mpsc::channel();

    loop {
        while let Ok(message) = rx.try_recv() {
            if let Some(ticket) = app.apply(message) {
                spawn_prices(&handle, Arc::clone(&backend), ticket, tx.clone());
            }
        }

        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                Action::Quit => return Ok(()),
                Action::Submit(ticket) => {
                    debug!(generation = ticket.generation, "spawning lookup");
                    spawn_lookup(&handle, Arc::clone(&backend), ticket, tx.clone());
                }
                Action::None => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name inputs
            Constraint::Length(3), // Result / error line
            Constraint::Min(0),    // Battle
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_inputs(f, chunks[0], app);
    render_result(f, chunks[1], app);

    if let ComparisonState::Done(battle) = app.comparator.state() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(chunks[2]);

        render_card(f, columns[0], &battle.left, &battle.left_price);
        render_stats(f, columns[1], battle);
        render_card(f, columns[2], &battle.right, &battle.right_price);
    } else {
        let hint = Paragraph::new("Enter two Pokémon to see how they stack up head-to-head.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Pokémon Battle "));
        f.render_widget(hint, chunks[2]);
    }

    render_status_bar(f, chunks[3]);
}

fn render_inputs(f: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (side, text, rect, placeholder) in [
        (Side::Left, &app.left_input, halves[0], "e.g., Charizard"),
        (Side::Right, &app.right_input, halves[1], "e.g., Blastoise"),
    ] {
        let focused = app.focus == side;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let content = if text.is_empty() {
            Span::styled(placeholder, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(text.as_str())
        };
        let input = Paragraph::new(Line::from(content))
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(input, rect);

        if focused {
            let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
            let x = rect.x.saturating_add(1).saturating_add(typed);
            f.set_cursor(x.min(rect.right().saturating_sub(2)), rect.y + 1);
        }
    }
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.comparator.state() {
        ComparisonState::Idle { error: Some(message) } => {
            Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red)))
        }
        ComparisonState::Idle { error: None } => Line::from("Press Enter to compare"),
        ComparisonState::Loading { left, right, .. } => Line::from(Span::styled(
            format!("Comparing {} and {}...", left, right),
            Style::default().fg(Color::Cyan),
        )),
        ComparisonState::Done(battle) => {
            let mut spans = vec![Span::styled(
                format!("🏆 {}", battle.result.result_text),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )];
            if !battle.prices_settled() {
                spans.push(Span::styled(
                    "  (fetching prices…)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    };

    let result = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(result, area);
}

fn render_card(f: &mut Frame, area: Rect, pokemon: &PokemonRecord, price: &PriceSlot) {
    let price_style = match price {
        PriceSlot::Ready(quote) if quote.is_available() => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::DarkGray),
    };
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            pokemon.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("#{}", pokemon.id)),
        Line::from(""),
        Line::from(Span::styled("Types", heading)),
    ];
    lines.extend(
        pokemon
            .types
            .iter()
            .map(|t| Line::from(format!("- {}", t.type_name))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Abilities", heading)));
    lines.extend(pokemon.abilities.iter().map(|a| {
        let hidden = if a.is_hidden { " (Hidden)" } else { "" };
        Line::from(format!("- {}{}", a.ability_name, hidden))
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Market price: ", heading),
        Span::styled(price.display().to_string(), price_style),
    ]));

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(card, area);
}

fn render_stats(f: &mut Frame, area: Rect, battle: &Battle) {
    let winner = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let tie = Style::default().fg(Color::Yellow);
    let plain = Style::default();

    let rows = battle.lines.iter().map(|line| {
        let (left_style, right_style) = match line.outcome {
            StatOutcome::Left => (winner, plain),
            StatOutcome::Right => (plain, winner),
            StatOutcome::Tie => (tie, tie),
        };
        Row::new(vec![
            Cell::from(line.left.to_string()).style(left_style),
            Cell::from(line.label.clone()),
            Cell::from(line.right.to_string()).style(right_style),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(16),
            Constraint::Length(6),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Base Stats "),
    );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status_spans = vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Compare | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Switch name | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use pokemon_battle::{StatEntry, TypeSlot};

    fn record(name: &str, id: u32, stats: [u32; 6]) -> PokemonRecord {
        let names = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];
        PokemonRecord {
            name: name.to_string(),
            id,
            image_url: String::new(),
            height: 0,
            weight: 0,
            types: vec![TypeSlot { type_name: "normal".to_string() }],
            abilities: vec![],
            stats: names
                .iter()
                .zip(stats)
                .map(|(stat_name, base_value)| StatEntry {
                    stat_name: stat_name.to_string(),
                    base_value,
                })
                .collect(),
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_goes_to_focused_input() {
        let mut app = App::new();
        type_text(&mut app, "mew");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "ditto");
        app.handle_key(press(KeyCode::Backspace));

        assert_eq!(app.left_input, "mew");
        assert_eq!(app.right_input, "ditt");
    }

    #[test]
    fn test_submit_requires_both_names() {
        let mut app = App::new();
        type_text(&mut app, "mew");

        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);
        assert!(matches!(
            app.comparator.state(),
            ComparisonState::Idle { error: Some(_) }
        ));
    }

    #[test]
    fn test_failed_lookup_does_not_fetch_prices() {
        let mut app = App::new();
        type_text(&mut app, "mew");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "Ditto");

        let Action::Submit(ticket) = app.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a submit");
        };
        assert_eq!(ticket.right, "ditto");

        let next = app.apply(Message::Lookup {
            ticket,
            outcome: Err(anyhow!("Pokémon not found. Please check the spelling.")),
        });
        assert!(next.is_none());
    }

    fn submit_pair(app: &mut App, left: &str, right: &str) -> Ticket {
        type_text(app, left);
        app.handle_key(press(KeyCode::Tab));
        type_text(app, right);
        match app.handle_key(press(KeyCode::Enter)) {
            Action::Submit(ticket) => ticket,
            other => panic!("expected a submit, got {:?}", other),
        }
    }

    #[test]
    fn test_enter_is_ignored_while_loading() {
        let mut app = App::new();
        let ticket = submit_pair(&mut app, "mew", "ditto");

        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);
        assert_eq!(app.comparator.generation(), ticket.generation);
        assert!(app.comparator.is_loading());
    }

    #[test]
    fn test_prices_arrive_one_side_at_a_time() {
        let mut app = App::new();
        let ticket = submit_pair(&mut app, "pikachu", "onix");
        let generation = ticket.generation;

        let next = app.apply(Message::Lookup {
            ticket,
            outcome: Ok((
                record("pikachu", 25, [35, 55, 40, 50, 50, 90]),
                record("onix", 95, [35, 45, 160, 30, 45, 70]),
            )),
        });
        assert_eq!(next.map(|t| t.generation), Some(generation));

        app.apply(Message::Price {
            generation,
            side: Side::Right,
            quote: PriceQuote::from_market(2.0),
        });

        let ComparisonState::Done(battle) = app.comparator.state() else {
            panic!("expected a finished battle");
        };
        assert_eq!(battle.left_price, PriceSlot::Pending);
        assert_eq!(battle.right_price, PriceSlot::Ready(PriceQuote::from_market(2.0)));
        assert!(!battle.prices_settled());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }
}
