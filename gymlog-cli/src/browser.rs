use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use gymlog::exercise::{DATE_FORMAT, format_weight};
use gymlog::{ExerciseRecord, ExerciseRepository, MuscleGroup, SetEntry};

const GROUPS_HELP: &str = "j/k: navigate | enter: open | q: quit";
const NAMES_HELP: &str = "j/k: navigate | enter: history | esc: back | q: quit";
const HISTORY_HELP: &str = "j/k: navigate | n: log set | d: delete | esc: back | q: quit";
const ALL_EXERCISES: &str = "All exercises";

enum Screen {
    Groups,
    Names {
        group: Option<MuscleGroup>,
    },
    History {
        group: Option<MuscleGroup>,
        name: String,
    },
}

enum InputMode {
    Normal,
    LoggingSet,
}

struct Browser<'a> {
    repo: &'a ExerciseRepository,
    screen: Screen,
    rows: Vec<String>,
    history: Vec<ExerciseRecord>,
    selected: usize,
    status_message: String,
    input_mode: InputMode,
    input_buffer: String,
}

impl<'a> Browser<'a> {
    fn new(repo: &'a ExerciseRepository) -> Result<Self> {
        let mut browser = Self {
            repo,
            screen: Screen::Groups,
            rows: Vec::new(),
            history: Vec::new(),
            selected: 0,
            status_message: GROUPS_HELP.to_string(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
        };
        browser.refresh()?;
        Ok(browser)
    }

    fn help(&self) -> &'static str {
        match self.screen {
            Screen::Groups => GROUPS_HELP,
            Screen::Names { .. } => NAMES_HELP,
            Screen::History { .. } => HISTORY_HELP,
        }
    }

    fn title(&self) -> String {
        match &self.screen {
            Screen::Groups => "Gymlog - Muscle Groups".to_string(),
            Screen::Names { group: Some(group) } => group.as_str().to_uppercase(),
            Screen::Names { group: None } => ALL_EXERCISES.to_uppercase(),
            Screen::History { name, .. } => name.to_uppercase(),
        }
    }

    fn refresh(&mut self) -> Result<()> {
        match &self.screen {
            Screen::Groups => {
                self.history.clear();
                self.rows = std::iter::once(ALL_EXERCISES.to_string())
                    .chain(MuscleGroup::ALL.iter().map(|g| g.to_string()))
                    .collect();
            }
            Screen::Names { group } => {
                self.history.clear();
                self.rows = match group {
                    Some(group) => self.repo.distinct_names_by_group(*group)?,
                    None => self.repo.distinct_names()?,
                };
            }
            Screen::History { name, .. } => {
                self.history = self.repo.find_by_name(name)?;
                self.rows = self.history.iter().map(history_row).collect();
            }
        }

        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        Ok(())
    }

    fn switch_to(&mut self, screen: Screen) -> Result<()> {
        self.screen = screen;
        self.selected = 0;
        self.status_message = self.help().to_string();
        self.refresh()
    }

    fn scroll_down(&mut self) {
        if !self.rows.is_empty() && self.selected < self.rows.len() - 1 {
            self.selected += 1;
        }
    }

    fn scroll_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn open_selected(&mut self) -> Result<()> {
        let next = match &self.screen {
            Screen::Groups => {
                // Row 0 is the "all exercises" entry.
                let group = self
                    .selected
                    .checked_sub(1)
                    .and_then(|i| MuscleGroup::ALL.get(i).copied());
                Screen::Names { group }
            }
            Screen::Names { group } => match self.rows.get(self.selected) {
                Some(name) => Screen::History {
                    group: *group,
                    name: name.clone(),
                },
                None => return Ok(()),
            },
            Screen::History { .. } => return Ok(()),
        };
        self.switch_to(next)
    }

    fn back(&mut self) -> Result<()> {
        let previous = match &self.screen {
            Screen::Groups => return Ok(()),
            Screen::Names { .. } => Screen::Groups,
            Screen::History { group, .. } => Screen::Names { group: *group },
        };
        self.switch_to(previous)
    }

    fn enter_log_mode(&mut self) {
        if !matches!(self.screen, Screen::History { .. }) {
            return;
        }
        let today = Local::now().date_naive().format(DATE_FORMAT);
        self.input_buffer = match self.history.first() {
            Some(latest) => format!(
                "{} {} {}",
                format_weight(latest.weight),
                latest.repetitions,
                today
            ),
            None => format!("0.0 0 {}", today),
        };
        self.input_mode = InputMode::LoggingSet;
        self.status_message = "weight reps [date] | enter: save | esc: cancel".to_string();
    }

    fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.status_message = self.help().to_string();
    }

    fn log_set(&mut self) -> Result<()> {
        let Screen::History { name, .. } = &self.screen else {
            return Ok(());
        };
        let name = name.clone();
        let input = self.input_buffer.clone();
        let mut fields = input.split_whitespace();

        let entry = match SetEntry::parse(
            &name,
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
        ) {
            Ok(entry) => entry,
            Err(e) => {
                self.status_message = e.to_string();
                return Ok(());
            }
        };
        let group = self.repo.group_of(&entry.name)?;
        let record = entry.into_record(group);

        if self.repo.insert(&record) {
            self.input_mode = InputMode::Normal;
            self.input_buffer.clear();
            self.status_message = format!("Saved: {}", record);
            self.refresh()?;
        } else {
            self.status_message = "Failed to save the set.".to_string();
        }
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let Some(record) = self.history.get(self.selected) else {
            return Ok(());
        };
        let Some(id) = record.id else {
            return Ok(());
        };
        let description = record.to_string();

        self.status_message = if self.repo.delete(id) {
            format!("Deleted {}", description)
        } else {
            format!("Could not delete exercise #{}", id)
        };
        self.refresh()
    }
}

fn history_row(record: &ExerciseRecord) -> String {
    format!(
        "{:>8} kg  x {:>3} reps   {}",
        format_weight(record.weight),
        record.repetitions,
        record.date_string().unwrap_or_else(|| "-".to_string())
    )
}

fn draw(frame: &mut Frame, browser: &Browser) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .split(frame.area());

    // Header
    let header = Paragraph::new(browser.title())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    match browser.input_mode {
        InputMode::Normal => {
            if browser.rows.is_empty() {
                let empty_msg = Paragraph::new("Nothing recorded here yet.")
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(empty_msg, chunks[1]);
            } else {
                let items: Vec<ListItem> = browser
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(idx, row)| {
                        let style = if idx == browser.selected {
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        ListItem::new(row.as_str()).style(style)
                    })
                    .collect();

                let list = List::new(items).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{} entries", browser.rows.len())),
                );

                let mut list_state = ListState::default();
                list_state.select(Some(browser.selected));

                frame.render_stateful_widget(list, chunks[1], &mut list_state);
            }
        }
        InputMode::LoggingSet => {
            let input_widget = Paragraph::new(browser.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("New Set"));
            frame.render_widget(input_widget, chunks[1]);
        }
    }

    // Footer with status
    let footer = Paragraph::new(browser.status_message.as_str())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(footer, chunks[2]);
}

pub fn run(mut terminal: DefaultTerminal, repo: &ExerciseRepository) -> Result<()> {
    let mut browser = Browser::new(repo)?;

    loop {
        terminal.draw(|frame| draw(frame, &browser))?;

        if let event::Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match browser.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        return Ok(());
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        browser.scroll_down();
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        browser.scroll_up();
                    }
                    KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                        browser.open_selected()?;
                    }
                    KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                        browser.back()?;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        browser.enter_log_mode();
                    }
                    KeyCode::Char('d') | KeyCode::Char('D') => {
                        browser.delete_selected()?;
                    }
                    _ => {}
                },
                InputMode::LoggingSet => match key.code {
                    KeyCode::Enter => {
                        browser.log_set()?;
                    }
                    KeyCode::Esc => {
                        browser.cancel_input();
                    }
                    KeyCode::Char(c) => {
                        browser.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        browser.input_buffer.pop();
                    }
                    _ => {}
                },
            }
        }
    }
}
