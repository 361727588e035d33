use anyhow::Result;
use clap::{Parser, ValueHint};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use filepicker_config::Config;
use filepicker_engine::{
    DirectoryEntry, DirectoryLister, StoragePermissionStatus, check_storage_permission,
    find_external_storage_root, io, request_storage_permission,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

mod picker;

use picker::{Picker, filter_for};

#[derive(Debug, Default, PartialEq, Parser)]
#[command(version, about = "Pick files and directories from the terminal")]
struct Args {
    /// List the directory to stdout instead of opening the picker
    #[arg(long)]
    print: bool,
    /// Print the listing as JSON
    #[arg(long, requires = "print")]
    json: bool,
    /// Start in the mounted external storage volume when there is one
    #[arg(long)]
    storage: bool,
    /// Directory to open (defaults to the configured root)
    #[arg(value_name = "DIRECTORY", value_hint = ValueHint::DirPath)]
    directory: Option<PathBuf>,
}

/// How a key press ends the picker session, if it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// Print the marked paths
    Confirm,
    /// Leave without printing anything
    Cancel,
}

fn exit_for(code: KeyCode) -> Option<Exit> {
    match code {
        KeyCode::Char('q') => Some(Exit::Confirm),
        KeyCode::Esc => Some(Exit::Cancel),
        _ => None,
    }
}

/// One line of `--print` output: type marker, modification time, name
fn format_row(entry: &DirectoryEntry) -> String {
    let marker = if entry.is_directory { 'd' } else { '-' };
    format!("{marker} {:>13} {}", entry.last_modified, entry.name)
}

struct App {
    picker: Picker,
    list_state: ListState,
}

impl App {
    fn new(picker: Picker) -> Self {
        let mut app = Self {
            picker,
            list_state: ListState::default(),
        };
        app.reset_selection();
        app
    }

    fn reset_selection(&mut self) {
        let first = (!self.picker.entries().is_empty()).then_some(0);
        self.list_state.select(first);
    }

    fn next_row(&mut self) {
        let len = self.picker.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_row(&mut self) {
        let len = self.picker.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn open_selected(&mut self) {
        if let Some(index) = self.list_state.selected()
            && self.picker.activate(index)
        {
            self.reset_selection();
        }
    }

    fn go_parent(&mut self) {
        if self.picker.go_parent() {
            self.reset_selection();
        }
    }

    fn open_external_storage(&mut self) {
        if self.picker.open_external_storage() {
            self.reset_selection();
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(index) = self.list_state.selected() {
            self.picker.toggle_mark(index);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let args = Args::parse();

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    if check_storage_permission() != StoragePermissionStatus::Granted {
        log::warn!("Storage read access is not granted, some folders will be empty");
        request_storage_permission();
    }

    let storage_root = if args.storage {
        find_external_storage_root()
    } else {
        None
    };
    let from_config = args.directory.is_none() && storage_root.is_none();
    let directory = args
        .directory
        .or(storage_root)
        .unwrap_or_else(|| config.start_directory());

    if let Err(e) = io::validate_directory(&directory) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Directory '{}'{} is invalid: {e}",
            directory.display(),
            source
        );
        process::exit(1);
    }

    if args.print {
        let entries = DirectoryLister::new().list(&directory, &filter_for(&config))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in &entries {
                println!("{}", format_row(entry));
            }
        }
        return Ok(());
    }

    let picker = Picker::open(&config, &directory)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(picker);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match res {
        Ok(Exit::Confirm) => {
            for path in app.picker.marked() {
                println!("{}", path.display());
            }
        }
        Ok(Exit::Cancel) => {}
        Err(err) => println!("{err:?}"),
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<Exit> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if let Some(exit) = exit_for(key.code) {
                return Ok(exit);
            }
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => app.next_row(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
                KeyCode::Enter | KeyCode::Right => app.open_selected(),
                KeyCode::Backspace | KeyCode::Left => app.go_parent(),
                KeyCode::Char(' ') => app.toggle_selected(),
                KeyCode::Char('s') => app.open_external_storage(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let rows: Vec<ListItem> = app
        .picker
        .entries()
        .iter()
        .map(|entry| {
            let mark = if app.picker.is_marked(entry) { "[x] " } else { "[ ] " };
            let icon = if entry.is_directory { "📁 " } else { "📄 " };
            let style = if entry.is_directory {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(mark),
                Span::raw(icon),
                Span::styled(entry.name.clone(), style),
            ]))
        })
        .collect();

    let title = app.picker.current_dir().display().to_string();
    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    let footer = match app.picker.status() {
        Some(status) => Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::raw("q: Done | Esc: Cancel | "),
            Span::raw("↑/k ↓/j: Move | "),
            Span::raw("Enter: Open | Backspace: Up | Space: Mark | s: SD card"),
        ]),
    };

    f.render_widget(Paragraph::new(vec![footer]), chunks[1]);
}
