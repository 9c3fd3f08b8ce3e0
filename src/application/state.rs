//! Application state for the registry console.
//!
//! This module owns the registry and drives the numbered menu: it collects
//! prompt answers, validates them, calls the registry and rewrites the
//! table files after every successful change.

use crate::domain::{Registry, RegistryResult, TableFormatter};
use crate::infrastructure::{Config, PersistenceError, TableWriter};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Maximum number of messages kept in the activity log.
pub const MAX_MESSAGES: usize = 100;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Menu navigation; digits pick an entry
    Menu,
    /// A menu action is collecting answers
    Prompt,
    /// Help screen is displayed
    Help,
    /// JSON snapshot save dialog
    SaveAs,
    /// JSON snapshot load dialog
    LoadFile,
    /// CSV road export dialog
    ExportCsv,
}

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddCities,
    AddRoad,
    SetBudget,
    EditCity,
    SearchCity,
    DisplayCities,
    DisplayRoads,
    DisplayAll,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        MenuAction::AddCities,
        MenuAction::AddRoad,
        MenuAction::SetBudget,
        MenuAction::EditCity,
        MenuAction::SearchCity,
        MenuAction::DisplayCities,
        MenuAction::DisplayRoads,
        MenuAction::DisplayAll,
        MenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddCities => "Add new city(ies)",
            MenuAction::AddRoad => "Add roads between cities",
            MenuAction::SetBudget => "Add the budget for roads",
            MenuAction::EditCity => "Edit city",
            MenuAction::SearchCity => "Search for a city",
            MenuAction::DisplayCities => "Display cities",
            MenuAction::DisplayRoads => "Display roads",
            MenuAction::DisplayAll => "Display recorded data",
            MenuAction::Exit => "Exit",
        }
    }

    /// Menu entries are numbered from 1.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// What the main pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Welcome,
    Cities,
    RoadMatrix,
    AllData,
}

/// Answers collected so far for a multi-step menu action.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub action: MenuAction,
    pub answers: Vec<String>,
    /// For `AddCities`: how many names to ask for, once known.
    pub city_count: Option<usize>,
    /// For `AddCities`: names entered so far, accepted or not.
    pub cities_entered: usize,
}

impl Prompt {
    pub fn new(action: MenuAction) -> Self {
        Self {
            action,
            answers: Vec::new(),
            city_count: None,
            cities_entered: 0,
        }
    }

    pub fn question(&self) -> String {
        let step = self.answers.len();
        match self.action {
            MenuAction::AddCities => match self.city_count {
                None => "Enter the number of cities to add".to_string(),
                Some(count) => format!(
                    "Enter the name for city {} of {}",
                    self.cities_entered + 1,
                    count
                ),
            },
            MenuAction::AddRoad | MenuAction::SetBudget => match step {
                0 => "Enter the name of the first city".to_string(),
                1 => "Enter the name of the second city".to_string(),
                _ => "Enter the budget for the road (in billion RWF)".to_string(),
            },
            MenuAction::EditCity => match step {
                0 => "Enter the current city name".to_string(),
                _ => "Enter the new city name".to_string(),
            },
            _ => "Enter the city index to search".to_string(),
        }
    }
}

/// Main application state: the registry plus everything the UI needs.
///
/// # Examples
///
/// ```
/// use rwinfra::application::{App, AppMode, MenuAction};
/// use rwinfra::domain::Registry;
/// use rwinfra::infrastructure::Config;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = Config { data_dir: dir.path().to_path_buf(), ..Config::default() };
/// let mut app = App::new(Registry::new(), &config);
///
/// app.select(MenuAction::AddCities);
/// assert_eq!(app.mode, AppMode::Prompt);
/// ```
#[derive(Debug)]
pub struct App {
    pub registry: Registry,
    pub writer: TableWriter,
    pub snapshot_path: PathBuf,
    pub csv_path: PathBuf,
    pub mode: AppMode,
    /// Highlighted menu entry (zero-based)
    pub selected: usize,
    pub view: View,
    pub prompt: Option<Prompt>,
    /// Prompt input buffer
    pub input: String,
    /// Cursor position in characters within the active buffer
    pub cursor_position: usize,
    /// Input buffer for filename entry
    pub filename_input: String,
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Activity log, newest last
    pub messages: VecDeque<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(registry: Registry, config: &Config) -> Self {
        Self {
            registry,
            writer: config.table_writer(),
            snapshot_path: config.snapshot_path(),
            csv_path: config.csv_path(),
            mode: AppMode::Menu,
            selected: 0,
            view: View::Welcome,
            prompt: None,
            input: String::new(),
            cursor_position: 0,
            filename_input: String::new(),
            help_scroll: 0,
            status_message: None,
            messages: VecDeque::new(),
            should_quit: false,
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::ALL.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + MenuAction::ALL.len() - 1) % MenuAction::ALL.len();
    }

    pub fn activate_selected(&mut self) {
        self.select(MenuAction::ALL[self.selected]);
    }

    /// Runs a menu entry: display entries switch the view, the others open
    /// a prompt.
    pub fn select(&mut self, action: MenuAction) {
        if let Some(position) = MenuAction::ALL.iter().position(|a| *a == action) {
            self.selected = position;
        }
        self.status_message = None;

        match action {
            MenuAction::DisplayCities => self.view = View::Cities,
            MenuAction::DisplayRoads => self.view = View::RoadMatrix,
            MenuAction::DisplayAll => self.view = View::AllData,
            MenuAction::Exit => {
                tracing::info!("exit requested");
                self.should_quit = true;
            }
            _ => {
                self.mode = AppMode::Prompt;
                self.prompt = Some(Prompt::new(action));
                self.input.clear();
                self.cursor_position = 0;
            }
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = AppMode::Menu;
        self.prompt = None;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Takes the current input as the answer to the open prompt.
    ///
    /// Unusable answers keep the prompt open and set an error status so the
    /// user can retry.
    pub fn submit_input(&mut self) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        let answer = self.input.trim().to_string();
        self.input.clear();
        self.cursor_position = 0;

        match self.answer_prompt(&mut prompt, answer) {
            Ok(true) => self.cancel_prompt(),
            Ok(false) => self.prompt = Some(prompt),
            Err(message) => {
                self.status_message = Some(message);
                self.prompt = Some(prompt);
            }
        }
    }

    /// Returns `Ok(true)` once the prompt is complete.
    fn answer_prompt(&mut self, prompt: &mut Prompt, answer: String) -> Result<bool, String> {
        match prompt.action {
            MenuAction::AddCities => {
                let Some(count) = prompt.city_count else {
                    let count = parse_positive(&answer, "number of cities")?;
                    prompt.city_count = Some(count);
                    self.status_message = None;
                    return Ok(false);
                };
                let name = non_empty(answer)?;
                let result = self.registry.add_city(&name);
                self.record(result.map(|index| format!("City {name} added with index {index}")));
                prompt.cities_entered += 1;
                Ok(prompt.cities_entered >= count)
            }
            MenuAction::AddRoad => {
                prompt.answers.push(non_empty(answer)?);
                if prompt.answers.len() < 2 {
                    return Ok(false);
                }
                let (a, b) = (&prompt.answers[0], &prompt.answers[1]);
                let result = self.registry.add_road(a, b);
                self.record(result.map(|()| format!("Road added between {a} and {b}")));
                Ok(true)
            }
            MenuAction::SetBudget => {
                if prompt.answers.len() < 2 {
                    prompt.answers.push(non_empty(answer)?);
                    return Ok(false);
                }
                let amount: f64 = answer
                    .parse()
                    .map_err(|_| format!("'{answer}' is not a valid budget amount"))?;
                let (a, b) = (&prompt.answers[0], &prompt.answers[1]);
                let result = self.registry.set_budget(a, b, amount);
                self.record(result.map(|()| {
                    format!(
                        "Budget of {} billion RWF added for road between {a} and {b}",
                        TableFormatter::budget(amount)
                    )
                }));
                Ok(true)
            }
            MenuAction::EditCity => {
                prompt.answers.push(non_empty(answer)?);
                if prompt.answers.len() < 2 {
                    return Ok(false);
                }
                let (old, new) = (&prompt.answers[0], &prompt.answers[1]);
                let result = self.registry.rename_city(old, new);
                self.record(result.map(|_| format!("City renamed from {old} to {new}")));
                Ok(true)
            }
            MenuAction::SearchCity => {
                let index = parse_positive(&answer, "city index")?;
                let message = match self.registry.find_city_by_index(index) {
                    Some(city) => format!("City found: {}: {}", city.index, city.name),
                    None => format!("City with index {index} not found."),
                };
                self.push_message(message);
                Ok(true)
            }
            _ => Ok(true),
        }
    }

    /// Logs the outcome of a registry mutation and saves on success.
    fn record(&mut self, result: RegistryResult<String>) {
        match result {
            Ok(message) => {
                tracing::info!("{message}");
                self.push_message(message);
                self.persist();
            }
            Err(err) => {
                tracing::warn!(error = %err, "registry operation refused");
                self.push_message(err.to_string());
            }
        }
    }

    /// Rewrites the table files; a failure is reported but the in-memory
    /// change stays.
    pub fn persist(&mut self) {
        if let Err(err) = self.writer.write_snapshot(&self.registry) {
            tracing::error!(error = %err, "failed to write tables");
            self.push_message(format!("Save failed: {err}"));
        }
    }

    pub fn push_message(&mut self, message: String) {
        if self.messages.len() >= MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message.clone());
        self.status_message = Some(message);
    }

    /// Switches to save-as mode to prompt for a snapshot filename.
    pub fn start_save_as(&mut self) {
        self.start_filename_input(AppMode::SaveAs, self.snapshot_path.display().to_string());
    }

    pub fn start_load_file(&mut self) {
        self.start_filename_input(AppMode::LoadFile, self.snapshot_path.display().to_string());
    }

    pub fn start_csv_export(&mut self) {
        self.start_filename_input(AppMode::ExportCsv, self.csv_path.display().to_string());
    }

    fn start_filename_input(&mut self, mode: AppMode, default: String) {
        self.mode = mode;
        self.cursor_position = default.chars().count();
        self.filename_input = default;
        self.status_message = None;
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Menu;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Filename typed in the dialog, trimmed.
    pub fn filename(&self) -> PathBuf {
        PathBuf::from(self.filename_input.trim())
    }

    pub fn set_save_result(&mut self, result: Result<PathBuf, PersistenceError>) {
        match result {
            Ok(path) => {
                self.snapshot_path = path.clone();
                tracing::info!(path = %path.display(), "snapshot saved");
                self.push_message(format!("Saved snapshot to {}", path.display()));
            }
            Err(err) => {
                tracing::error!(error = %err, "snapshot save failed");
                self.push_message(format!("Save failed: {err}"));
            }
        }
        self.cancel_filename_input();
    }

    /// Replaces the registry with a loaded snapshot and rewrites the tables.
    pub fn set_load_result(&mut self, path: PathBuf, result: Result<Registry, PersistenceError>) {
        match result {
            Ok(registry) => {
                self.registry = registry;
                self.snapshot_path = path.clone();
                tracing::info!(path = %path.display(), cities = self.registry.city_count(), "snapshot loaded");
                self.push_message(format!(
                    "Loaded {} cities and {} roads from {}",
                    self.registry.city_count(),
                    self.registry.road_count(),
                    path.display()
                ));
                self.persist();
            }
            Err(err) => {
                tracing::error!(error = %err, "snapshot load failed");
                self.push_message(format!("Load failed: {err}"));
            }
        }
        self.cancel_filename_input();
    }

    pub fn set_csv_export_result(&mut self, path: PathBuf, result: Result<usize, PersistenceError>) {
        match result {
            Ok(count) => {
                self.csv_path = path.clone();
                self.push_message(format!("Exported {count} roads to {}", path.display()));
            }
            Err(err) => {
                tracing::error!(error = %err, "csv export failed");
                self.push_message(format!("Export failed: {err}"));
            }
        }
        self.cancel_filename_input();
    }
}

fn non_empty(answer: String) -> Result<String, String> {
    if answer.is_empty() {
        Err("City name cannot be empty".to_string())
    } else {
        Ok(answer)
    }
}

fn parse_positive(answer: &str, what: &str) -> Result<usize, String> {
    match answer.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Please enter a positive whole number for the {what}")),
    }
}
