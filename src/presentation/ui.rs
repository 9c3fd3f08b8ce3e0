use crate::application::{App, AppMode, MenuAction, View};
use crate::domain::{Registry, TableFormatter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

const MENU_WIDTH: u16 = 34;
const LOG_HEIGHT: u16 = 8;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);
    render_menu(f, app, body[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(LOG_HEIGHT)])
        .split(body[1]);
    render_view(f, app, right[0]);
    render_log(f, app, right[1]);

    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "rwinfra - Rwanda Road Infrastructure | Cities: {} | Roads: {} | Total budget: {} billion RWF",
        app.registry.city_count(),
        app.registry.road_count(),
        TableFormatter::budget(app.registry.total_budget())
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == app.selected {
                Style::default().bg(Color::LightBlue).fg(Color::Black)
            } else {
                Style::default()
            };
            ListItem::new(format!("{}. {}", i + 1, action.label())).style(style)
        })
        .collect();

    let menu = List::new(items).block(Block::default().borders(Borders::ALL).title("Menu"));
    f.render_widget(menu, area);
}

fn render_view(f: &mut Frame, app: &App, area: Rect) {
    let registry = &app.registry;
    match app.view {
        View::Welcome => {
            let text = format!(
                "{} cities and {} roads recorded.\n\nTables are saved to:\n  {}\n  {}\n\nPick a menu entry with 1-9 or the arrow keys. F1 shows help.",
                registry.city_count(),
                registry.road_count(),
                app.writer.cities_path().display(),
                app.writer.roads_path().display()
            );
            let welcome = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Registry"));
            f.render_widget(welcome, area);
        }
        View::Cities => f.render_widget(cities_table(registry), area),
        View::RoadMatrix => f.render_widget(road_matrix_table(registry), area),
        View::AllData => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(area);
            f.render_widget(cities_table(registry), parts[0]);
            f.render_widget(road_matrix_table(registry), parts[1]);
            f.render_widget(budget_matrix_table(registry), parts[2]);
        }
    }
}

fn cities_table(registry: &Registry) -> Table<'static> {
    let header = Row::new(vec![Cell::from("Index"), Cell::from("City_Name")])
        .style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = registry
        .cities()
        .iter()
        .map(|city| Row::new(vec![Cell::from(city.index.to_string()), Cell::from(city.name.clone())]))
        .collect();

    Table::new(rows, [Constraint::Length(8), Constraint::Min(20)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Cities"))
}

/// Matrix view with city indices along both axes.
fn matrix_table(
    registry: &Registry,
    title: &str,
    width: u16,
    cell: impl Fn(usize, usize) -> String,
) -> Table<'static> {
    let mut headers = vec![Cell::from("")];
    headers.extend(
        registry
            .cities()
            .iter()
            .map(|city| Cell::from(city.index.to_string()).style(Style::default().fg(Color::Yellow))),
    );

    let rows: Vec<Row> = registry
        .cities()
        .iter()
        .enumerate()
        .map(|(i, city)| {
            let mut cells = vec![Cell::from(city.index.to_string()).style(Style::default().fg(Color::Yellow))];
            cells.extend((0..registry.city_count()).map(|j| Cell::from(cell(i, j))));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(4)];
    widths.extend((0..registry.city_count()).map(|_| Constraint::Length(width)));

    let title = if registry.is_empty() {
        format!("{title} (no cities recorded yet)")
    } else {
        title.to_string()
    };
    Table::new(rows, widths)
        .header(Row::new(headers))
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1)
}

fn road_matrix_table(registry: &Registry) -> Table<'static> {
    let roads = registry.road_matrix();
    matrix_table(registry, "Roads Adjacency Matrix", 3, |i, j| {
        u8::from(roads.get(i, j)).to_string()
    })
}

fn budget_matrix_table(registry: &Registry) -> Table<'static> {
    let budgets = registry.budget_matrix();
    matrix_table(registry, "Budgets Adjacency Matrix (in billion RWF)", 8, |i, j| {
        TableFormatter::budget(budgets.get(i, j))
    })
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .messages
        .iter()
        .skip(app.messages.len().saturating_sub(visible))
        .map(|m| ListItem::new(m.as_str()))
        .collect();
    let log = List::new(items).block(Block::default().borders(Borders::ALL).title("Activity"));
    f.render_widget(log, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Menu => match app.status_message {
            Some(ref status) => status.clone(),
            None => "1-9/Enter: choose | Ctrl+S: save snapshot | Ctrl+O: load | Ctrl+E: export CSV | F1/?: help | q: quit".to_string(),
        },
        AppMode::Prompt => {
            let question = app.prompt.as_ref().map(|p| p.question()).unwrap_or_default();
            match app.status_message {
                Some(ref note) => format!("{note} | {question}: {}", app.input),
                None => format!("{question}: {} (Enter to confirm, Esc to cancel)", app.input),
            }
        }
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::SaveAs => format!("Save snapshot as: {} (Enter to save, Esc to cancel)", app.filename_input),
        AppMode::LoadFile => format!("Load snapshot: {} (Enter to load, Esc to cancel)", app.filename_input),
        AppMode::ExportCsv => format!("Export roads CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Menu => Style::default(),
            AppMode::Prompt => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveAs | AppMode::LoadFile => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("rwinfra Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"RWINFRA - ROAD INFRASTRUCTURE REGISTRY

=== MENU ===
1  Add new city(ies)       Asks how many, then one name per city
2  Add roads               Connects two existing cities
3  Add the budget          Sets the budget (billion RWF) of an existing road
4  Edit city               Renames a city; its index and roads are kept
5  Search for a city       Looks a city up by its index
6  Display cities          Index and name of every city
7  Display roads           Road adjacency matrix (1 = road)
8  Display recorded data   Cities, road matrix and budget matrix
9  Exit

=== RULES ===
• City names are case sensitive and must be unique
• Indices start at 1 and are never reused
• A road cannot connect a city to itself
• A budget needs an existing road and cannot be negative
• Setting a budget again replaces the old value

=== FILES ===
cities.txt      Written after every change: Index, City_Name
roads.txt       Written after every change: Nbr, Road, Budget
Ctrl+S          Save the whole registry as a JSON snapshot
Ctrl+O          Load a JSON snapshot (replaces the current data)
Ctrl+E          Export the road table as CSV

=== KEYS ===
↑↓ or j/k       Move in the menu
Enter           Run the highlighted entry / confirm an answer
Esc             Cancel the current question
F1 or ?         Show this help
q               Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
