//! End-to-end flows: registry changes through the app, tables checked on disk.

use std::fs;

use rwinfra::application::{App, MenuAction};
use rwinfra::domain::{seed, Registry};
use rwinfra::infrastructure::{Config, FileRepository};
use tempfile::{tempdir, TempDir};

fn app_in_tempdir(registry: Registry) -> (App, TempDir) {
    let dir = tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    (App::new(registry, &config), dir)
}

fn answer(app: &mut App, text: &str) {
    app.input = text.to_string();
    app.submit_input();
}

fn table_rows(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .skip(1)
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}

#[test]
fn kigali_huye_scenario_writes_expected_tables() {
    let (mut app, dir) = app_in_tempdir(Registry::new());

    app.select(MenuAction::AddCities);
    answer(&mut app, "2");
    answer(&mut app, "Kigali");
    answer(&mut app, "Huye");

    app.select(MenuAction::AddRoad);
    answer(&mut app, "Kigali");
    answer(&mut app, "Huye");

    app.select(MenuAction::SetBudget);
    answer(&mut app, "Kigali");
    answer(&mut app, "Huye");
    answer(&mut app, "56.7");

    let roads = fs::read_to_string(dir.path().join("roads.txt")).unwrap();
    assert_eq!(table_rows(&roads), vec![vec!["1.", "Kigali-Huye", "56.7"]]);

    let cities = fs::read_to_string(dir.path().join("cities.txt")).unwrap();
    assert_eq!(
        table_rows(&cities),
        vec![vec!["1", "Kigali"], vec!["2", "Huye"]]
    );
}

#[test]
fn failed_operations_do_not_rewrite_tables() {
    let (mut app, dir) = app_in_tempdir(Registry::new());

    app.select(MenuAction::AddRoad);
    answer(&mut app, "Kigali");
    answer(&mut app, "Huye");

    assert!(!dir.path().join("roads.txt").exists());
    assert_eq!(app.status_message.as_deref(), Some("City Kigali not found"));
}

#[test]
fn seed_network_tables() {
    let registry = seed::rwanda_network().unwrap();
    let (mut app, dir) = app_in_tempdir(registry);
    app.persist();

    let roads = fs::read_to_string(dir.path().join("roads.txt")).unwrap();
    let rows = table_rows(&roads);
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0], vec!["1.", "Kigali-Muhanga", "28.6"]);
    assert_eq!(rows[2], vec!["3.", "Kigali-Nyagatare", "70.8"]);
    assert_eq!(rows[7], vec!["8.", "Musanze-Nyagatare", "96.1"]);
    assert_eq!(rows[8], vec!["9.", "Musanze-Rubavu", "33.7"]);

    let cities = fs::read_to_string(dir.path().join("cities.txt")).unwrap();
    assert_eq!(table_rows(&cities).len(), 7);
}

#[test]
fn rename_updates_road_labels_on_disk() {
    let registry = seed::rwanda_network().unwrap();
    let (mut app, dir) = app_in_tempdir(registry);

    app.select(MenuAction::EditCity);
    answer(&mut app, "Huye");
    answer(&mut app, "Butare");

    let roads = fs::read_to_string(dir.path().join("roads.txt")).unwrap();
    assert!(roads.contains("Butare-Muhanga"));
    assert!(roads.contains("Butare-Rusizi"));
    assert!(!roads.contains("Huye"));
}

#[test]
fn snapshot_round_trip_through_files() {
    let registry = seed::rwanda_network().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    FileRepository::save_registry(&registry, &path).unwrap();
    let loaded = FileRepository::load_registry(&path).unwrap();

    assert_eq!(loaded, registry);
    assert_eq!(loaded.budget("Kigali", "Nyagatare"), Some(70.84));
}
