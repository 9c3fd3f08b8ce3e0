//! Fixed-width table rendering for the registry.
//!
//! This module produces the two plain-text tables written to disk after
//! every change: the city table and the road table.

use super::models::Registry;

const INDEX_WIDTH: usize = 8;
const CITY_NAME_WIDTH: usize = 20;
const NUMBER_WIDTH: usize = 5;
const ROAD_WIDTH: usize = 25;
const BUDGET_WIDTH: usize = 10;

/// Renders registry contents as left-aligned, fixed-width text tables.
///
/// Values wider than their column are written in full and push the rest of
/// the line to the right.
///
/// # Examples
///
/// ```
/// use rwinfra::domain::{Registry, TableFormatter};
///
/// let mut registry = Registry::new();
/// registry.add_city("Kigali").unwrap();
/// registry.add_city("Huye").unwrap();
/// registry.add_road("Kigali", "Huye").unwrap();
/// registry.set_budget("Kigali", "Huye", 56.7).unwrap();
///
/// let roads = TableFormatter::roads_table(&registry);
/// let row: Vec<&str> = roads.lines().nth(1).unwrap().split_whitespace().collect();
/// assert_eq!(row, ["1.", "Kigali-Huye", "56.7"]);
/// ```
pub struct TableFormatter;

impl TableFormatter {
    /// Header `Index` / `City_Name`, then one row per city in insertion order.
    pub fn cities_table(registry: &Registry) -> String {
        let mut out = format!("{:<INDEX_WIDTH$}{:<CITY_NAME_WIDTH$}\n", "Index", "City_Name");
        for city in registry.cities() {
            out.push_str(&format!(
                "{:<INDEX_WIDTH$}{:<CITY_NAME_WIDTH$}\n",
                city.index, city.name
            ));
        }
        out
    }

    /// Header `Nbr` / `Road` / `Budget`, then one row per road.
    pub fn roads_table(registry: &Registry) -> String {
        let mut out = format!(
            "{:<NUMBER_WIDTH$}{:<ROAD_WIDTH$}{:<BUDGET_WIDTH$}\n",
            "Nbr", "Road", "Budget"
        );
        for road in registry.roads() {
            out.push_str(&format!(
                "{:<NUMBER_WIDTH$}{:<ROAD_WIDTH$}{:<BUDGET_WIDTH$}\n",
                format!("{}.", road.number),
                road.label(),
                Self::budget(road.budget)
            ));
        }
        out
    }

    /// Budgets are always shown with one decimal digit.
    pub fn budget(amount: f64) -> String {
        format!("{amount:.1}")
    }
}
