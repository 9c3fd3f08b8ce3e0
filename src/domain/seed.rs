//! Built-in starting network of Rwandan cities and road budgets.

use super::errors::RegistryResult;
use super::models::Registry;

pub const SEED_CITIES: [&str; 7] = [
    "Kigali",
    "Huye",
    "Muhanga",
    "Musanze",
    "Nyagatare",
    "Rubavu",
    "Rusizi",
];

/// Roads with their budgets in billion RWF.
pub const SEED_ROADS: [(&str, &str, f64); 9] = [
    ("Kigali", "Muhanga", 28.6),
    ("Kigali", "Musanze", 28.6),
    ("Kigali", "Nyagatare", 70.84),
    ("Muhanga", "Huye", 56.7),
    ("Musanze", "Rubavu", 33.7),
    ("Huye", "Rusizi", 80.96),
    ("Muhanga", "Rusizi", 117.5),
    ("Musanze", "Nyagatare", 96.14),
    ("Muhanga", "Musanze", 66.3),
];

/// Builds a registry holding the seed cities and roads.
pub fn rwanda_network() -> RegistryResult<Registry> {
    let mut registry = Registry::new();
    for name in SEED_CITIES {
        registry.add_city(name)?;
    }
    for (a, b, budget) in SEED_ROADS {
        registry.add_road(a, b)?;
        registry.set_budget(a, b, budget)?;
    }
    Ok(registry)
}
