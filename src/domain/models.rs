use serde::{Deserialize, Serialize};

use super::errors::{InvalidRegistry, RegistryError, RegistryResult};

/// A named city with a stable 1-based index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub index: usize,
    pub name: String,
}

impl City {
    /// Row/column of this city in the road and budget matrices.
    pub fn position(&self) -> usize {
        self.index - 1
    }
}

/// Square matrix stored as one flat row-major vector.
///
/// Growing the matrix appends one row and one column filled with
/// `T::default()`; every existing cell keeps its `(row, col)` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix<T> {
    dim: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Default for SquareMatrix<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Copy + Default> SquareMatrix<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![T::default(); dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` is not below `dim()`.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[row * self.dim + col]
    }

    /// # Panics
    ///
    /// Panics if `row` is not below `dim()`.
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.dim..(row + 1) * self.dim]
    }

    /// Writes `value` at `(a, b)` and `(b, a)`.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` is not below `dim()`.
    pub fn set_symmetric(&mut self, a: usize, b: usize, value: T) {
        self.cells[a * self.dim + b] = value;
        self.cells[b * self.dim + a] = value;
    }

    pub fn grow(&mut self) {
        let old = self.dim;
        let new = old + 1;
        let mut cells = vec![T::default(); new * new];
        for row in 0..old {
            cells[row * new..row * new + old].copy_from_slice(&self.cells[row * old..(row + 1) * old]);
        }
        self.cells = cells;
        self.dim = new;
    }

    fn is_well_formed(&self) -> bool {
        self.dim.checked_mul(self.dim) == Some(self.cells.len())
    }
}

impl<T: Copy + Default + PartialEq> SquareMatrix<T> {
    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| (i + 1..self.dim).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

/// A connected city pair as listed in the road table.
#[derive(Debug, Clone, PartialEq)]
pub struct Road<'a> {
    /// 1-based position in the road listing.
    pub number: usize,
    pub from: &'a City,
    pub to: &'a City,
    pub budget: f64,
}

impl Road<'_> {
    pub fn label(&self) -> String {
        format!("{}-{}", self.from.name, self.to.name)
    }
}

/// The city list together with the road and budget matrices.
///
/// `cities[p]` always sits at row/column `p` of both matrices, and both
/// matrices stay symmetric with dimension equal to the city count.
///
/// # Examples
///
/// ```
/// use rwinfra::domain::Registry;
///
/// let mut registry = Registry::new();
/// registry.add_city("Kigali").unwrap();
/// registry.add_city("Huye").unwrap();
/// registry.add_road("Kigali", "Huye").unwrap();
/// registry.set_budget("Kigali", "Huye", 56.7).unwrap();
///
/// assert_eq!(registry.budget("Huye", "Kigali"), Some(56.7));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegistryData")]
pub struct Registry {
    cities: Vec<City>,
    roads: SquareMatrix<bool>,
    budgets: SquareMatrix<f64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn road_matrix(&self) -> &SquareMatrix<bool> {
        &self.roads
    }

    pub fn budget_matrix(&self) -> &SquareMatrix<f64> {
        &self.budgets
    }

    /// Appends a new city and returns its index.
    ///
    /// The index is one past the highest index handed out so far, so a
    /// renamed city never frees its number.
    pub fn add_city(&mut self, name: &str) -> RegistryResult<usize> {
        if self.position_of(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let index = self.cities.last().map_or(1, |city| city.index + 1);
        self.cities.push(City {
            index,
            name: name.to_string(),
        });
        self.roads.grow();
        self.budgets.grow();
        Ok(index)
    }

    pub fn add_road(&mut self, a: &str, b: &str) -> RegistryResult<()> {
        if a == b {
            return Err(RegistryError::SelfLoop(a.to_string()));
        }
        let (i, j) = self.resolve_pair(a, b)?;
        if self.roads.get(i, j) {
            return Err(RegistryError::RoadAlreadyExists(a.to_string(), b.to_string()));
        }
        self.roads.set_symmetric(i, j, true);
        Ok(())
    }

    /// Sets the budget of an existing road, replacing any previous value.
    pub fn set_budget(&mut self, a: &str, b: &str, amount: f64) -> RegistryResult<()> {
        if amount < 0.0 {
            return Err(RegistryError::NegativeAmount(amount));
        }
        if !amount.is_finite() {
            return Err(RegistryError::InvalidAmount(amount));
        }
        // -0.0 passes the sign check above; store it as plain zero.
        let amount = if amount == 0.0 { 0.0 } else { amount };
        let (i, j) = self.resolve_pair(a, b)?;
        if !self.roads.get(i, j) {
            return Err(RegistryError::NoRoadExists(a.to_string(), b.to_string()));
        }
        self.budgets.set_symmetric(i, j, amount);
        Ok(())
    }

    /// Renames a city in place and returns its (unchanged) index.
    pub fn rename_city(&mut self, old_name: &str, new_name: &str) -> RegistryResult<usize> {
        if old_name == new_name {
            return Err(RegistryError::NoOpRename(old_name.to_string()));
        }
        let position = self
            .position_of(old_name)
            .ok_or_else(|| RegistryError::CityNotFound(old_name.to_string()))?;
        if self.position_of(new_name).is_some() {
            return Err(RegistryError::DuplicateName(new_name.to_string()));
        }

        let city = &mut self.cities[position];
        city.name = new_name.to_string();
        Ok(city.index)
    }

    pub fn find_city_by_index(&self, index: usize) -> Option<&City> {
        self.cities.iter().find(|city| city.index == index)
    }

    pub fn resolve_city_by_name(&self, name: &str) -> Option<usize> {
        self.cities.iter().find(|city| city.name == name).map(|city| city.index)
    }

    pub fn is_connected(&self, a: &str, b: &str) -> bool {
        match (self.position_of(a), self.position_of(b)) {
            (Some(i), Some(j)) => self.roads.get(i, j),
            _ => false,
        }
    }

    /// Budget of the road between `a` and `b`, or `None` when there is no road.
    pub fn budget(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.position_of(a)?;
        let j = self.position_of(b)?;
        self.roads.get(i, j).then(|| self.budgets.get(i, j))
    }

    /// Connected pairs `(i, j)` with `i < j`, in row-major order.
    pub fn roads(&self) -> impl Iterator<Item = Road<'_>> + '_ {
        let n = self.cities.len();
        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.roads.get(i, j))
            .enumerate()
            .map(|(k, (i, j))| Road {
                number: k + 1,
                from: &self.cities[i],
                to: &self.cities[j],
                budget: self.budgets.get(i, j),
            })
    }

    pub fn road_count(&self) -> usize {
        self.roads().count()
    }

    pub fn total_budget(&self) -> f64 {
        self.roads().map(|road| road.budget).sum()
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.cities.iter().position(|city| city.name == name)
    }

    fn resolve_pair(&self, a: &str, b: &str) -> RegistryResult<(usize, usize)> {
        let i = self
            .position_of(a)
            .ok_or_else(|| RegistryError::CityNotFound(a.to_string()))?;
        let j = self
            .position_of(b)
            .ok_or_else(|| RegistryError::CityNotFound(b.to_string()))?;
        Ok((i, j))
    }
}

/// Unvalidated registry contents, as read from a snapshot.
#[derive(Debug, Deserialize)]
struct RegistryData {
    cities: Vec<City>,
    roads: SquareMatrix<bool>,
    budgets: SquareMatrix<f64>,
}

impl TryFrom<RegistryData> for Registry {
    type Error = InvalidRegistry;

    fn try_from(data: RegistryData) -> Result<Self, Self::Error> {
        let n = data.cities.len();

        for (position, city) in data.cities.iter().enumerate() {
            if city.index != position + 1 {
                return Err(InvalidRegistry(format!(
                    "city {} has index {}, expected {}",
                    city.name,
                    city.index,
                    position + 1
                )));
            }
            if data.cities[..position].iter().any(|other| other.name == city.name) {
                return Err(InvalidRegistry(format!("duplicate city name {}", city.name)));
            }
        }

        if !data.roads.is_well_formed() || data.roads.dim() != n {
            return Err(InvalidRegistry(format!("road matrix is not {n}x{n}")));
        }
        if !data.budgets.is_well_formed() || data.budgets.dim() != n {
            return Err(InvalidRegistry(format!("budget matrix is not {n}x{n}")));
        }
        if !data.roads.is_symmetric() || !data.budgets.is_symmetric() {
            return Err(InvalidRegistry("matrices must be symmetric".to_string()));
        }

        for i in 0..n {
            if data.roads.get(i, i) {
                return Err(InvalidRegistry(format!("city {} has a road to itself", data.cities[i].name)));
            }
            for j in 0..n {
                let budget = data.budgets.get(i, j);
                if !budget.is_finite() || budget.is_sign_negative() {
                    return Err(InvalidRegistry(format!("invalid budget {budget}")));
                }
                if budget != 0.0 && !data.roads.get(i, j) {
                    return Err(InvalidRegistry(format!(
                        "budget set between {} and {} without a road",
                        data.cities[i].name, data.cities[j].name
                    )));
                }
            }
        }

        Ok(Self {
            cities: data.cities,
            roads: data.roads,
            budgets: data.budgets,
        })
    }
}
