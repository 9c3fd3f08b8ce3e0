use thiserror::Error;

/// Reasons a registry operation is refused.
///
/// Every variant is recoverable, and a refused operation leaves the registry
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("City {0} already exists")]
    DuplicateName(String),
    #[error("City {0} not found")]
    CityNotFound(String),
    #[error("A road cannot connect {0} to itself")]
    SelfLoop(String),
    #[error("A road between {0} and {1} already exists")]
    RoadAlreadyExists(String, String),
    #[error("No road exists between {0} and {1}")]
    NoRoadExists(String, String),
    #[error("Budget cannot be negative: {0}")]
    NegativeAmount(f64),
    #[error("Budget must be a finite number: {0}")]
    InvalidAmount(f64),
    #[error("City is already named {0}")]
    NoOpRename(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Raised when externally supplied registry data breaks a registry invariant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid registry data: {0}")]
pub struct InvalidRegistry(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RegistryError::DuplicateName("Kigali".to_string()).to_string(),
            "City Kigali already exists"
        );
        assert_eq!(
            RegistryError::NoRoadExists("Huye".to_string(), "Rubavu".to_string()).to_string(),
            "No road exists between Huye and Rubavu"
        );
        assert_eq!(
            RegistryError::NegativeAmount(-1.0).to_string(),
            "Budget cannot be negative: -1"
        );
    }
}
