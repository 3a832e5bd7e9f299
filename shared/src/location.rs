use log::{info, warn};
use thiserror::Error;

use crate::geo::{Coordinate, GeoError};
use crate::state::StateAction;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("geolocation is not supported by this browser")]
    Unsupported,
    #[error("location permission denied")]
    Denied,
    #[error("position unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("device reported an invalid position: {0}")]
    Invalid(#[from] GeoError),
    #[error("location request failed: {0}")]
    Other(String),
}

impl LocationError {
    /// Map a `GeolocationPositionError.code`.
    pub fn from_code(code: u16, message: String) -> Self {
        match code {
            1 => LocationError::Denied,
            2 => LocationError::Unavailable,
            3 => LocationError::Timeout,
            _ => LocationError::Other(message),
        }
    }
}

/// Turn the outcome of the single startup request into a state change.
pub fn resolve(result: Result<Coordinate, LocationError>) -> StateAction {
    match result {
        Ok(location) => {
            info!(
                "location resolved: {}, {}",
                location.latitude(),
                location.longitude()
            );
            StateAction::LocationResolved(location)
        }
        Err(err) => {
            warn!("{err}; using default location");
            StateAction::LocationFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_error_codes() {
        assert_eq!(LocationError::from_code(1, String::new()), LocationError::Denied);
        assert_eq!(LocationError::from_code(2, String::new()), LocationError::Unavailable);
        assert_eq!(LocationError::from_code(3, String::new()), LocationError::Timeout);
        assert_eq!(
            LocationError::from_code(9, "odd".into()),
            LocationError::Other("odd".into())
        );
    }

    #[test]
    fn resolve_maps_success_and_failure() {
        let here = Coordinate::new(1.35, 103.9).unwrap();
        assert_eq!(resolve(Ok(here)), StateAction::LocationResolved(here));
        assert_eq!(resolve(Err(LocationError::Denied)), StateAction::LocationFailed);
        let invalid = Coordinate::new(95.0, 0.0).unwrap_err();
        assert_eq!(
            resolve(Err(LocationError::from(invalid))),
            StateAction::LocationFailed
        );
    }
}
