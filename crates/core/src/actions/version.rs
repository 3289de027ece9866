use semver::Version;
use skiff_domain::{Error, Result};

/// `ApiVersionTooLow` unless `actual` is at least `required`. An empty or
/// unparsable `actual` is always too low.
pub fn check_minimum_version(actual: &str, required: &str) -> Result<()> {
    let too_low = || Error::ApiVersionTooLow {
        required: required.to_string(),
        actual: actual.to_string(),
    };

    let minimum = Version::parse(required).map_err(|e| Error::Config {
        message: format!("invalid minimum version '{required}': {e}"),
    })?;
    let current = Version::parse(actual.trim().trim_start_matches('v')).map_err(|_| too_low())?;

    if current < minimum {
        Err(too_low())
    } else {
        Ok(())
    }
}
