use skiff_domain::{Config, Error, Result};

/// Verify the config has what a command needs, in order: an API target, a
/// logged-in user, then a targeted org and space when requested.
pub fn check_target(config: &Config, need_org: bool, need_space: bool) -> Result<()> {
    if !config.has_target() {
        return Err(Error::NoApiTargeted);
    }
    if !config.is_logged_in() {
        return Err(Error::Unauthenticated);
    }
    if need_org && !config.has_targeted_org() {
        return Err(Error::NoOrgTargeted);
    }
    if need_space && !config.has_targeted_space() {
        return Err(Error::NoSpaceTargeted);
    }
    Ok(())
}
