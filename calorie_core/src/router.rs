//! Screen selection.
//!
//! Until a profile exists every request lands on onboarding; afterwards the
//! requested view is shown as-is.

use crate::{Screen, UserProfile, View};

/// Effective screen for a navigation request
pub fn resolve_screen(has_profile: bool, requested: View) -> Screen {
    if !has_profile {
        return Screen::Onboarding;
    }
    match requested {
        View::Dashboard => Screen::Dashboard,
        View::Scanner => Screen::Scanner,
        View::Profile => Screen::Profile,
    }
}

/// Bottom navigation is only offered once onboarding is complete
pub fn navigation_visible(has_profile: bool) -> bool {
    has_profile
}

/// Daily target shown in the header, in whole kcal
pub fn header_target(profile: Option<&UserProfile>) -> Option<i64> {
    profile.map(|p| p.target_calories.round() as i64)
}
