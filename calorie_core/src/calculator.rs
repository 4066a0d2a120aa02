//! Daily calorie target calculation.
//!
//! BMR uses the Mifflin-St Jeor equation:
//!
//! ```text
//! BMR = 10 × weight(kg) + 6.25 × height(cm) − 5 × age(y) + s
//! s   = +5 (male), −161 (female)
//! ```
//!
//! TDEE is BMR times the activity multiplier; the target is TDEE minus the
//! goal's deficit, never below `TargetConfig::min_calories`.

use crate::config::TargetConfig;
use crate::{Error, Gender, ProfileInput, Result, UserProfile};
use once_cell::sync::Lazy;

static DEFAULT_TARGETS: Lazy<TargetConfig> = Lazy::new(TargetConfig::default);

mod mifflin {
    pub const WEIGHT: f64 = 10.0;
    pub const HEIGHT: f64 = 6.25;
    pub const AGE: f64 = 5.0;
    pub const MALE_OFFSET: f64 = 5.0;
    pub const FEMALE_OFFSET: f64 = -161.0;
}

/// The standard constant table (multipliers 1.2–1.9, deficits 0/250/500/750, floor 1200)
pub fn default_targets() -> &'static TargetConfig {
    &DEFAULT_TARGETS
}

/// Basal metabolic rate in kcal/day
pub fn basal_metabolic_rate(gender: Gender, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let offset = match gender {
        Gender::Male => mifflin::MALE_OFFSET,
        Gender::Female => mifflin::FEMALE_OFFSET,
    };
    mifflin::WEIGHT * weight_kg + mifflin::HEIGHT * height_cm - mifflin::AGE * age as f64 + offset
}

/// Compute a complete profile from biometric inputs
///
/// # Errors
/// `Error::Validation` when age, height or weight is not positive, or when the
/// inputs produce a non-positive basal rate.
pub fn compute_profile(input: &ProfileInput, targets: &TargetConfig) -> Result<UserProfile> {
    if input.age == 0 {
        return Err(Error::Validation("age must be positive".into()));
    }
    check_positive("height", input.height_cm)?;
    check_positive("weight", input.weight_kg)?;

    let bmr = basal_metabolic_rate(input.gender, input.weight_kg, input.height_cm, input.age);
    if bmr <= 0.0 {
        return Err(Error::Validation(format!(
            "biometrics give a non-positive basal rate ({:.0} kcal)",
            bmr
        )));
    }

    let tdee = bmr * targets.multipliers.for_level(input.activity);
    let target_calories =
        (tdee - targets.deficits.for_goal(input.goal)).max(targets.min_calories);

    tracing::debug!(bmr, tdee, target_calories, "Computed profile targets");

    Ok(UserProfile {
        age: input.age,
        gender: input.gender,
        height: input.height_cm,
        weight: input.weight_kg,
        activity: input.activity,
        goal: input.goal,
        tdee,
        target_calories,
    })
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}
