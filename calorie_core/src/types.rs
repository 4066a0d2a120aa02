//! Core domain types for the calorie tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Biometric enums (gender, activity tier, goal)
//! - The user profile and its raw input form
//! - Food entries, drafts and AI analysis results
//! - Navigation views and rendered screens

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

/// Lowercase and unify `_`/space separators so CLI and config spellings agree.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', ' '], "-")
}

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex used by the BMR formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(Error::Validation(format!("unknown gender: {}", s))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Activity tier, ordered from least to most active
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Physical job or intense daily training
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very-active" => Ok(ActivityLevel::VeryActive),
            _ => Err(Error::Validation(format!("unknown activity level: {}", s))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very-active",
        };
        f.write_str(label)
    }
}

/// Weight goal, ordered from smallest to largest deficit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    Maintain,
    LoseMild,
    LoseNormal,
    LoseExtreme,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::Maintain,
        Goal::LoseMild,
        Goal::LoseNormal,
        Goal::LoseExtreme,
    ];
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "maintain" => Ok(Goal::Maintain),
            "lose-mild" => Ok(Goal::LoseMild),
            "lose-normal" => Ok(Goal::LoseNormal),
            "lose-extreme" => Ok(Goal::LoseExtreme),
            _ => Err(Error::Validation(format!("unknown goal: {}", s))),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Goal::Maintain => "maintain",
            Goal::LoseMild => "lose-mild",
            Goal::LoseNormal => "lose-normal",
            Goal::LoseExtreme => "lose-extreme",
        };
        f.write_str(label)
    }
}

/// The five user-supplied fields a profile is computed from
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileInput {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

/// A computed nutritional profile
///
/// `tdee` and `target_calories` are only ever produced by
/// [`crate::calculator::compute_profile`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
    pub tdee: f64,
    pub target_calories: f64,
}

impl UserProfile {
    /// The inputs this profile was computed from
    pub fn input(&self) -> ProfileInput {
        ProfileInput {
            age: self.age,
            gender: self.gender,
            height_cm: self.height,
            weight_kg: self.weight,
            activity: self.activity,
            goal: self.goal,
        }
    }
}

// ============================================================================
// Food Types
// ============================================================================

/// A logged meal or snack. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub calories: f64,
    /// Grams
    pub protein: f64,
    /// Grams
    pub carbs: f64,
    /// Grams
    pub fats: f64,
    #[serde(default)]
    pub description: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl FoodEntry {
    /// Creation instant as a UTC datetime
    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Whether the entry was logged on `day` as seen in `tz`
    pub fn is_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> bool {
        self.logged_at()
            .map(|t| t.with_timezone(tz).date_naive() == day)
            .unwrap_or(false)
    }

    /// Check the entry's own fields (uniqueness is checked by the log)
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation("food entry id must not be empty".into()));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Validation(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

/// An unsaved food entry, typed in manually or pre-filled from an analysis
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FoodDraft {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub description: String,
    pub image_url: Option<String>,
}

impl FoodDraft {
    /// Pre-fill a draft from an analysis result
    ///
    /// Returns `None` when the image was not recognised as food.
    pub fn from_analysis(result: &AnalysisResult) -> Option<Self> {
        if !result.is_food {
            return None;
        }
        Some(Self {
            name: result.food_name.clone(),
            calories: result.calories,
            protein: result.protein,
            carbs: result.carbs,
            fats: result.fats,
            description: result.description.clone(),
            image_url: None,
        })
    }

    /// Confirm the draft, assigning a fresh id and the creation timestamp
    pub fn into_entry(self, now: DateTime<Utc>) -> FoodEntry {
        FoodEntry {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            description: self.description,
            timestamp: now.timestamp_millis(),
            image_url: self.image_url,
        }
    }
}

/// Structured nutrition guess returned by the image analyzer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(default)]
    pub description: String,
    pub is_food: bool,
}

// ============================================================================
// Navigation Types
// ============================================================================

/// Screen the user asked for through navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Scanner,
    Profile,
}

/// Screen that is actually presented after the onboarding override
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    Dashboard,
    Scanner,
    Profile,
}
