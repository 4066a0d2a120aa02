//! Application state controller.
//!
//! [`App`] owns the profile, the food log and the current view, and is the
//! only place that mutates them. Every mutation is mirrored to the injected
//! [`KeyValueStore`]; write failures are logged and the in-memory state stays
//! authoritative for the session.

use crate::calculator::compute_profile;
use crate::config::TargetConfig;
use crate::food_log::FoodLog;
use crate::router;
use crate::storage::{read_json, write_json, KeyValueStore, PROFILE_KEY};
use crate::summary::{summarize, DailySummary};
use crate::{FoodDraft, FoodEntry, ProfileInput, Result, Screen, UserProfile, View};
use chrono::{Local, NaiveDate, TimeZone, Utc};

pub struct App<S: KeyValueStore> {
    store: S,
    targets: TargetConfig,
    profile: Option<UserProfile>,
    log: FoodLog,
    current_view: View,
}

impl<S: KeyValueStore> App<S> {
    /// Load the persisted profile and food log and start on the dashboard
    pub fn open(store: S, targets: TargetConfig) -> Self {
        let profile: Option<UserProfile> = read_json(&store, PROFILE_KEY);
        let log = FoodLog::load_all(&store);
        tracing::debug!(
            "Opened app state (profile: {}, entries: {})",
            profile.is_some(),
            log.len()
        );
        Self {
            store,
            targets,
            profile,
            log,
            current_view: View::default(),
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn log(&self) -> &FoodLog {
        &self.log
    }

    pub fn entries(&self) -> &[FoodEntry] {
        self.log.entries()
    }

    pub fn targets(&self) -> &TargetConfig {
        &self.targets
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// View last requested through navigation
    pub fn current_view(&self) -> View {
        self.current_view
    }

    /// Screen actually presented, with onboarding forced until a profile exists
    pub fn screen(&self) -> Screen {
        router::resolve_screen(self.profile.is_some(), self.current_view)
    }

    pub fn navigation_visible(&self) -> bool {
        router::navigation_visible(self.profile.is_some())
    }

    pub fn header_target(&self) -> Option<i64> {
        router::header_target(self.profile.as_ref())
    }

    /// Compute and store a new profile, replacing any previous one
    ///
    /// On success the dashboard is shown. On a validation error nothing
    /// changes, including the current view.
    pub fn save_profile(&mut self, input: &ProfileInput) -> Result<&UserProfile> {
        let profile = compute_profile(input, &self.targets)?;

        if let Err(e) = write_json(&mut self.store, PROFILE_KEY, &profile) {
            tracing::warn!("Failed to persist profile: {}. Keeping in-memory state.", e);
        }
        tracing::info!(
            "Saved profile (target {:.0} kcal/day)",
            profile.target_calories
        );

        self.current_view = View::Dashboard;
        Ok(&*self.profile.insert(profile))
    }

    /// Log a food entry and return to the dashboard
    pub fn add_food(&mut self, entry: FoodEntry) -> Result<&[FoodEntry]> {
        self.log.add_entry(entry, &mut self.store)?;
        self.current_view = View::Dashboard;
        Ok(self.log.entries())
    }

    /// Confirm a draft as a new entry stamped with the current time
    pub fn add_draft(&mut self, draft: FoodDraft) -> Result<&FoodEntry> {
        let entry = draft.into_entry(Utc::now());
        self.add_food(entry)?;
        Ok(&self.log.entries()[0])
    }

    /// Remove an entry; the current view is unchanged
    pub fn delete_food(&mut self, id: &str) -> &[FoodEntry] {
        self.log.delete_entry(id, &mut self.store)
    }

    pub fn navigate(&mut self, view: View) {
        tracing::debug!("Navigate to {:?}", view);
        self.current_view = view;
    }

    /// Intake for `day` against the current target
    pub fn summary_for<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> DailySummary {
        let target = self.profile.as_ref().map(|p| p.target_calories);
        summarize(self.log.entries(), target, day, tz)
    }

    /// Intake for today in the local timezone
    pub fn today_summary(&self) -> DailySummary {
        self.summary_for(Local::now().date_naive(), &Local)
    }
}
