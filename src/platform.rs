use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog;
use crate::error::{PlatformError, Result};
use crate::models::{
    LearningModule, ModuleId, Scenario, ScenarioId, User, UserId, UserProgress, UserRole,
};

/// Owned in-memory store of every entity on the platform.
///
/// Nothing here is synchronized; callers sharing one `Platform` between
/// threads need to wrap the whole value in a single lock.
#[derive(Debug, Default, Clone)]
pub struct Platform {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) modules: BTreeMap<ModuleId, LearningModule>,
    pub(crate) scenarios: BTreeMap<ScenarioId, Scenario>,
    pub(crate) user_progress: BTreeMap<UserId, BTreeMap<ModuleId, UserProgress>>,
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_content() -> Self {
        let mut platform = Self::new();
        catalog::seed(&mut platform);
        platform
    }

    // User operations
    pub fn create_user(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> &User {
        let user = User::new(username, email, role);
        let id = user.id;
        debug!(user_id = %id, role = role.as_str(), "created user");

        self.user_progress.insert(id, BTreeMap::new());
        self.users.entry(id).or_insert(user)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    // Students ordered by username
    pub fn students(&self) -> Vec<&User> {
        let mut students: Vec<&User> = self
            .users
            .values()
            .filter(|u| u.role == UserRole::Student)
            .collect();
        students.sort_by(|a, b| a.username.cmp(&b.username).then(a.id.cmp(&b.id)));
        students
    }

    // Module operations
    pub fn add_module(&mut self, module: LearningModule) -> Result<ModuleId> {
        if self.modules.contains_key(&module.id) {
            return Err(PlatformError::DuplicateId(module.id));
        }

        // Only registered modules can be prerequisites, so the graph stays acyclic
        if let Some(missing) = module
            .prerequisites
            .iter()
            .find(|p| !self.modules.contains_key(p))
        {
            warn!(module = %module.id, prerequisite = %missing, "rejected module with unknown prerequisite");
            return Err(PlatformError::UnknownPrerequisite {
                module: module.id,
                prerequisite: *missing,
            });
        }

        let id = module.id;
        debug!(module_id = %id, title = %module.title, "registered module");
        self.modules.insert(id, module);
        Ok(id)
    }

    pub fn module(&self, id: &ModuleId) -> Option<&LearningModule> {
        self.modules.get(id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &LearningModule> {
        self.modules.values()
    }

    // Scenario operations
    pub fn add_scenario(&mut self, scenario: Scenario) -> Result<ScenarioId> {
        if self.scenarios.contains_key(&scenario.id) {
            return Err(PlatformError::DuplicateId(scenario.id));
        }
        if let Err(e) = check_scenario(&scenario) {
            warn!(scenario_id = %scenario.id, error = %e, "rejected scenario");
            return Err(e);
        }

        let id = scenario.id;
        debug!(scenario_id = %id, title = %scenario.title, "registered scenario");
        self.scenarios.insert(id, scenario);
        Ok(id)
    }

    pub fn scenario(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    // Progress operations
    pub fn progress(&self, user_id: &UserId, module_id: &ModuleId) -> Option<&UserProgress> {
        self.user_progress.get(user_id)?.get(module_id)
    }

    pub fn progress_for(&self, user_id: &UserId) -> impl Iterator<Item = &UserProgress> {
        self.user_progress
            .get(user_id)
            .into_iter()
            .flat_map(|modules| modules.values())
    }

    /// Records a completion report for a user on a module.
    ///
    /// The progress record keeps the highest completion ever reported while
    /// `User::progress` mirrors the value passed in this call.
    pub fn update_progress(
        &mut self,
        user_id: &UserId,
        module_id: &ModuleId,
        completion_percentage: f64,
        time_spent: u32,
    ) -> Result<()> {
        self.ensure_known(user_id, module_id)?;
        if !is_percentage(completion_percentage) {
            warn!(user_id = %user_id, module_id = %module_id, completion_percentage, "rejected progress update");
            return Err(PlatformError::InvalidPercentage(completion_percentage));
        }

        let progress = self.progress_entry(user_id, module_id);
        progress.completion_percentage = progress.completion_percentage.max(completion_percentage);
        progress.time_spent = progress.time_spent.saturating_add(time_spent);
        progress.last_accessed = Utc::now();

        if let Some(user) = self.users.get_mut(user_id) {
            user.progress.insert(*module_id, completion_percentage);
        }

        debug!(
            user_id = %user_id,
            module_id = %module_id,
            completion_percentage,
            time_spent,
            "updated progress"
        );
        Ok(())
    }

    pub fn record_quiz_score(
        &mut self,
        user_id: &UserId,
        module_id: &ModuleId,
        score: f64,
    ) -> Result<()> {
        self.ensure_known(user_id, module_id)?;
        if !is_percentage(score) {
            warn!(user_id = %user_id, module_id = %module_id, score, "rejected quiz score");
            return Err(PlatformError::InvalidScore(score));
        }

        let progress = self.progress_entry(user_id, module_id);
        progress.quiz_scores.push(score);
        progress.last_accessed = Utc::now();

        debug!(user_id = %user_id, module_id = %module_id, score, "recorded quiz score");
        Ok(())
    }

    /// Grades answer indices against the module's assessment and records the
    /// resulting percentage as a quiz score.
    pub fn submit_quiz(
        &mut self,
        user_id: &UserId,
        module_id: &ModuleId,
        answers: &[usize],
    ) -> Result<f64> {
        self.ensure_known(user_id, module_id)?;
        let module = &self.modules[module_id];

        let questions = &module.assessment_questions;
        if questions.is_empty() {
            return Err(PlatformError::NoAssessment(*module_id));
        }
        if questions.len() != answers.len() {
            return Err(PlatformError::AnswerCountMismatch {
                expected: questions.len(),
                got: answers.len(),
            });
        }

        let correct = questions
            .iter()
            .zip(answers)
            .filter(|(q, a)| q.is_correct(**a))
            .count();
        let score = correct as f64 / questions.len() as f64 * 100.0;

        self.record_quiz_score(user_id, module_id, score)?;
        Ok(score)
    }

    pub fn record_scenario_completion(
        &mut self,
        user_id: &UserId,
        module_id: &ModuleId,
        scenario_id: &ScenarioId,
    ) -> Result<()> {
        self.ensure_known(user_id, module_id)?;
        if !self.scenarios.contains_key(scenario_id) {
            return Err(PlatformError::ScenarioNotFound(*scenario_id));
        }

        let progress = self.progress_entry(user_id, module_id);
        if !progress.scenario_completions.contains(scenario_id) {
            progress.scenario_completions.push(*scenario_id);
        }
        progress.last_accessed = Utc::now();

        debug!(user_id = %user_id, scenario_id = %scenario_id, "recorded scenario completion");
        Ok(())
    }

    fn ensure_known(&self, user_id: &UserId, module_id: &ModuleId) -> Result<()> {
        if !self.users.contains_key(user_id) {
            return Err(PlatformError::UserNotFound(*user_id));
        }
        if !self.modules.contains_key(module_id) {
            return Err(PlatformError::ModuleNotFound(*module_id));
        }
        Ok(())
    }

    fn progress_entry(&mut self, user_id: &UserId, module_id: &ModuleId) -> &mut UserProgress {
        self.user_progress
            .entry(*user_id)
            .or_default()
            .entry(*module_id)
            .or_insert_with(|| UserProgress::new(*user_id, *module_id))
    }

    /// Checks a loaded store against the invariants the mutators enforce:
    /// map keys match record ids, percentages and scores are in range, and
    /// prerequisites are acyclic.
    pub(crate) fn validate(&self) -> Result<()> {
        check_keys(&self.users, |u| u.id)?;
        check_keys(&self.modules, |m| m.id)?;
        check_keys(&self.scenarios, |s| s.id)?;

        for user in self.users.values() {
            if let Some(p) = user.progress.values().find(|p| !is_percentage(**p)) {
                return Err(PlatformError::InvalidPercentage(*p));
            }
        }
        for scenario in self.scenarios.values() {
            check_scenario(scenario)?;
        }

        for (user_id, records) in &self.user_progress {
            for (module_id, record) in records {
                if record.user_id != *user_id {
                    return Err(PlatformError::KeyMismatch {
                        key: *user_id,
                        id: record.user_id,
                    });
                }
                if record.module_id != *module_id {
                    return Err(PlatformError::KeyMismatch {
                        key: *module_id,
                        id: record.module_id,
                    });
                }
                if !is_percentage(record.completion_percentage) {
                    return Err(PlatformError::InvalidPercentage(record.completion_percentage));
                }
                if let Some(score) = record.quiz_scores.iter().find(|s| !is_percentage(**s)) {
                    return Err(PlatformError::InvalidScore(*score));
                }
            }
        }

        self.check_prerequisite_cycles()
    }

    /// Fails on the first module found on a prerequisite cycle. Unknown
    /// prerequisite ids are not followed.
    fn check_prerequisite_cycles(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit(
            id: ModuleId,
            modules: &BTreeMap<ModuleId, LearningModule>,
            marks: &mut BTreeMap<ModuleId, Mark>,
        ) -> Result<()> {
            match marks.get(&id) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(PlatformError::PrerequisiteCycle(id)),
                None => {}
            }

            marks.insert(id, Mark::Visiting);
            if let Some(module) = modules.get(&id) {
                for prereq in &module.prerequisites {
                    if modules.contains_key(prereq) {
                        visit(*prereq, modules, marks)?;
                    }
                }
            }
            marks.insert(id, Mark::Done);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        for id in self.modules.keys() {
            visit(*id, &self.modules, &mut marks)?;
        }
        Ok(())
    }
}

fn check_keys<T>(records: &BTreeMap<Uuid, T>, id_of: impl Fn(&T) -> Uuid) -> Result<()> {
    match records.iter().find(|(key, record)| id_of(record) != **key) {
        Some((key, record)) => Err(PlatformError::KeyMismatch {
            key: *key,
            id: id_of(record),
        }),
        None => Ok(()),
    }
}

fn check_scenario(scenario: &Scenario) -> Result<()> {
    match scenario.options.iter().find(|o| !o.has_valid_score()) {
        Some(option) => Err(PlatformError::InvalidEthicsScore(option.ethics_score)),
        None => Ok(()),
    }
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}
