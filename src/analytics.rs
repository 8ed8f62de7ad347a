use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::models::{
    mean, Feedback, LearnerResponse, LearningModule, ModuleCategory, ModuleCompletionRate,
    ModuleId, StudentAnalytics, StudentInfo, StudentProgressSummary, TeacherDashboard, UserId,
    UserRole,
};
use crate::platform::Platform;

const REMEDIAL_BELOW: f64 = 60.0;
const ADVANCE_ABOVE: f64 = 85.0;
// Category average quiz score that makes a module preferred
const STRONG_CATEGORY_ABOVE: f64 = 75.0;

impl Platform {
    /// Modules the user can start next, easiest first then by title.
    ///
    /// A module is offered when the user has not completed it and has
    /// completed every prerequisite. Unknown users get an empty path.
    pub fn personalized_learning_path(&self, user_id: &UserId) -> Vec<&LearningModule> {
        let Some(user) = self.user(user_id) else {
            return Vec::new();
        };

        let mut available: Vec<&LearningModule> = self
            .modules()
            .filter(|m| !user.has_completed(&m.id))
            .filter(|m| m.prerequisites.iter().all(|p| user.has_completed(p)))
            .collect();

        available.sort_by(|a, b| {
            a.difficulty
                .rank()
                .cmp(&b.difficulty.rank())
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        available
    }

    pub fn adaptive_feedback(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
        response: &LearnerResponse,
    ) -> Result<Feedback> {
        if self.user(user_id).is_none() {
            return Err(PlatformError::UserNotFound(*user_id));
        }
        if self.module(module_id).is_none() {
            return Err(PlatformError::ModuleNotFound(*module_id));
        }
        debug!(user_id = %user_id, module_id = %module_id, ?response, "generating feedback");

        let Some(progress) = self.progress(user_id, module_id) else {
            return Ok(Feedback::default());
        };
        let avg_score = progress.average_quiz_score().unwrap_or(0.0);

        let feedback = if avg_score < REMEDIAL_BELOW {
            Feedback {
                message: "Consider reviewing the foundational concepts before moving forward."
                    .to_string(),
                suggestions: to_strings(&[
                    "Revisit the basic definitions",
                    "Try the interactive exercises again",
                    "Watch supplementary videos",
                ]),
                next_steps: Vec::new(),
                difficulty_adjustment: -1,
            }
        } else if avg_score > ADVANCE_ABOVE {
            Feedback {
                message: "Excellent work! You're ready for more advanced topics.".to_string(),
                suggestions: to_strings(&[
                    "Explore advanced scenarios",
                    "Try the challenge problems",
                    "Consider peer tutoring opportunities",
                ]),
                next_steps: Vec::new(),
                difficulty_adjustment: 1,
            }
        } else {
            Feedback {
                message: "Good progress! Keep practicing to solidify your understanding."
                    .to_string(),
                suggestions: to_strings(&[
                    "Complete additional practice scenarios",
                    "Review areas where you scored lower",
                ]),
                next_steps: Vec::new(),
                difficulty_adjustment: 0,
            }
        };
        Ok(feedback)
    }

    /// Class-wide statistics; only teachers may ask for them.
    pub fn teacher_dashboard(&self, teacher_id: &UserId) -> Result<TeacherDashboard> {
        match self.user(teacher_id) {
            Some(user) if user.role == UserRole::Teacher => {}
            _ => return Err(PlatformError::AccessDenied(*teacher_id)),
        }

        let students = self.students();

        let student_progress = students
            .iter()
            .map(|student| {
                let mut time_spent = 0u32;
                let mut last_active = student.created_at;
                for record in self.progress_for(&student.id) {
                    time_spent = time_spent.saturating_add(record.time_spent);
                    last_active = last_active.max(record.last_accessed);
                }

                let reported: Vec<f64> = student.progress.values().copied().collect();
                StudentProgressSummary {
                    student_id: student.id,
                    student_name: student.username.clone(),
                    completion_rate: mean(&reported).unwrap_or(0.0),
                    time_spent,
                    last_active,
                }
            })
            .collect();

        let mut module_completion_rates: Vec<ModuleCompletionRate> = self
            .modules()
            .map(|module| {
                let completed = students
                    .iter()
                    .filter(|s| s.has_completed(&module.id))
                    .count();
                let completion_rate = if students.is_empty() {
                    0.0
                } else {
                    completed as f64 / students.len() as f64 * 100.0
                };
                ModuleCompletionRate {
                    module_id: module.id,
                    title: module.title.clone(),
                    completion_rate,
                }
            })
            .collect();
        module_completion_rates.sort_by(|a, b| {
            a.title
                .cmp(&b.title)
                .then_with(|| a.module_id.cmp(&b.module_id))
        });

        Ok(TeacherDashboard {
            total_students: students.len(),
            student_progress,
            module_completion_rates,
            common_challenges: Vec::new(),
            recommendations: Vec::new(),
        })
    }

    pub fn student_analytics(&self, student_id: &UserId) -> Result<StudentAnalytics> {
        let student = match self.user(student_id) {
            Some(user) if user.role == UserRole::Student => user,
            _ => return Err(PlatformError::StudentNotFound(*student_id)),
        };

        let records: Vec<_> = self.progress_for(student_id).collect();
        let completions: Vec<f64> = records.iter().map(|r| r.completion_percentage).collect();
        let all_scores: Vec<f64> = records
            .iter()
            .flat_map(|r| r.quiz_scores.iter().copied())
            .collect();

        Ok(StudentAnalytics {
            student_info: StudentInfo {
                name: student.username.clone(),
                email: student.email.clone(),
                join_date: student.created_at.date_naive(),
            },
            overall_progress: mean(&completions).unwrap_or(0.0),
            total_time_spent: records
                .iter()
                .fold(0u32, |acc, r| acc.saturating_add(r.time_spent)),
            modules_completed: records.iter().filter(|r| r.is_completed()).count(),
            modules_in_progress: records.iter().filter(|r| r.is_in_progress()).count(),
            average_quiz_score: mean(&all_scores).unwrap_or(0.0),
            strengths: Vec::new(),
            areas_for_improvement: Vec::new(),
            next_recommendations: Vec::new(),
        })
    }

    /// Picks the first available module in a category the user scores well in,
    /// falling back to the head of the learning path.
    pub fn recommend_next_module(&self, user_id: &UserId) -> Option<&LearningModule> {
        let candidates = self.personalized_learning_path(user_id);
        let first = *candidates.first()?;

        let performance = self.category_performance(user_id);
        let preferred = candidates.into_iter().find(|m| {
            performance
                .get(&m.category)
                .is_some_and(|avg| *avg > STRONG_CATEGORY_ABOVE)
        });

        Some(preferred.unwrap_or(first))
    }

    // Mean of per-module quiz averages, grouped by module category
    fn category_performance(&self, user_id: &UserId) -> BTreeMap<ModuleCategory, f64> {
        let mut grouped: BTreeMap<ModuleCategory, Vec<f64>> = BTreeMap::new();
        for record in self.progress_for(user_id) {
            let (Some(module), Some(avg)) =
                (self.module(&record.module_id), record.average_quiz_score())
            else {
                continue;
            };
            grouped.entry(module.category).or_default().push(avg);
        }

        grouped
            .into_iter()
            .filter_map(|(category, averages)| mean(&averages).map(|avg| (category, avg)))
            .collect()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ETHICS_TITLE, INTRO_TITLE};
    use crate::models::DifficultyLevel;
    use uuid::Uuid;

    fn module_id(platform: &Platform, title: &str) -> ModuleId {
        platform
            .modules()
            .find(|m| m.title == title)
            .map(|m| m.id)
            .expect("sample module should exist")
    }

    fn add_module(
        platform: &mut Platform,
        title: &str,
        category: ModuleCategory,
        difficulty: DifficultyLevel,
        prerequisites: &[ModuleId],
    ) -> ModuleId {
        let mut module = LearningModule::new(title, "", category, difficulty);
        module.prerequisites = prerequisites.to_vec();
        platform.add_module(module).unwrap()
    }

    fn scored(platform: &mut Platform, user: &UserId, module: &ModuleId, scores: &[f64]) {
        for score in scores {
            platform.record_quiz_score(user, module, *score).unwrap();
        }
    }

    mod learning_path_tests {
        use super::*;

        #[test]
        fn unknown_user_gets_empty_path() {
            let platform = Platform::with_sample_content();
            assert!(platform
                .personalized_learning_path(&Uuid::new_v4())
                .is_empty());
        }

        #[test]
        fn new_user_only_sees_modules_without_prerequisites() {
            let mut platform = Platform::with_sample_content();
            let user = platform.create_user("emma", "e@x", UserRole::Student).id;

            let path = platform.personalized_learning_path(&user);
            let titles: Vec<&str> = path.iter().map(|m| m.title.as_str()).collect();
            assert_eq!(titles, vec![INTRO_TITLE]);
        }

        #[test]
        fn completing_prerequisite_unlocks_next_module() {
            let mut platform = Platform::with_sample_content();
            let user = platform.create_user("emma", "e@x", UserRole::Student).id;
            let intro = module_id(&platform, INTRO_TITLE);

            platform.update_progress(&user, &intro, 100.0, 45).unwrap();

            let path = platform.personalized_learning_path(&user);
            let titles: Vec<&str> = path.iter().map(|m| m.title.as_str()).collect();
            assert_eq!(titles, vec![ETHICS_TITLE]);
        }

        #[test]
        fn just_below_threshold_does_not_unlock() {
            let mut platform = Platform::with_sample_content();
            let user = platform.create_user("james", "j@x", UserRole::Student).id;
            let intro = module_id(&platform, INTRO_TITLE);

            platform.update_progress(&user, &intro, 89.9, 10).unwrap();

            let path = platform.personalized_learning_path(&user);
            assert_eq!(path.len(), 1);
            assert_eq!(path[0].id, intro);
        }

        #[test]
        fn path_follows_last_reported_value() {
            let mut platform = Platform::with_sample_content();
            let user = platform.create_user("maria", "m@x", UserRole::Student).id;
            let intro = module_id(&platform, INTRO_TITLE);

            platform.update_progress(&user, &intro, 95.0, 10).unwrap();
            platform.update_progress(&user, &intro, 40.0, 10).unwrap();

            // The record keeps 95 but the path reads the user's latest report
            let path = platform.personalized_learning_path(&user);
            assert_eq!(path[0].id, intro);
            assert_eq!(
                platform.progress(&user, &intro).unwrap().completion_percentage,
                95.0
            );
        }

        #[test]
        fn sorted_by_difficulty_then_title() {
            let mut platform = Platform::new();
            add_module(
                &mut platform,
                "Zeta",
                ModuleCategory::Applications,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Alpha",
                ModuleCategory::Applications,
                DifficultyLevel::Advanced,
                &[],
            );
            add_module(
                &mut platform,
                "Beta",
                ModuleCategory::Applications,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Gamma",
                ModuleCategory::Applications,
                DifficultyLevel::Intermediate,
                &[],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;

            let titles: Vec<String> = platform
                .personalized_learning_path(&user)
                .iter()
                .map(|m| m.title.clone())
                .collect();
            assert_eq!(titles, vec!["Beta", "Zeta", "Gamma", "Alpha"]);
        }

        #[test]
        fn never_offers_completed_or_locked_modules() {
            let mut platform = Platform::new();
            let a = add_module(
                &mut platform,
                "A",
                ModuleCategory::AiBasics,
                DifficultyLevel::Beginner,
                &[],
            );
            let b = add_module(
                &mut platform,
                "B",
                ModuleCategory::AiBasics,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "C",
                ModuleCategory::Applications,
                DifficultyLevel::Intermediate,
                &[a, b],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;
            platform.update_progress(&user, &a, 92.0, 5).unwrap();

            let path = platform.personalized_learning_path(&user);
            let titles: Vec<&str> = path.iter().map(|m| m.title.as_str()).collect();
            assert_eq!(titles, vec!["B"]);

            for module in &path {
                assert!(!platform.user(&user).unwrap().has_completed(&module.id));
                for prereq in &module.prerequisites {
                    assert!(platform.user(&user).unwrap().has_completed(prereq));
                }
            }
        }
    }

    mod feedback_tests {
        use super::*;

        fn setup() -> (Platform, UserId, ModuleId) {
            let mut platform = Platform::with_sample_content();
            let user = platform.create_user("emma", "e@x", UserRole::Student).id;
            let intro = module_id(&platform, INTRO_TITLE);
            (platform, user, intro)
        }

        #[test]
        fn unknown_user_or_module_is_not_found() {
            let (platform, user, intro) = setup();
            let response = LearnerResponse::default();

            let err = platform
                .adaptive_feedback(&Uuid::new_v4(), &intro, &response)
                .unwrap_err();
            assert!(matches!(err, PlatformError::UserNotFound(_)));

            let err = platform
                .adaptive_feedback(&user, &Uuid::new_v4(), &response)
                .unwrap_err();
            assert!(matches!(err, PlatformError::ModuleNotFound(_)));
        }

        #[test]
        fn no_progress_record_returns_empty_feedback() {
            let (platform, user, intro) = setup();
            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback, Feedback::default());
        }

        #[test]
        fn low_scores_get_remedial_feedback() {
            let (mut platform, user, intro) = setup();
            platform.update_progress(&user, &intro, 40.0, 80).unwrap();
            scored(&mut platform, &user, &intro, &[45.0, 52.0, 48.0]);

            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback.difficulty_adjustment, -1);
            assert_eq!(
                feedback.message,
                "Consider reviewing the foundational concepts before moving forward."
            );
            assert_eq!(feedback.suggestions.len(), 3);
            assert!(feedback.next_steps.is_empty());
        }

        #[test]
        fn high_scores_get_advancement_feedback() {
            let (mut platform, user, intro) = setup();
            scored(&mut platform, &user, &intro, &[88.0, 92.0, 85.0, 90.0]);

            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback.difficulty_adjustment, 1);
            assert_eq!(
                feedback.message,
                "Excellent work! You're ready for more advanced topics."
            );
            assert_eq!(feedback.suggestions.len(), 3);
        }

        #[test]
        fn middle_scores_get_encouragement() {
            let (mut platform, user, intro) = setup();
            scored(&mut platform, &user, &intro, &[65.0, 72.0, 68.0]);

            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback.difficulty_adjustment, 0);
            assert!(feedback.message.starts_with("Good progress!"));
            assert_eq!(feedback.suggestions.len(), 2);
        }

        #[test]
        fn boundaries_are_inclusive_of_middle_tier() {
            let (mut platform, user, intro) = setup();
            scored(&mut platform, &user, &intro, &[60.0]);
            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback.difficulty_adjustment, 0);

            let (mut platform, user, intro) = setup();
            scored(&mut platform, &user, &intro, &[85.0]);
            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback.difficulty_adjustment, 0);
        }

        #[test]
        fn record_without_scores_is_remedial() {
            let (mut platform, user, intro) = setup();
            platform.update_progress(&user, &intro, 75.0, 20).unwrap();

            let feedback = platform
                .adaptive_feedback(&user, &intro, &LearnerResponse::default())
                .unwrap();
            assert_eq!(feedback.difficulty_adjustment, -1);
        }

        #[test]
        fn response_content_does_not_change_policy() {
            let (mut platform, user, intro) = setup();
            scored(&mut platform, &user, &intro, &[45.0]);
            let response = LearnerResponse {
                quiz_score: Some(99.0),
                time_spent: Some(45),
                ..Default::default()
            };

            let feedback = platform.adaptive_feedback(&user, &intro, &response).unwrap();
            assert_eq!(feedback.difficulty_adjustment, -1);
        }
    }

    mod dashboard_tests {
        use super::*;

        #[test]
        fn non_teacher_is_denied() {
            let mut platform = Platform::with_sample_content();
            let student = platform.create_user("s", "s@x", UserRole::Student).id;
            let admin = platform.create_user("a", "a@x", UserRole::Admin).id;

            for id in [student, admin, Uuid::new_v4()] {
                assert!(matches!(
                    platform.teacher_dashboard(&id),
                    Err(PlatformError::AccessDenied(denied)) if denied == id
                ));
            }
        }

        #[test]
        fn zero_students_gives_zero_rates() {
            let mut platform = Platform::with_sample_content();
            let teacher = platform.create_user("t", "t@x", UserRole::Teacher).id;

            let dashboard = platform.teacher_dashboard(&teacher).unwrap();
            assert_eq!(dashboard.total_students, 0);
            assert!(dashboard.student_progress.is_empty());
            assert_eq!(dashboard.module_completion_rates.len(), 2);
            for module in platform.modules() {
                assert_eq!(dashboard.completion_rate_for(&module.id), Some(0.0));
            }
        }

        #[test]
        fn aggregates_students() {
            let mut platform = Platform::with_sample_content();
            let teacher = platform.create_user("dr_smith", "t@x", UserRole::Teacher).id;
            let emma = platform.create_user("emma_chen", "e@x", UserRole::Student).id;
            let james = platform.create_user("james_wilson", "j@x", UserRole::Student).id;
            let maria = platform.create_user("maria_garcia", "m@x", UserRole::Student).id;
            let intro = module_id(&platform, INTRO_TITLE);
            let ethics = module_id(&platform, ETHICS_TITLE);

            platform.update_progress(&emma, &intro, 100.0, 45).unwrap();
            platform.update_progress(&emma, &ethics, 50.0, 15).unwrap();
            platform.update_progress(&james, &intro, 70.0, 60).unwrap();
            platform.update_progress(&maria, &intro, 40.0, 80).unwrap();

            let dashboard = platform.teacher_dashboard(&teacher).unwrap();
            assert_eq!(dashboard.total_students, 3);

            let names: Vec<&str> = dashboard
                .student_progress
                .iter()
                .map(|s| s.student_name.as_str())
                .collect();
            assert_eq!(names, vec!["emma_chen", "james_wilson", "maria_garcia"]);

            let emma_summary = &dashboard.student_progress[0];
            assert_eq!(emma_summary.completion_rate, 75.0);
            assert_eq!(emma_summary.time_spent, 60);
            let emma_user = platform.user(&emma).unwrap();
            assert!(emma_summary.last_active >= emma_user.created_at);

            let intro_rate = dashboard.completion_rate_for(&intro).unwrap();
            assert!((intro_rate - 100.0 / 3.0).abs() < 1e-9);
            assert_eq!(dashboard.completion_rate_for(&ethics), Some(0.0));
            assert!(dashboard.common_challenges.is_empty());
            assert!(dashboard.recommendations.is_empty());
        }

        #[test]
        fn inactive_student_last_active_is_creation_time() {
            let mut platform = Platform::with_sample_content();
            let teacher = platform.create_user("t", "t@x", UserRole::Teacher).id;
            let idle = platform.create_user("idle", "i@x", UserRole::Student).id;

            let dashboard = platform.teacher_dashboard(&teacher).unwrap();
            let summary = &dashboard.student_progress[0];
            assert_eq!(summary.completion_rate, 0.0);
            assert_eq!(summary.time_spent, 0);
            assert_eq!(summary.last_active, platform.user(&idle).unwrap().created_at);
        }
    }

    mod student_analytics_tests {
        use super::*;

        #[test]
        fn unknown_or_non_student_is_not_found() {
            let mut platform = Platform::with_sample_content();
            let teacher = platform.create_user("t", "t@x", UserRole::Teacher).id;

            for id in [teacher, Uuid::new_v4()] {
                let err = platform.student_analytics(&id).unwrap_err();
                assert!(matches!(err, PlatformError::StudentNotFound(_)));
                assert!(err.is_not_found());
            }
        }

        #[test]
        fn empty_student_has_zeroes() {
            let mut platform = Platform::with_sample_content();
            let student = platform.create_user("s", "s@x", UserRole::Student).id;

            let analytics = platform.student_analytics(&student).unwrap();
            assert_eq!(analytics.student_info.name, "s");
            assert_eq!(analytics.overall_progress, 0.0);
            assert_eq!(analytics.total_time_spent, 0);
            assert_eq!(analytics.modules_completed, 0);
            assert_eq!(analytics.modules_in_progress, 0);
            assert_eq!(analytics.average_quiz_score, 0.0);
            assert!(analytics.strengths.is_empty());
            assert!(analytics.areas_for_improvement.is_empty());
            assert!(analytics.next_recommendations.is_empty());
        }

        #[test]
        fn aggregates_progress_records() {
            let mut platform = Platform::with_sample_content();
            let student = platform
                .create_user("test_student", "student@test.com", UserRole::Student)
                .id;
            let intro = module_id(&platform, INTRO_TITLE);
            let ethics = module_id(&platform, ETHICS_TITLE);

            platform.update_progress(&student, &intro, 95.0, 60).unwrap();
            platform.update_progress(&student, &ethics, 45.0, 20).unwrap();
            scored(&mut platform, &student, &intro, &[78.0, 82.0]);
            scored(&mut platform, &student, &ethics, &[88.0, 84.0]);

            let analytics = platform.student_analytics(&student).unwrap();
            assert_eq!(analytics.student_info.email, "student@test.com");
            assert_eq!(analytics.overall_progress, 70.0);
            assert_eq!(analytics.total_time_spent, 80);
            assert_eq!(analytics.modules_completed, 1);
            assert_eq!(analytics.modules_in_progress, 1);
            assert_eq!(analytics.average_quiz_score, 83.0);
        }

        #[test]
        fn uses_running_max_completion() {
            let mut platform = Platform::with_sample_content();
            let student = platform.create_user("s", "s@x", UserRole::Student).id;
            let intro = module_id(&platform, INTRO_TITLE);

            platform.update_progress(&student, &intro, 92.0, 10).unwrap();
            platform.update_progress(&student, &intro, 20.0, 10).unwrap();

            let analytics = platform.student_analytics(&student).unwrap();
            assert_eq!(analytics.modules_completed, 1);
            assert_eq!(analytics.overall_progress, 92.0);
        }
    }

    mod recommendation_tests {
        use super::*;

        #[test]
        fn unknown_user_gets_none() {
            let platform = Platform::with_sample_content();
            assert!(platform.recommend_next_module(&Uuid::new_v4()).is_none());
        }

        #[test]
        fn nothing_available_gets_none() {
            let mut platform = Platform::with_sample_content();
            let user = platform.create_user("u", "u@x", UserRole::Student).id;
            let ids: Vec<ModuleId> = platform.modules().map(|m| m.id).collect();
            for id in &ids {
                platform.update_progress(&user, id, 100.0, 0).unwrap();
            }
            assert!(platform.recommend_next_module(&user).is_none());
        }

        #[test]
        fn no_quiz_history_returns_head_of_path() {
            let mut platform = Platform::new();
            add_module(
                &mut platform,
                "Prompting",
                ModuleCategory::PracticalSkills,
                DifficultyLevel::Intermediate,
                &[],
            );
            add_module(
                &mut platform,
                "Spotting Deepfakes",
                ModuleCategory::CriticalThinking,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "AI at Work",
                ModuleCategory::Applications,
                DifficultyLevel::Beginner,
                &[],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;

            let recommended = platform.recommend_next_module(&user).unwrap();
            assert_eq!(recommended.title, "AI at Work");
        }

        #[test]
        fn prefers_strong_category() {
            let mut platform = Platform::new();
            let basics_done = add_module(
                &mut platform,
                "Basics Done",
                ModuleCategory::AiBasics,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Applications",
                ModuleCategory::Applications,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Basics Advanced",
                ModuleCategory::AiBasics,
                DifficultyLevel::Advanced,
                &[],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;
            platform
                .update_progress(&user, &basics_done, 100.0, 30)
                .unwrap();
            scored(&mut platform, &user, &basics_done, &[80.0, 90.0]);

            let recommended = platform.recommend_next_module(&user).unwrap();
            assert_eq!(recommended.title, "Basics Advanced");
        }

        #[test]
        fn weak_category_keeps_default() {
            let mut platform = Platform::new();
            let basics_done = add_module(
                &mut platform,
                "Basics Done",
                ModuleCategory::AiBasics,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Applications",
                ModuleCategory::Applications,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Basics Advanced",
                ModuleCategory::AiBasics,
                DifficultyLevel::Advanced,
                &[],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;
            platform
                .update_progress(&user, &basics_done, 100.0, 30)
                .unwrap();
            scored(&mut platform, &user, &basics_done, &[75.0]);

            let recommended = platform.recommend_next_module(&user).unwrap();
            assert_eq!(recommended.title, "Applications");
        }

        #[test]
        fn first_strong_candidate_wins() {
            let mut platform = Platform::new();
            let ethics_done = add_module(
                &mut platform,
                "Ethics Done",
                ModuleCategory::EthicsBias,
                DifficultyLevel::Beginner,
                &[],
            );
            let apps_done = add_module(
                &mut platform,
                "Apps Done",
                ModuleCategory::Applications,
                DifficultyLevel::Beginner,
                &[],
            );
            add_module(
                &mut platform,
                "Ethics Next",
                ModuleCategory::EthicsBias,
                DifficultyLevel::Intermediate,
                &[],
            );
            add_module(
                &mut platform,
                "Apps Next",
                ModuleCategory::Applications,
                DifficultyLevel::Intermediate,
                &[],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;
            platform.update_progress(&user, &ethics_done, 100.0, 0).unwrap();
            platform.update_progress(&user, &apps_done, 100.0, 0).unwrap();
            scored(&mut platform, &user, &ethics_done, &[99.0]);
            scored(&mut platform, &user, &apps_done, &[80.0]);

            // "Apps Next" sorts first and clears the bar, even though ethics scores higher
            let recommended = platform.recommend_next_module(&user).unwrap();
            assert_eq!(recommended.title, "Apps Next");
        }

        #[test]
        fn category_average_is_mean_of_module_averages() {
            let mut platform = Platform::new();
            let a = add_module(
                &mut platform,
                "A",
                ModuleCategory::AiBasics,
                DifficultyLevel::Beginner,
                &[],
            );
            let b = add_module(
                &mut platform,
                "B",
                ModuleCategory::AiBasics,
                DifficultyLevel::Beginner,
                &[],
            );
            let user = platform.create_user("u", "u@x", UserRole::Student).id;
            // Module means 100 and 60: category mean 80, pooled mean would be 70
            scored(&mut platform, &user, &a, &[100.0]);
            scored(&mut platform, &user, &b, &[60.0, 60.0, 60.0]);

            let performance = platform.category_performance(&user);
            assert_eq!(performance[&ModuleCategory::AiBasics], 80.0);
        }
    }
}
