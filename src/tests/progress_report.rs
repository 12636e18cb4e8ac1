#[cfg(test)]
mod tests {
    use crate::{
        models::progress::{RequirementType, StudentProgress, UserAchievement},
        service::progress_report::{ProgressReport, next_level_threshold},
        tests::common::{FakeApi, achievement, level, unlocked_at},
    };

    #[test]
    fn threshold_grows_with_square_of_level() {
        assert_eq!(next_level_threshold(1), 100);
        assert_eq!(next_level_threshold(2), 400);
        assert_eq!(next_level_threshold(5), 2500);
        assert_eq!(next_level_threshold(0), 100);
    }

    #[test]
    fn computes_distance_to_next_level() {
        let progress = StudentProgress {
            total_questions_attempted: 0,
            total_correct: 0,
            total_points: 0,
            accuracy: 0.0,
            subjects: vec![],
        };
        let report = ProgressReport::build(level(2, 250), vec![], vec![], progress);

        assert_eq!(report.next_level_threshold, 400);
        assert_eq!(report.experience_to_next_level, 150);
        assert_eq!(report.level_progress, 0.625);
        assert!(report.achievements.is_empty());
    }

    #[test]
    fn marks_unlocked_achievements() {
        let unlocked = vec![UserAchievement {
            id: 3,
            achievement: achievement(2, "On fire", RequirementType::Streak),
            unlocked_at: unlocked_at(),
        }];
        let available = vec![
            achievement(1, "First steps", RequirementType::TotalCorrect),
            achievement(2, "On fire", RequirementType::Streak),
            achievement(3, "Veteran", RequirementType::Level),
        ];
        let progress = StudentProgress {
            total_questions_attempted: 10,
            total_correct: 5,
            total_points: 50,
            accuracy: 50.0,
            subjects: vec![],
        };

        let report = ProgressReport::build(level(1, 50), unlocked, available, progress);
        let flags: Vec<bool> = report.achievements.iter().map(|a| a.unlocked()).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(report.achievements[1].unlocked_at, Some(unlocked_at()));
        assert_eq!(report.unlocked_count(), 1);
        assert_eq!(report.level_progress, 0.5);
    }

    #[tokio::test]
    async fn fetches_all_parts_together() {
        let api = FakeApi::new(vec![]);
        let report = ProgressReport::fetch(&api).await.unwrap();

        assert_eq!(report.level.level, 2);
        assert_eq!(report.experience_to_next_level, 150);
        assert_eq!(report.achievements.len(), 2);
        assert!(report.achievements[0].unlocked());
        assert!(!report.achievements[1].unlocked());
        assert_eq!(report.progress.subjects.len(), 1);
        assert_eq!(report.progress.total_points, 250);
    }
}
