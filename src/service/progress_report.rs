use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::{
    api::quiz_api::QuizApi,
    models::{
        error::QuizError,
        progress::{Achievement, StudentProgress, UserAchievement, UserLevel},
    },
};

#[derive(Debug, Serialize, Clone)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked_at: Option<NaiveDateTime>,
}

impl AchievementStatus {
    pub fn unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ProgressReport {
    pub level: UserLevel,
    pub next_level_threshold: i64,
    pub experience_to_next_level: i64,
    pub level_progress: f64,
    pub achievements: Vec<AchievementStatus>,
    pub progress: StudentProgress,
}

/// Total experience at which `level` rolls over into the next one.
pub fn next_level_threshold(level: i32) -> i64 {
    let level = i64::from(level.max(1));
    level * level * 100
}

impl ProgressReport {
    pub fn build(
        level: UserLevel,
        unlocked: Vec<UserAchievement>,
        available: Vec<Achievement>,
        progress: StudentProgress,
    ) -> Self {
        let threshold = next_level_threshold(level.level);
        let experience_to_next_level = (threshold - level.total_experience).max(0);
        let level_progress = (level.total_experience as f64 / threshold as f64).clamp(0.0, 1.0);

        let achievements = available
            .into_iter()
            .map(|achievement| {
                let unlocked_at = unlocked
                    .iter()
                    .find(|u| u.achievement.id == achievement.id)
                    .map(|u| u.unlocked_at);
                AchievementStatus {
                    achievement,
                    unlocked_at,
                }
            })
            .collect();

        Self {
            level,
            next_level_threshold: threshold,
            experience_to_next_level,
            level_progress,
            achievements,
            progress,
        }
    }

    pub async fn fetch<A: QuizApi>(api: &A) -> Result<Self, QuizError> {
        let (level, unlocked, available, progress) = tokio::try_join!(
            api.fetch_level(),
            api.fetch_achievements(),
            api.fetch_available_achievements(),
            api.fetch_progress(),
        )?;

        debug!(
            "Fetched progress: level {}, {} of {} achievements unlocked",
            level.level,
            unlocked.len(),
            available.len()
        );
        Ok(Self::build(level, unlocked, available, progress))
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked()).count()
    }
}
