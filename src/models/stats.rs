use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Skill;

const RECENT_UPDATES_LIMIT: usize = 5;

/// Dashboard statistics over one user's skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillStats {
    pub total_skills: u64,
    pub average_proficiency: f64,
    pub category_breakdown: BTreeMap<String, u64>,
    pub recent_updates: Vec<RecentUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentUpdate {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub last_updated: OffsetDateTime,
}

impl SkillStats {
    pub fn from_skills(skills: &[Skill]) -> Self {
        let total = skills.len();

        let average_proficiency = if total == 0 {
            0.0
        } else {
            let sum: i64 = skills.iter().map(|s| i64::from(s.proficiency_level)).sum();
            round_to_hundredths(sum as f64 / total as f64)
        };

        let mut category_breakdown = BTreeMap::new();
        for skill in skills {
            *category_breakdown
                .entry(skill.category.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut by_recency: Vec<&Skill> = skills.iter().collect();
        by_recency.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

        let recent_updates = by_recency
            .into_iter()
            .take(RECENT_UPDATES_LIMIT)
            .map(|s| RecentUpdate {
                id: s.id,
                name: s.name.clone(),
                last_updated: s.last_updated,
            })
            .collect();

        Self {
            total_skills: total as u64,
            average_proficiency,
            category_breakdown,
            recent_updates,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
