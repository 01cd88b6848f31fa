use std::cmp::Ordering;

use crate::models::Skill;

/// Fields a skill list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Category,
    ProficiencyLevel,
    ProgressPercentage,
    StartedAt,
    LastUpdated,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a field as it appears on the wire (and in stored documents)
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "name" => Some(SortField::Name),
            "category" => Some(SortField::Category),
            "proficiencyLevel" => Some(SortField::ProficiencyLevel),
            "progressPercentage" => Some(SortField::ProgressPercentage),
            "startedAt" => Some(SortField::StartedAt),
            "lastUpdated" => Some(SortField::LastUpdated),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Category => "category",
            SortField::ProficiencyLevel => "proficiencyLevel",
            SortField::ProgressPercentage => "progressPercentage",
            SortField::StartedAt => "startedAt",
            SortField::LastUpdated => "lastUpdated",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    fn compare(&self, a: &Skill, b: &Skill) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::ProficiencyLevel => a.proficiency_level.cmp(&b.proficiency_level),
            SortField::ProgressPercentage => a.progress_percentage.cmp(&b.progress_percentage),
            SortField::StartedAt => a.started_at.cmp(&b.started_at),
            SortField::LastUpdated => a.last_updated.cmp(&b.last_updated),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Filter and ordering for listing one user's skills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillQuery {
    /// Lowercased category to match exactly
    pub category: Option<String>,
    /// Never empty; ties after these keys fall back to id ascending
    pub sort: Vec<SortKey>,
}

impl Default for SkillQuery {
    fn default() -> Self {
        Self {
            category: None,
            sort: vec![SortKey {
                field: SortField::LastUpdated,
                descending: true,
            }],
        }
    }
}

impl SkillQuery {
    /// Build from raw query-string values. Unknown and repeated sort fields
    /// are skipped; if nothing usable remains the default (newest first) applies.
    pub fn from_params(category: Option<&str>, sort: Option<&str>) -> Self {
        let category = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        let mut keys: Vec<SortKey> = Vec::new();
        for token in sort.unwrap_or_default().split(',').map(str::trim) {
            let (descending, name) = match token.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, token),
            };
            // First mention of a field decides its direction
            if let Some(field) = SortField::parse(name) {
                if !keys.iter().any(|k| k.field == field) {
                    keys.push(SortKey { field, descending });
                }
            }
        }

        let mut query = Self {
            category,
            ..Self::default()
        };
        if !keys.is_empty() {
            query.sort = keys;
        }
        query
    }

    pub fn matches(&self, skill: &Skill) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| skill.category.as_str() == c)
    }

    /// Total order used by every storage backend
    pub fn compare(&self, a: &Skill, b: &Skill) -> Ordering {
        self.sort
            .iter()
            .map(|key| {
                let ord = key.field.compare(a, b);
                if key.descending {
                    ord.reverse()
                } else {
                    ord
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_last_updated_desc() {
        let query = SkillQuery::from_params(None, None);
        assert_eq!(query.category, None);
        assert_eq!(
            query.sort,
            vec![SortKey {
                field: SortField::LastUpdated,
                descending: true
            }]
        );
    }

    #[test]
    fn test_parses_comma_separated_sort() {
        let query = SkillQuery::from_params(None, Some("-proficiencyLevel, name"));
        assert_eq!(
            query.sort,
            vec![
                SortKey {
                    field: SortField::ProficiencyLevel,
                    descending: true
                },
                SortKey {
                    field: SortField::Name,
                    descending: false
                },
            ]
        );
    }

    #[test]
    fn test_unknown_sort_fields_ignored() {
        let query = SkillQuery::from_params(None, Some("password,-user"));
        assert_eq!(query.sort, SkillQuery::default().sort);

        let query = SkillQuery::from_params(None, Some("bogus,name"));
        assert_eq!(query.sort.len(), 1);
        assert_eq!(query.sort[0].field, SortField::Name);
    }

    #[test]
    fn test_repeated_sort_field_keeps_first_direction() {
        let query = SkillQuery::from_params(
            None,
            Some("name,-name,-proficiencyLevel,proficiencyLevel"),
        );
        assert_eq!(
            query.sort,
            vec![
                SortKey {
                    field: SortField::Name,
                    descending: false
                },
                SortKey {
                    field: SortField::ProficiencyLevel,
                    descending: true
                },
            ]
        );
    }

    #[test]
    fn test_category_normalized() {
        let query = SkillQuery::from_params(Some(" Frontend "), None);
        assert_eq!(query.category.as_deref(), Some("frontend"));

        let query = SkillQuery::from_params(Some(""), None);
        assert_eq!(query.category, None);
    }
}
