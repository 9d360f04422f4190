use std::fmt;

use metrics_core::{Breakdown, FlatRecord, GroupKey};

/// The six fixed groupings of the usage export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    UserSummary,
    ByIde,
    ByFeature,
    ByLanguageFeature,
    ByLanguageModel,
    ByModelFeature,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::UserSummary,
        Dimension::ByIde,
        Dimension::ByFeature,
        Dimension::ByLanguageFeature,
        Dimension::ByLanguageModel,
        Dimension::ByModelFeature,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::UserSummary => "user_summary",
            Self::ByIde => "by_ide",
            Self::ByFeature => "by_feature",
            Self::ByLanguageFeature => "by_language_feature",
            Self::ByLanguageModel => "by_language_model",
            Self::ByModelFeature => "by_model_feature",
        }
    }

    /// Breakdown family this dimension reads. Other families are ignored.
    pub fn source(self) -> Breakdown {
        match self {
            Self::UserSummary => Breakdown::UserDay,
            Self::ByIde => Breakdown::Ide,
            Self::ByFeature => Breakdown::Feature,
            Self::ByLanguageFeature => Breakdown::LanguageFeature,
            Self::ByLanguageModel => Breakdown::LanguageModel,
            Self::ByModelFeature => Breakdown::ModelFeature,
        }
    }

    pub fn key_of(self, record: &FlatRecord) -> Option<GroupKey> {
        if record.breakdown != self.source() {
            return None;
        }
        let user_login = Some(record.user_login.clone());
        let user_id = record.user_id.clone();
        let key = match self {
            Self::UserSummary => GroupKey {
                user_login,
                user_id,
                ..GroupKey::default()
            },
            Self::ByIde => GroupKey {
                user_login,
                user_id,
                ide: record.ide.clone(),
                ..GroupKey::default()
            },
            Self::ByFeature => GroupKey {
                user_login,
                user_id,
                feature: record.feature.clone(),
                ..GroupKey::default()
            },
            Self::ByLanguageFeature => GroupKey {
                language: record.language.clone(),
                feature: record.feature.clone(),
                ..GroupKey::default()
            },
            Self::ByLanguageModel => GroupKey {
                language: record.language.clone(),
                model: record.model.clone(),
                ..GroupKey::default()
            },
            Self::ByModelFeature => GroupKey {
                model: record.model.clone(),
                feature: record.feature.clone(),
                ..GroupKey::default()
            },
        };
        Some(key)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
