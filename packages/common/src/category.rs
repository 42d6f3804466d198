#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audience a prompt is written for. Each category carries its own list of
/// predefined tags; `Miscellaneous` accepts custom tags only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum Category {
    #[serde(rename = "Preclinical Students")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Preclinical Students"))]
    PreclinicalStudents,
    #[serde(rename = "Clinical Students")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Clinical Students"))]
    ClinicalStudents,
    #[serde(rename = "Residents")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Residents"))]
    Residents,
    #[serde(rename = "Miscellaneous")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Miscellaneous"))]
    Miscellaneous,
}

impl Category {
    /// All categories in display order.
    pub const ALL: &'static [Category] = &[
        Self::PreclinicalStudents,
        Self::ClinicalStudents,
        Self::Residents,
        Self::Miscellaneous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PreclinicalStudents => "Preclinical Students",
            Self::ClinicalStudents => "Clinical Students",
            Self::Residents => "Residents",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Tags a submitter may pick from for this category, sorted.
    pub fn predefined_tags(&self) -> &'static [&'static str] {
        match self {
            Self::PreclinicalStudents => &[
                "Anatomy Helper",
                "Case Simulator (Pre-Clinical)",
                "Concept Instruction",
                "Mnemonic Generator",
                "USMLE Step1",
            ],
            Self::ClinicalStudents => &[
                "Case Simulator (Clinical)",
                "Clerkship Prep",
                "Clinical Translation",
                "Note Taker",
                "Scribing",
                "USMLE Step2",
            ],
            Self::Residents => &[
                "Case Simulator (Resident)",
                "Fellowship Coach",
                "Guideline Check",
                "ICD-10 Helper",
                "USMLE Step3",
            ],
            Self::Miscellaneous => &[],
        }
    }

    pub fn has_predefined_tag(&self, tag: &str) -> bool {
        self.predefined_tags().contains(&tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}'")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.label() == s)
            .copied()
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}
