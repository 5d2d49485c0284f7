use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service area, derived from the first digit of a site code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceArea {
    /// Scattered Sites, 9xx
    #[serde(rename = "SS")]
    Ss,
    /// Conventional Sites, 8xx
    #[serde(rename = "CS")]
    Cs,
    /// 7xx
    #[serde(rename = "AMPB")]
    Ampb,
    /// 6xx
    #[serde(rename = "PAPMC")]
    Papmc,
}

impl ServiceArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ss => "SS",
            Self::Cs => "CS",
            Self::Ampb => "AMPB",
            Self::Papmc => "PAPMC",
        }
    }

    pub fn site_prefix(&self) -> char {
        match self {
            Self::Ss => '9',
            Self::Cs => '8',
            Self::Ampb => '7',
            Self::Papmc => '6',
        }
    }

    /// Sites without a code belong to no area.
    pub fn contains_site(&self, site_code: &str) -> bool {
        site_code.trim().starts_with(self.site_prefix())
    }
}

impl fmt::Display for ServiceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceArea {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SS" => Ok(Self::Ss),
            "CS" => Ok(Self::Cs),
            "AMPB" => Ok(Self::Ampb),
            "PAPMC" => Ok(Self::Papmc),
            _ => Err(AppError::validation([format!(
                "area must be one of SS, CS, AMPB, PAPMC (got '{s}')"
            )])),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardFilter {
    pub area: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub site_code: Option<String>,
}

impl DashboardFilter {
    /// Validate the filter and return the parsed area, if any. Blank strings
    /// count as absent.
    pub fn validate(&self) -> AppResult<Option<ServiceArea>> {
        let mut errors = Vec::new();

        let area = match self.area.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) => match a.parse::<ServiceArea>() {
                Ok(area) => Some(area),
                Err(e) => {
                    errors.push(e.to_string());
                    None
                }
            },
            None => None,
        };

        if let Some(m) = self.month
            && !(1..=12).contains(&m)
        {
            errors.push(format!("month must be between 1 and 12 (got {m})"));
        }

        if errors.is_empty() {
            Ok(area)
        } else {
            Err(AppError::validation(errors))
        }
    }

    pub fn site_code(&self) -> Option<&str> {
        self.site_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub site_code: String,
    pub site_name: Option<String>,
    pub new_count: usize,
    pub in_progress_count: usize,
    pub closed_count: usize,
    #[serde(rename = "totalCount")]
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub new: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub total: usize,
}

impl DashboardTotals {
    pub fn from_sites(sites: &[SiteSummary]) -> Self {
        let mut t = Self::default();
        for s in sites {
            t.new += s.new_count;
            t.in_progress += s.in_progress_count;
            t.closed += s.closed_count;
        }
        t.total = t.new + t.in_progress + t.closed;
        t
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub filters: DashboardFilter,
    pub sites: Vec<SiteSummary>,
    pub totals: DashboardTotals,
}
