use crate::db::pool::DbPool;
use crate::db::store::{self, Index};
use crate::errors::AppResult;
use crate::models::dashboard::{DashboardFilter, DashboardSummary, DashboardTotals, SiteSummary};
use crate::models::inspection::{Inspection, InspectionStatus};
use crate::utils::date::year_month;
use std::collections::BTreeMap;

pub struct DashboardLogic;

impl DashboardLogic {
    /// Per-site status counts over the filtered inspection set.
    pub fn summary(pool: &DbPool, filter: &DashboardFilter) -> AppResult<DashboardSummary> {
        let area = filter.validate()?;
        let site_code = filter.site_code();

        let mut inspections: Vec<Inspection> = Vec::new();
        for status in InspectionStatus::ALL {
            let pk = format!("STATUS#{status}");
            inspections.extend(store::query_index_as::<Inspection>(&pool.conn, Index::Gsi2, &pk)?);
        }
        let loaded = inspections.len();

        let mut by_site: BTreeMap<String, Vec<&Inspection>> = BTreeMap::new();
        for i in &inspections {
            if i.site_code.trim().is_empty() {
                continue;
            }
            if site_code.is_some_and(|code| i.site_code != code) {
                continue;
            }
            if area.is_some_and(|a| !i.in_area(a)) {
                continue;
            }
            if filter.year.is_some() || filter.month.is_some() {
                let Some((y, m)) = i.start_date.as_deref().and_then(year_month) else {
                    continue;
                };
                if filter.year.is_some_and(|fy| fy != y) || filter.month.is_some_and(|fm| fm != m) {
                    continue;
                }
            }
            by_site.entry(i.site_code.clone()).or_default().push(i);
        }

        let sites: Vec<SiteSummary> = by_site
            .into_iter()
            .map(|(site_code, group)| {
                let count = |s: InspectionStatus| group.iter().filter(|i| i.status == s).count();
                let new_count = count(InspectionStatus::New);
                let in_progress_count = count(InspectionStatus::InProgress);
                let closed_count = count(InspectionStatus::Closed);
                SiteSummary {
                    site_name: group.first().and_then(|i| i.site_name.clone()),
                    site_code,
                    new_count,
                    in_progress_count,
                    closed_count,
                    total: new_count + in_progress_count + closed_count,
                }
            })
            .collect();

        tracing::debug!(loaded, sites = sites.len(), "dashboard aggregated");

        Ok(DashboardSummary {
            totals: DashboardTotals::from_sites(&sites),
            filters: filter.clone(),
            sites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::inspection::InspectionLogic;
    use crate::errors::AppError;
    use crate::models::inspection::{CreateInspectionRequest, UpdateInspectionRequest};

    fn add(pool: &DbPool, site: &str, name: &str, date: Option<&str>, status: InspectionStatus) {
        let cfg = Config::with_database(":memory:");
        let so = InspectionLogic::create(
            pool,
            &cfg,
            CreateInspectionRequest {
                unit_number: "U1".into(),
                site_code: site.into(),
                site_name: Some(name.into()),
                address: "1 Main St".into(),
                start_date: date.map(str::to_string),
                ..Default::default()
            },
        )
        .unwrap();
        if status != InspectionStatus::New {
            InspectionLogic::update(
                pool,
                &so,
                UpdateInspectionRequest {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .unwrap();
        }
    }

    fn fixture() -> DbPool {
        let pool = DbPool::open_in_memory().unwrap();
        add(&pool, "901", "Haddington", Some("2025-05-02"), InspectionStatus::New);
        add(&pool, "901", "Haddington", Some("2025-05-01"), InspectionStatus::InProgress);
        add(&pool, "801", "Queen Lane", Some("2025-04-20"), InspectionStatus::Closed);
        add(&pool, "701", "Martin Luther King", None, InspectionStatus::New);
        pool
    }

    #[test]
    fn groups_by_site_in_code_order() {
        let pool = fixture();
        let s = DashboardLogic::summary(&pool, &DashboardFilter::default()).unwrap();
        let codes: Vec<_> = s.sites.iter().map(|x| x.site_code.as_str()).collect();
        assert_eq!(codes, vec!["701", "801", "901"]);

        let haddington = &s.sites[2];
        assert_eq!(haddington.site_name.as_deref(), Some("Haddington"));
        assert_eq!(haddington.new_count, 1);
        assert_eq!(haddington.in_progress_count, 1);
        assert_eq!(haddington.total, 2);

        assert_eq!(s.totals.total, 4);
        assert_eq!(s.totals.closed, 1);
    }

    #[test]
    fn area_filter_uses_site_prefix() {
        let pool = fixture();
        let f = DashboardFilter {
            area: Some("CS".into()),
            ..Default::default()
        };
        let s = DashboardLogic::summary(&pool, &f).unwrap();
        assert_eq!(s.sites.len(), 1);
        assert_eq!(s.sites[0].site_code, "801");
    }

    #[test]
    fn month_filter_drops_undated_inspections() {
        let pool = fixture();
        let f = DashboardFilter {
            year: Some(2025),
            month: Some(5),
            ..Default::default()
        };
        let s = DashboardLogic::summary(&pool, &f).unwrap();
        assert_eq!(s.totals.total, 2);
        assert!(s.sites.iter().all(|x| x.site_code == "901"));
    }

    #[test]
    fn invalid_filters_are_rejected() {
        let pool = fixture();
        let f = DashboardFilter {
            month: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            DashboardLogic::summary(&pool, &f),
            Err(AppError::Validation(_))
        ));
    }
}
