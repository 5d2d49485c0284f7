use crate::config::Config;
use crate::core::seed::SeedLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;
    let report = SeedLogic::seed_demo(&pool, cfg)?;

    if report.inspections == 0 && report.inspectors == 0 {
        info("Demo data already present, nothing added.");
    } else {
        success(format!(
            "Demo data loaded: {} inspector(s), {} inspection(s)",
            report.inspectors, report.inspections
        ));
    }
    Ok(())
}
