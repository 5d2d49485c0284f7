use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::inspection::InspectionFilter;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        status,
        site,
        area,
        force,
    } = cmd
    {
        let filter = InspectionFilter {
            status: status.as_deref().map(str::parse).transpose()?,
            area: area.as_deref().map(str::parse).transpose()?,
            site_code: site.clone(),
        };

        let pool = DbPool::open(&cfg.database)?;
        ExportLogic::export(&pool, *format, file, &filter, *force)?;
    }
    Ok(())
}
