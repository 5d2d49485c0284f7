use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::server;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { addr } = cmd {
        let addr = addr.clone().unwrap_or_else(|| cfg.server_addr.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::Other(format!("cannot start runtime: {e}")))?;

        runtime.block_on(server::serve(cfg.clone(), &addr))?;
    }
    Ok(())
}
