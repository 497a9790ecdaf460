use std::io::{BufRead, Write};

use anyhow::Result;

use crate::config::ExplorerConfig;
use crate::console::pager::display_data;
use crate::console::prompt::{get_filters, Console};
use crate::console::report;
use crate::data::loader::load_data;

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

/// Owns the configuration and the console for the lifetime of the program.
pub struct Session<R, W> {
    config: ExplorerConfig,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: ExplorerConfig, console: Console<R, W>) -> Self {
        Self { config, console }
    }

    /// Run filter → load → report → page until the user declines to
    /// restart.  A data error ends the session immediately.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.run_once()?;
            if !self
                .console
                .confirm("\nWould you like to restart? Enter yes or no: ")?
            {
                log::debug!("Session finished");
                return Ok(());
            }
        }
    }

    fn run_once(&mut self) -> Result<()> {
        let selection = get_filters(&mut self.console, &self.config)?;
        let table = load_data(&self.config, &selection)?;

        let out = self.console.output();
        report::time_stats(&table, out)?;
        report::station_stats(&table, out)?;
        report::trip_duration_stats(&table, out)?;
        report::user_stats(&table, out)?;

        display_data(&table, &mut self.console)
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }
}
