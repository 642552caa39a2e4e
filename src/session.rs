// src/session.rs
use crate::calendar::CalendarAction;
use crate::config::options::Options;
use crate::core::Page;
use crate::error::PageError;
use crate::orchestrator::{Orchestrator, RunReport};
use crate::registry::GameId;

/// One page load. Owns the document, the orchestrator (and so the processed
/// registry) and every action added so far. A different document means a new
/// session.
pub struct PageSession {
    page: Page,
    orchestrator: Orchestrator,
    actions: Vec<CalendarAction>,
    last_report: Option<RunReport>,
}

impl PageSession {
    pub fn open(markup: &str, address: &str, options: Options) -> Result<Self, PageError> {
        Ok(Self {
            page: Page::parse(markup, address)?,
            orchestrator: Orchestrator::new(options),
            actions: Vec::new(),
            last_report: None,
        })
    }

    /// Initial load or a settled mutation burst.
    pub fn run(&mut self) -> &RunReport {
        let report = self.orchestrator.run(&mut self.page);
        self.actions.extend(report.inserted.iter().cloned());
        self.last_report.insert(report)
    }

    /// The page re-rendered. Already processed games stay processed.
    pub fn apply_mutation(&mut self, markup: &str) {
        self.page.replace_markup(markup);
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn actions(&self) -> &[CalendarAction] {
        &self.actions
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    pub fn options(&self) -> &Options {
        self.orchestrator.options()
    }

    pub fn set_options(&mut self, options: Options) {
        self.orchestrator.set_options(options);
    }

    pub fn processed(&self) -> usize {
        self.orchestrator.registry().len()
    }

    pub fn is_processed(&self, id: &GameId) -> bool {
        self.orchestrator.registry().has(id)
    }
}
