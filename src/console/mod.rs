/// Console layer: prompts, printed reports, and the row pager.

pub mod pager;
pub mod prompt;
pub mod report;
