mod progress;
mod summary;

pub(crate) use progress::spawn_progress_renderer;
pub(crate) use summary::print_report;
