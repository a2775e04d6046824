//! The load dispatcher: worker pool, deadline and progress stream.
mod dispatcher;
mod progress;
mod settings;
mod worker;


pub use dispatcher::{Dispatcher, run};
pub use progress::{
    PROGRESS_CHANNEL_CAPACITY, ProgressEvent, ProgressReceiver, ProgressSender, progress_channel,
};
pub use settings::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_PROGRESS_INTERVAL, DEFAULT_REQUEST_TIMEOUT, RunSettings,
    parse_endpoint,
};
