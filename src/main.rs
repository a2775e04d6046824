mod app;
mod entry;
mod system;

use druk::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
