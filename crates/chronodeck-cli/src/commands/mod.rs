pub mod clock;
pub mod config;
pub mod deck;
pub mod presets;
pub mod stopwatch;
pub mod timer;

use std::error::Error;
use std::future::Future;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Run an async command on a fresh runtime.
pub fn block_on<F>(fut: F) -> CommandResult
where
    F: Future<Output = CommandResult>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(fut);
    // A pending stdin read would otherwise keep the process alive.
    runtime.shutdown_background();
    result
}
