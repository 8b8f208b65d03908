// Chart data preparation: options, the per-symbol preparer, tick policy and batches
pub mod batch;
pub mod options;
pub mod preparer;
pub mod ticks;

pub use batch::{prepare_batch, prepare_symbol, select_symbols, ChartOutcome};
pub use options::ChartOptions;
pub use preparer::prepare;
pub use ticks::{axis_ticks, select_tick_policy};
