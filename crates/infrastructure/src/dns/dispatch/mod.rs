mod pool;
mod strategy;

pub use pool::dispatch_one;
pub use strategy::StrategyDispatcher;
