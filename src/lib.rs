// Library exports for the Quoridor bot
// This allows the replay tool, arena and tests to use the core engine

pub mod bot;
pub mod config;
pub mod connectivity;
pub mod debug_logger;
pub mod difficulty;
pub mod evaluation;
pub mod movegen;
pub mod replay;
pub mod search;
pub mod selfplay;
pub mod simple_profiler;
pub mod types;
