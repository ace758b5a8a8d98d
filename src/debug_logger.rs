// Debug logging module for asynchronous decision logging
//
// Fire-and-forget async logging so the game loop never waits on disk.
// Each decision's snapshot, chosen move and decision inputs (seed and avoid
// cell) are written as one JSONL line.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::difficulty::Difficulty;
use crate::search::{DecisionInputs, SearchReport};
use crate::types::GameState;

/// Represents a single debug log entry
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    ply: u32,
    player: usize,
    difficulty: Difficulty,
    chosen_move: Option<String>,
    inputs: DecisionInputs,
    table_entries: usize,
    state: GameState,
    timestamp: String,
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking.
    /// The handle may be awaited before shutdown so the line is not lost.
    pub fn log_decision(
        &self,
        ply: u32,
        player: usize,
        difficulty: Difficulty,
        state: GameState,
        report: &SearchReport,
    ) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }

        let file_handle = self.file.clone();
        let entry = DebugLogEntry {
            ply,
            player,
            difficulty,
            chosen_move: report.best_move.map(|m| m.to_string()),
            inputs: report.inputs,
            table_entries: report.table_entries,
            state,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        Some(tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        }))
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}
