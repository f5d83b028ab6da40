//! The JSON plan document: rows, context, and history, round-tripped by
//! headless callers between sessions.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use plangrid_engine::history::HistoryLog;
use plangrid_engine::row::PlanRow;
use plangrid_engine::session::{PlanContext, PlanSession};
use plangrid_engine::tree::{PlanTree, TreeError};

use crate::PLAN_FORMAT_VERSION;

/// One plan on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub context: PlanContext,
    pub rows: Vec<PlanRow>,
    #[serde(default)]
    pub history: HistoryLog,
}

fn default_version() -> u32 {
    PLAN_FORMAT_VERSION
}

impl PlanDocument {
    pub fn new(rows: Vec<PlanRow>, context: PlanContext) -> Self {
        Self {
            version: PLAN_FORMAT_VERSION,
            context,
            rows,
            history: HistoryLog::new(),
        }
    }

    /// Build the engine tree, validating the row structure.
    pub fn tree(&self) -> Result<PlanTree, TreeError> {
        PlanTree::new(self.rows.clone())
    }

    /// Start a session over this document's rows, context, and history.
    pub fn session(&self) -> Result<PlanSession, TreeError> {
        Ok(PlanSession::new(self.tree()?, self.context.clone())
            .with_history(self.history.clone()))
    }

    /// Fold a finished session back into the document.
    pub fn absorb(&mut self, session: &PlanSession) {
        self.rows = session.tree().rows().to_vec();
        self.history = session.history().clone();
        self.context = session.context().clone();
    }

    /// Load and structurally validate a plan document.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let document: PlanDocument = serde_json::from_str(&contents)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        if document.version > PLAN_FORMAT_VERSION {
            return Err(format!(
                "plan format v{} is newer than supported v{}",
                document.version, PLAN_FORMAT_VERSION
            ));
        }
        document.tree().map_err(|e| e.to_string())?;
        Ok(document)
    }

    /// Write the document as pretty JSON.
    pub fn store(&self, path: &Path) -> Result<(), String> {
        let file = File::create(path).map_err(|e| e.to_string())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| e.to_string())
    }
}
