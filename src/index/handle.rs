//! Owned, explicitly rebuildable index state.
//!
//! The handle loads its source and builds on first use, then hands out the
//! same `Arc<BuiltIndex>` until it is invalidated. Queries only ever see a
//! fully built index: rebuilding needs `&mut self`, so it cannot overlap
//! with readers borrowing the handle.

use crate::index::build::build_index_from_sheets;
use crate::index::types::BuiltIndex;
use crate::source::TableSource;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub struct IndexHandle<S> {
    source: S,
    built: Option<Arc<BuiltIndex>>,
    generation: u64,
}

impl<S: TableSource> IndexHandle<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            built: None,
            generation: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// Number of successful builds so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current index without triggering a build
    pub fn current(&self) -> Option<Arc<BuiltIndex>> {
        self.built.clone()
    }

    /// The current index, building it from the source if needed
    pub fn get(&mut self) -> Result<Arc<BuiltIndex>> {
        if let Some(built) = &self.built {
            return Ok(Arc::clone(built));
        }

        let built = Arc::new(self.build()?);
        self.built = Some(Arc::clone(&built));
        self.generation += 1;
        Ok(built)
    }

    /// Drop the current index; the next [`get`](Self::get) rebuilds it
    pub fn invalidate(&mut self) {
        if self.built.take().is_some() {
            info!(source = %self.source.describe(), "index invalidated");
        }
    }

    /// Invalidate and rebuild. On failure the handle is left empty.
    pub fn refresh(&mut self) -> Result<Arc<BuiltIndex>> {
        self.invalidate();
        self.get()
    }

    fn build(&self) -> Result<BuiltIndex> {
        let description = self.source.describe();
        let sheets = self
            .source
            .load_tables()
            .with_context(|| format!("Failed to load {}", description))?;

        let built = build_index_from_sheets(&sheets)?;
        Ok(built)
    }
}
