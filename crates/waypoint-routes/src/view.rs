//! Lazy view handles
//!
//! Route entries never hold views, only [`ViewHandle`]s naming them. The
//! host supplies a [`ViewLoader`]; [`ViewCache`] calls it at most once per
//! component and shares the result.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLoading {
    /// Loaded up front, typically layouts
    Eager,
    /// Loaded on the first navigation that proceeds to it
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    component: String,
    loading: ViewLoading,
}

impl ViewHandle {
    pub fn lazy(component: &str) -> Self {
        Self {
            component: component.to_string(),
            loading: ViewLoading::Lazy,
        }
    }

    pub fn eager(component: &str) -> Self {
        Self {
            component: component.to_string(),
            loading: ViewLoading::Eager,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn loading(&self) -> ViewLoading {
        self.loading
    }

    pub fn is_eager(&self) -> bool {
        self.loading == ViewLoading::Eager
    }
}

/// Materializes a named component. Implemented by the hosting shell.
pub trait ViewLoader: Send + Sync {
    type View: Send + Sync;

    fn load(&self, component: &str) -> Result<Self::View>;
}

pub struct ViewCache<L: ViewLoader> {
    loader: L,
    loaded: RwLock<HashMap<String, Arc<L::View>>>,
}

impl<L: ViewLoader> ViewCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn materialize(&self, handle: &ViewHandle) -> Result<Arc<L::View>> {
        if let Some(view) = self.loaded.read().get(handle.component()) {
            return Ok(Arc::clone(view));
        }

        let mut loaded = self.loaded.write();
        if let Some(view) = loaded.get(handle.component()) {
            return Ok(Arc::clone(view));
        }

        let view = Arc::new(self.loader.load(handle.component())?);
        tracing::debug!(
            component = %handle.component(),
            loading = ?handle.loading(),
            "Loaded view"
        );
        loaded.insert(handle.component().to_string(), Arc::clone(&view));

        Ok(view)
    }

    /// Materialize a layout chain, outermost first.
    pub fn materialize_chain(&self, handles: &[ViewHandle]) -> Result<Vec<Arc<L::View>>> {
        handles.iter().map(|h| self.materialize(h)).collect()
    }

    pub fn is_loaded(&self, component: &str) -> bool {
        self.loaded.read().contains_key(component)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.read().len()
    }
}
