//! Editor-facing queries over a published [`IndexView`].
//!
//! [`SpringIde`] never mutates the index. It answers from one immutable view, so results are
//! consistent with each other but may lag behind indexing that is still running; callers that
//! need fresh data wait for quiescence on the [`SpringIndexer`] first.

mod completion;
mod lens;
mod query;
mod references;
mod symbols;

use std::sync::Arc;

use sprig_index::{Hierarchies, IndexView, SpringIndexer};

pub use completion::{CompletionContext, RankedCandidate};
pub use lens::CodeLens;
pub use query::{BeanFilter, BeanInfo, InjectionInfo};

#[derive(Clone)]
pub struct SpringIde {
    view: Arc<IndexView>,
    hierarchies: Arc<Hierarchies>,
}

impl SpringIde {
    pub fn new(view: Arc<IndexView>, hierarchies: Arc<Hierarchies>) -> Self {
        Self { view, hierarchies }
    }

    /// Façade over the indexer's most recently published view.
    pub fn from_indexer(indexer: &SpringIndexer) -> Self {
        Self::new(indexer.view(), indexer.hierarchies())
    }

    pub fn view(&self) -> &IndexView {
        &self.view
    }

    pub(crate) fn hierarchies(&self) -> &Hierarchies {
        &self.hierarchies
    }
}
