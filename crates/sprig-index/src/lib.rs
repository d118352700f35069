//! Spring element index.
//!
//! Parsed Java units are walked by [`IndexPipeline`]; every annotation occurrence is handed to
//! the [`IndexProvider`]s registered for its type or any of its meta-annotations. Providers
//! build an [`ElementGraph`] of beans, injection points, event listeners/publishers and
//! routes. Finished files are published as [`FileIndexSnapshot`]s and read through an
//! immutable [`IndexView`]. [`SpringIndexer`] runs the pipeline on a background pool.

mod context;
mod dispatch;
mod element;
mod graph;
mod pipeline;
mod project;
mod provider;
pub mod providers;
mod service;
mod snapshot;
mod source;
mod view;

pub use context::{Hierarchies, Pass, PassContext};
pub use element::{
    AnnotationMetadata, AttributeValue, Bean, ElementKind, ElementTree, EventListener,
    EventPublisher, IndexElement, IndexedSymbol, InjectionPoint, PlainSymbol, RouteHandler,
    SymbolKind, Variant,
};
pub use graph::{ElementGraph, ElementId, GraphError};
pub use pipeline::{
    FileStamp, IndexPipeline, IndexReport, InvalidPassLimit, PipelineConfig, DEFAULT_MAX_PASSES,
};
pub use project::ProjectRoot;
pub use provider::{AnnotationSite, IndexProvider, ProviderError, ProviderRegistry, SiteTarget};
pub use service::{IndexerConfig, IndexerError, SpringIndexer};
pub use snapshot::FileIndexSnapshot;
pub use source::{FsSourceStore, MemorySourceStore, SourceError, SourceStore};
pub use view::{BeanRef, IndexView};
