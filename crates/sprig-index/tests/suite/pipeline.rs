use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use sprig_annotations::RegistryError;
use sprig_core::Span;
use sprig_index::providers::ComponentProvider;
use sprig_index::{
    AnnotationSite, FileStamp, IndexElement, IndexProvider, PassContext, PipelineConfig,
    PlainSymbol, ProjectRoot, ProviderError, ProviderRegistry,
};
use sprig_java::{names, TypeDecl};
use sprig_scheduler::{CancellationToken, Cancelled};

use super::{component, labels, uri, Workspace};

const SERVICE: &str = r#"
package com.example;

import org.springframework.beans.factory.annotation.Autowired;
import org.springframework.stereotype.Service;

@Service
public class CustomerService {
    @Autowired
    private CustomerRepository repository;
}
"#;

#[test]
fn reindexing_unchanged_text_is_idempotent() {
    let mut ws = Workspace::new();
    let uri = ws.add("CustomerService.java", SERVICE);

    ws.index(1);
    let first = ws.snapshot(&uri);

    let report = ws.index(1);
    assert_eq!(report.reused, 1);
    assert!(report.indexed.is_empty());
    assert!(Arc::ptr_eq(&first, &ws.snapshot(&uri)));

    // A new stamp forces a rebuild from the same text.
    let report = ws.index(2);
    assert_eq!(report.indexed, vec![uri.clone()]);
    let second = ws.snapshot(&uri);
    assert_eq!(second.elements, first.elements);
    assert_eq!(second.symbols, first.symbols);
    assert_eq!(second.last_modified, 2);
    assert_eq!(ws.pipeline.graph().len(), 2);
}

#[test]
fn changed_files_replace_their_previous_output() {
    let mut ws = Workspace::new();
    let uri = ws.add("CustomerService.java", SERVICE);
    ws.index(1);

    ws.add(
        "CustomerService.java",
        &SERVICE.replace("@Service", "@Service(\"customers\")"),
    );
    ws.index(2);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec!["@+ 'customers' (@Service <: @Component) CustomerService"]
    );
    assert_eq!(snapshot.symbols.len(), 1);
    assert_eq!(ws.pipeline.view().beans().count(), 1);
}

#[test]
fn removed_files_disappear_from_the_view() {
    let mut ws = Workspace::new();
    let uri = ws.add("CustomerService.java", SERVICE);
    ws.index(1);

    assert!(ws.pipeline.remove_file(&uri));
    assert!(ws.pipeline.view().is_empty());
    assert!(ws.pipeline.graph().is_empty());
    assert!(!ws.pipeline.remove_file(&uri));
}

#[test]
fn files_are_attributed_to_the_innermost_project() {
    let mut ws = Workspace::with_config(PipelineConfig {
        projects: vec![
            ProjectRoot::new("ws", "file:///ws"),
            ProjectRoot::new("src", "file:///ws/src"),
        ],
        ..PipelineConfig::default()
    });
    let uri = ws.add("CustomerService.java", SERVICE);
    ws.index(1);
    assert_eq!(ws.snapshot(&uri).project.as_deref(), Some("src"));

    ws.pipeline
        .set_projects(vec![ProjectRoot::new("ws", "file:///ws")]);
    assert_eq!(ws.snapshot(&uri).project.as_deref(), Some("ws"));
    let view = ws.pipeline.view();
    let projects: Vec<_> = view.beans().map(|b| b.project).collect();
    assert_eq!(projects, vec![Some("ws")]);
}

#[test]
fn cancelled_runs_keep_the_previous_snapshot() {
    let mut ws = Workspace::new();
    let uri = ws.add("CustomerService.java", SERVICE);
    ws.index(1);

    let token = CancellationToken::new();
    token.cancel();
    let result = ws
        .pipeline
        .run(&[FileStamp::new(uri.clone(), 2)], &ws.store, &token);
    assert_eq!(result, Err(Cancelled));

    // The previous snapshot survives an aborted rebuild.
    assert_eq!(ws.snapshot(&uri).last_modified, 1);
}

/// Cancels `token` when visiting `target`, once armed.
pub(crate) struct CancelAt {
    pub target: &'static str,
    pub token: CancellationToken,
    pub armed: AtomicBool,
}

impl CancelAt {
    pub fn new(target: &'static str, token: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            target,
            token,
            armed: AtomicBool::new(false),
        })
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl IndexProvider for CancelAt {
    fn name(&self) -> &'static str {
        "cancel-at"
    }

    fn on_type_declaration(
        &self,
        ty: &TypeDecl,
        _cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        if ty.name == self.target && self.armed.swap(false, Ordering::SeqCst) {
            self.token.cancel();
        }
        Ok(())
    }
}

#[test]
fn cancelling_mid_run_drops_only_the_files_already_purged() {
    let token = CancellationToken::new();
    let cancel = CancelAt::new("Alpha", token.clone());
    let mut registry = ProviderRegistry::with_defaults().unwrap();
    registry.register_declaration(cancel.clone());

    let mut ws = Workspace::with_registry(registry, PipelineConfig::default());
    let alpha = ws.add("Alpha.java", &component("Alpha"));
    let beta = ws.add("Beta.java", &component("Beta"));
    ws.index(1);

    cancel.arm();
    let stamps = [FileStamp::new(alpha.clone(), 2), FileStamp::new(beta.clone(), 2)];
    assert_eq!(ws.pipeline.run(&stamps, &ws.store, &token), Err(Cancelled));

    // Alpha was purged before the provider cancelled; Beta was never reached.
    assert!(ws.pipeline.snapshot(&alpha).is_none());
    assert_eq!(ws.snapshot(&beta).last_modified, 1);
    let view = ws.pipeline.view();
    let names: Vec<_> = view.beans().map(|bean| bean.name()).collect();
    assert_eq!(names, vec!["beta"]);

    // The next run rebuilds Alpha even though its stamp did not move, and reuses Beta.
    let report = ws
        .pipeline
        .run(
            &[FileStamp::new(alpha.clone(), 2), FileStamp::new(beta.clone(), 1)],
            &ws.store,
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.indexed, vec![alpha.clone()]);
    assert_eq!(report.reused, 1);
    assert_eq!(
        labels(&ws.snapshot(&alpha).elements),
        vec!["@+ 'alpha' (@Component) Alpha"]
    );
    assert_eq!(ws.pipeline.view().beans().count(), 2);
}

/// Adds an element, then fails.
struct Faulty;

impl IndexProvider for Faulty {
    fn name(&self) -> &'static str {
        "faulty"
    }

    fn on_annotation(
        &self,
        site: &AnnotationSite<'_>,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        let location = cx.location(site.annotation.span);
        cx.add_root(IndexElement::new(PlainSymbol {}, "partial", location));
        cx.add_symbol("partial", sprig_index::SymbolKind::Annotation, Span::new(0, 0));
        Err(ProviderError::Other("broken provider".into()))
    }
}

struct Panicking;

impl IndexProvider for Panicking {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn on_annotation(
        &self,
        _site: &AnnotationSite<'_>,
        _cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        panic!("provider bug")
    }
}

#[test]
fn provider_faults_only_drop_their_own_output() {
    let mut registry = ProviderRegistry::new();
    registry
        .register_annotation(names::SERVICE, Arc::new(Panicking), false)
        .unwrap();
    registry
        .register_annotation(names::AUTOWIRED, Arc::new(Faulty), false)
        .unwrap();
    registry
        .register_annotation(names::COMPONENT, Arc::new(ComponentProvider), false)
        .unwrap();

    let mut ws = Workspace::with_registry(registry, PipelineConfig::default());
    let uri = ws.add("CustomerService.java", SERVICE);
    let other = ws.add(
        "Other.java",
        "package com.example;\n@org.springframework.stereotype.Component\nclass Other {}\n",
    );
    let report = ws.index(1);
    assert_eq!(report.indexed.len(), 2);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec!["@+ 'customerService' (@Service <: @Component) CustomerService"]
    );
    assert_eq!(snapshot.symbols.len(), 1);
    assert_eq!(
        labels(&ws.snapshot(&other).elements),
        vec!["@+ 'other' (@Component) Other"]
    );
}

#[test]
fn duplicate_bindings_fail_at_registration() {
    let mut registry = ProviderRegistry::with_defaults().unwrap();
    let err = registry
        .register_annotation(names::COMPONENT, Arc::new(ComponentProvider), false)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateBinding {
            key: names::COMPONENT.to_string()
        }
    );
}

#[test]
fn sources_on_disk_are_indexed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CustomerService.java");
    std::fs::write(&path, SERVICE).unwrap();
    let file = sprig_core::FileUri::from_path(&path);

    let mut pipeline = sprig_index::IndexPipeline::new(
        ProviderRegistry::with_defaults().unwrap(),
        PipelineConfig::default(),
    )
    .unwrap();
    let report = pipeline
        .run(
            &[FileStamp::new(file.clone(), 7)],
            &sprig_index::FsSourceStore,
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.indexed, vec![file.clone()]);
    assert_eq!(pipeline.view().beans().next().map(|b| b.name()), Some("customerService"));
    assert_ne!(file, uri("CustomerService.java"));
}

#[test]
fn snapshots_serialize_with_tagged_kinds() {
    let mut ws = Workspace::new();
    let uri = ws.add("CustomerService.java", SERVICE);
    ws.index(1);

    let json = serde_json::to_value(&*ws.snapshot(&uri)).unwrap();
    let bean = &json["elements"][0];
    assert_eq!(bean["element"]["kind"]["type"], "bean");
    assert_eq!(bean["element"]["kind"]["name"], "customerService");
    assert_eq!(bean["children"][0]["element"]["kind"]["type"], "injection_point");
    assert_eq!(json["symbols"][0]["kind"], "bean");
    assert_eq!(json["last_modified"], 1);
}
