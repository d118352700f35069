mod completion;
mod navigation;
mod queries;

use std::sync::Arc;

use sprig_core::FileUri;
use sprig_ide::SpringIde;
use sprig_index::{FileStamp, IndexPipeline, MemorySourceStore, PipelineConfig, ProviderRegistry};
use sprig_scheduler::CancellationToken;

pub(crate) const CUSTOMER_SERVICE: &str = r#"
package com.example;

import org.springframework.beans.factory.annotation.Autowired;
import org.springframework.beans.factory.annotation.Qualifier;
import org.springframework.stereotype.Service;

@Service
public class CustomerService {
    @Autowired
    @Qualifier("primaryDs")
    private DataSource dataSource;
}
"#;

pub(crate) const ORDER_SERVICE: &str = r#"
package com.example;

import org.springframework.stereotype.Service;

@Service
public class OrderService {
}
"#;

pub(crate) const CHECKOUT_CONTROLLER: &str = r#"
package com.example;

import org.springframework.stereotype.Controller;

@Controller
public class CheckoutController {
    private CustomerService customers;

    void checkout() {
    }
}
"#;

/// Indexed in-memory sources.
pub(crate) struct Fixture {
    pub pipeline: IndexPipeline,
    pub sources: Vec<(FileUri, &'static str)>,
}

impl Fixture {
    pub fn new(files: &[(&str, &'static str)]) -> Self {
        Self::with_config(files, PipelineConfig::default())
    }

    pub fn with_config(files: &[(&str, &'static str)], config: PipelineConfig) -> Self {
        let store = MemorySourceStore::new();
        let mut sources = Vec::new();
        for (path, text) in files {
            let uri = uri(path);
            store.insert(uri.clone(), *text);
            sources.push((uri, *text));
        }

        let mut pipeline =
            IndexPipeline::new(ProviderRegistry::with_defaults().unwrap(), config).unwrap();
        let stamps: Vec<_> = sources
            .iter()
            .map(|(uri, _)| FileStamp::new(uri.clone(), 1))
            .collect();
        pipeline
            .run(&stamps, &store, &CancellationToken::new())
            .unwrap();
        Self { pipeline, sources }
    }

    pub fn ide(&self) -> SpringIde {
        SpringIde::new(Arc::new(self.pipeline.view()), self.pipeline.hierarchies())
    }

    pub fn source(&self, uri: &FileUri) -> &'static str {
        self.sources
            .iter()
            .find(|(candidate, _)| candidate == uri)
            .map(|(_, text)| *text)
            .unwrap_or_else(|| panic!("unknown file {uri}"))
    }
}

pub(crate) fn uri(path: &str) -> FileUri {
    FileUri::new(format!("file:///ws/src/{path}"))
}

pub(crate) fn shop() -> Fixture {
    Fixture::new(&[
        ("CheckoutController.java", CHECKOUT_CONTROLLER),
        ("CustomerService.java", CUSTOMER_SERVICE),
        ("OrderService.java", ORDER_SERVICE),
    ])
}
