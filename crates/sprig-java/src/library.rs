//! Declarations of the framework and JDK types the indexer needs to know about without
//! having their sources.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::TypeKind;
use crate::names::*;

pub(crate) struct LibraryType {
    pub name: &'static str,
    pub kind: TypeKind,
    pub annotations: &'static [&'static str],
    pub supertypes: &'static [&'static str],
}

const META: &[&str] = &[TARGET, RETENTION, DOCUMENTED];
const INHERITED: &str = "java.lang.annotation.Inherited";
const REFLECTIVE: &str = "org.springframework.aot.hint.annotation.Reflective";
const COMPONENT_SCAN: &str = "org.springframework.context.annotation.ComponentScan";
const JAKARTA_QUALIFIER: &str = "jakarta.inject.Qualifier";
const JAVAX_QUALIFIER: &str = "javax.inject.Qualifier";

const fn annotation(name: &'static str, annotations: &'static [&'static str]) -> LibraryType {
    LibraryType {
        name,
        kind: TypeKind::Annotation,
        annotations,
        supertypes: &[],
    }
}

const fn interface(name: &'static str, supertypes: &'static [&'static str]) -> LibraryType {
    LibraryType {
        name,
        kind: TypeKind::Interface,
        annotations: &[],
        supertypes,
    }
}

const fn class(name: &'static str, supertypes: &'static [&'static str]) -> LibraryType {
    LibraryType {
        name,
        kind: TypeKind::Class,
        annotations: &[],
        supertypes,
    }
}

static LIBRARY: &[LibraryType] = &[
    // java.lang and java.lang.annotation
    class(OBJECT, &[]),
    class("java.lang.String", &["java.lang.CharSequence", "java.lang.Comparable"]),
    interface("java.lang.CharSequence", &[]),
    interface("java.lang.Comparable", &[]),
    interface("java.lang.Runnable", &[]),
    interface("java.lang.Iterable", &[]),
    class("java.lang.Number", &[]),
    class("java.lang.Long", &["java.lang.Number", "java.lang.Comparable"]),
    class("java.lang.Integer", &["java.lang.Number", "java.lang.Comparable"]),
    class("java.lang.Double", &["java.lang.Number", "java.lang.Comparable"]),
    class("java.lang.Boolean", &["java.lang.Comparable"]),
    class("java.lang.Record", &[]),
    annotation("java.lang.Override", META),
    annotation("java.lang.Deprecated", META),
    annotation("java.lang.FunctionalInterface", META),
    annotation(TARGET, META),
    annotation(RETENTION, META),
    annotation(DOCUMENTED, META),
    annotation(INHERITED, META),
    // java.util
    interface("java.util.Collection", &["java.lang.Iterable"]),
    interface("java.util.List", &["java.util.Collection"]),
    interface("java.util.Set", &["java.util.Collection"]),
    interface("java.util.Map", &[]),
    class("java.util.Optional", &[]),
    class("java.util.EventObject", &[]),
    interface("java.util.EventListener", &[]),
    LibraryType {
        name: FUNCTION,
        kind: TypeKind::Interface,
        annotations: &["java.lang.FunctionalInterface"],
        supertypes: &[],
    },
    LibraryType {
        name: CONSUMER,
        kind: TypeKind::Interface,
        annotations: &["java.lang.FunctionalInterface"],
        supertypes: &[],
    },
    LibraryType {
        name: SUPPLIER,
        kind: TypeKind::Interface,
        annotations: &["java.lang.FunctionalInterface"],
        supertypes: &[],
    },
    // stereotypes
    annotation(INDEXED, META),
    annotation(COMPONENT, &[TARGET, RETENTION, DOCUMENTED, INDEXED]),
    annotation(SERVICE, &[TARGET, RETENTION, DOCUMENTED, COMPONENT]),
    annotation(REPOSITORY, &[TARGET, RETENTION, DOCUMENTED, COMPONENT]),
    annotation(CONTROLLER, &[TARGET, RETENTION, DOCUMENTED, COMPONENT]),
    annotation(CONFIGURATION, &[TARGET, RETENTION, DOCUMENTED, COMPONENT]),
    annotation(BEAN, META),
    annotation(PRIMARY, META),
    annotation(CONDITIONAL, META),
    annotation(PROFILE, &[TARGET, RETENTION, DOCUMENTED, CONDITIONAL]),
    annotation(SCOPE, META),
    annotation(DEPENDS_ON, META),
    annotation(COMPONENT_SCAN, META),
    annotation(
        SPRING_BOOT_CONFIGURATION,
        &[TARGET, RETENTION, DOCUMENTED, CONFIGURATION, INDEXED],
    ),
    annotation(ENABLE_AUTO_CONFIGURATION, &[TARGET, RETENTION, DOCUMENTED, INHERITED]),
    annotation(
        SPRING_BOOT_APPLICATION,
        &[
            TARGET,
            RETENTION,
            DOCUMENTED,
            INHERITED,
            SPRING_BOOT_CONFIGURATION,
            ENABLE_AUTO_CONFIGURATION,
            COMPONENT_SCAN,
        ],
    ),
    annotation(CONDITIONAL_ON_PROPERTY, &[TARGET, RETENTION, DOCUMENTED, CONDITIONAL]),
    // injection
    annotation(AUTOWIRED, META),
    annotation(QUALIFIER, &[TARGET, RETENTION, DOCUMENTED, INHERITED]),
    annotation(VALUE, META),
    annotation(INJECT_JAKARTA, &[TARGET, RETENTION, DOCUMENTED]),
    annotation(INJECT_JAVAX, &[TARGET, RETENTION, DOCUMENTED]),
    annotation(JAKARTA_QUALIFIER, META),
    annotation(JAVAX_QUALIFIER, META),
    annotation(NAMED_JAKARTA, &[JAKARTA_QUALIFIER, DOCUMENTED, RETENTION]),
    annotation(NAMED_JAVAX, &[JAVAX_QUALIFIER, DOCUMENTED, RETENTION]),
    // events
    annotation(REFLECTIVE, META),
    annotation(EVENT_LISTENER, &[TARGET, RETENTION, DOCUMENTED, REFLECTIVE]),
    annotation(
        TRANSACTIONAL_EVENT_LISTENER,
        &[TARGET, RETENTION, DOCUMENTED, EVENT_LISTENER],
    ),
    interface(APPLICATION_LISTENER, &["java.util.EventListener"]),
    interface(APPLICATION_EVENT_PUBLISHER, &[]),
    class(APPLICATION_EVENT, &["java.util.EventObject"]),
    // web
    annotation(RESPONSE_BODY, META),
    annotation(REST_CONTROLLER, &[TARGET, RETENTION, DOCUMENTED, CONTROLLER, RESPONSE_BODY]),
    annotation(CONTROLLER_ADVICE, &[TARGET, RETENTION, DOCUMENTED, COMPONENT]),
    annotation(
        REST_CONTROLLER_ADVICE,
        &[TARGET, RETENTION, DOCUMENTED, CONTROLLER_ADVICE, RESPONSE_BODY],
    ),
    annotation(REQUEST_MAPPING, &[TARGET, RETENTION, DOCUMENTED, REFLECTIVE]),
    annotation(GET_MAPPING, &[TARGET, RETENTION, DOCUMENTED, REQUEST_MAPPING]),
    annotation(POST_MAPPING, &[TARGET, RETENTION, DOCUMENTED, REQUEST_MAPPING]),
    annotation(PUT_MAPPING, &[TARGET, RETENTION, DOCUMENTED, REQUEST_MAPPING]),
    annotation(DELETE_MAPPING, &[TARGET, RETENTION, DOCUMENTED, REQUEST_MAPPING]),
    annotation(PATCH_MAPPING, &[TARGET, RETENTION, DOCUMENTED, REQUEST_MAPPING]),
    LibraryType {
        name: REQUEST_METHOD,
        kind: TypeKind::Enum,
        annotations: &[],
        supertypes: &[],
    },
    interface(ROUTER_FUNCTION, &[]),
    class(ROUTER_FUNCTIONS, &[]),
    class(REQUEST_PREDICATES, &[]),
    class("org.springframework.http.MediaType", &[]),
    interface("org.springframework.web.reactive.function.server.ServerRequest", &[]),
    interface("org.springframework.web.reactive.function.server.ServerResponse", &[]),
    class("reactor.core.publisher.Mono", &[]),
    class("reactor.core.publisher.Flux", &[]),
    // data
    interface(DATA_REPOSITORY, &[]),
    interface(CRUD_REPOSITORY, &[DATA_REPOSITORY]),
    interface(LIST_CRUD_REPOSITORY, &[CRUD_REPOSITORY]),
    interface(PAGING_AND_SORTING_REPOSITORY, &[DATA_REPOSITORY]),
    interface(JPA_REPOSITORY, &[LIST_CRUD_REPOSITORY, PAGING_AND_SORTING_REPOSITORY]),
    annotation(NO_REPOSITORY_BEAN, META),
    annotation(QUERY, &[RETENTION, TARGET, DOCUMENTED]),
];

pub(crate) fn library_type(name: &str) -> Option<&'static LibraryType> {
    static BY_NAME: OnceLock<HashMap<&'static str, &'static LibraryType>> = OnceLock::new();
    BY_NAME
        .get_or_init(|| LIBRARY.iter().map(|ty| (ty.name, ty)).collect())
        .get(name)
        .copied()
}
