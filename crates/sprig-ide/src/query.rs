use serde::Serialize;
use sprig_core::{FileUri, Location};
use sprig_index::{BeanRef, ElementTree, InjectionPoint};

use crate::SpringIde;

/// Bean query. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeanFilter {
    pub name: Option<String>,
    /// Matches beans assignable to this qualified type.
    pub type_name: Option<String>,
    pub project: Option<String>,
}

impl BeanFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    pub fn in_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    fn matches(&self, bean: &BeanRef<'_>) -> bool {
        self.name.as_deref().map_or(true, |name| bean.name() == name)
            && self
                .type_name
                .as_deref()
                .map_or(true, |ty| bean.is_assignable_to(ty))
            && self
                .project
                .as_deref()
                .map_or(true, |project| bean.project == Some(project))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeanInfo {
    pub name: String,
    pub type_name: Option<String>,
    pub label: String,
    pub project: Option<String>,
    pub is_configuration: bool,
    pub location: Location,
    pub injection_points: Vec<InjectionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionInfo {
    pub name: String,
    pub type_name: Option<String>,
    pub qualifier: Option<String>,
}

impl BeanInfo {
    fn new(bean: &BeanRef<'_>) -> Self {
        Self {
            name: bean.name().to_string(),
            type_name: bean.type_name().map(str::to_string),
            label: bean.label().to_string(),
            project: bean.project.map(str::to_string),
            is_configuration: bean.bean.is_configuration,
            location: bean.location().clone(),
            injection_points: bean
                .injection_points()
                .map(|(tree, point)| injection_info(tree, point))
                .collect(),
        }
    }
}

fn injection_info(tree: &ElementTree, point: &InjectionPoint) -> InjectionInfo {
    InjectionInfo {
        name: point.name.clone(),
        type_name: tree.element.type_name.clone(),
        qualifier: point.qualifier.clone(),
    }
}

impl SpringIde {
    /// Beans matching `filter`, files in URI order.
    pub fn query_beans(&self, filter: &BeanFilter) -> Vec<BeanInfo> {
        self.view
            .beans()
            .filter(|bean| filter.matches(bean))
            .map(|bean| BeanInfo::new(&bean))
            .collect()
    }

    /// Top-level elements of `uri`. Unknown files have none.
    pub fn query_elements(&self, uri: &FileUri) -> &[ElementTree] {
        self.view.elements(uri)
    }
}
