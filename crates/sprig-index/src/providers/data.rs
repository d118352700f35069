use sprig_java::{decapitalize, names, TypeDecl, TypeKind};

use super::bean_label;
use crate::context::PassContext;
use crate::element::{Bean, IndexElement, PlainSymbol, SymbolKind};
use crate::provider::{IndexProvider, ProviderError};

/// Spring Data repository interfaces.
pub struct DataRepositoryProvider;

impl IndexProvider for DataRepositoryProvider {
    fn name(&self) -> &'static str {
        "data-repository"
    }

    fn on_type_declaration(
        &self,
        ty: &TypeDecl,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        if !cx.pass().is_first() || ty.kind != TypeKind::Interface {
            return Ok(());
        }
        if cx.find_exact(&ty.annotations, names::NO_REPOSITORY_BEAN).is_some()
            || !cx.is_subtype_of(&ty.qualified_name, names::DATA_REPOSITORY)
        {
            return Ok(());
        }

        let name = decapitalize(&ty.name);
        // `extends CrudRepository<Customer, Long>` names the domain and id types.
        let generics = ty.interfaces.iter().find_map(|declared| {
            let [domain, id] = declared.args.as_slice() else {
                return None;
            };
            cx.is_subtype_of(&cx.resolve_type(declared), names::DATA_REPOSITORY)
                .then(|| (domain.simple_name().to_string(), id.simple_name().to_string()))
        });
        let label = match &generics {
            Some((domain, id)) => bean_label(
                false,
                &name,
                domain,
                &format!("Repository<{domain},{id}>"),
            ),
            None => bean_label(false, &name, "", &ty.name),
        };

        let element = IndexElement::new(
            Bean {
                name,
                is_configuration: false,
            },
            label.clone(),
            cx.location(ty.name_span),
        )
        .with_type(ty.qualified_name.clone(), cx.supertypes(&ty.qualified_name))
        .with_annotations(cx.annotation_metadata(&ty.annotations));
        let bean = cx.add_root(element);

        for method in ty.methods() {
            let query_method = IndexElement::new(
                PlainSymbol {},
                method.name.clone(),
                cx.location(method.name_span),
            )
            .with_annotations(cx.annotation_metadata(&method.annotations));
            let query_method = cx.add_child(bean, query_method)?;

            let query = cx
                .find_exact(&method.annotations, names::QUERY)
                .and_then(|query| query.values(&["value"]).into_iter().next())
                .and_then(|value| value.as_str().map(|text| (text.to_string(), value.span)));
            if let Some((text, span)) = query {
                let element = IndexElement::new(PlainSymbol {}, text, cx.location(span));
                cx.add_child(query_method, element)?;
            }
        }

        cx.add_symbol(label, SymbolKind::Bean, ty.name_span);
        Ok(())
    }
}
