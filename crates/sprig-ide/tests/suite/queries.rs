use pretty_assertions::assert_eq;
use sprig_ide::{BeanFilter, SpringIde};
use sprig_index::{
    FileStamp, IndexerConfig, MemorySourceStore, PipelineConfig, ProjectRoot, SpringIndexer,
};

use super::{shop, uri, Fixture, CHECKOUT_CONTROLLER, CUSTOMER_SERVICE, ORDER_SERVICE};

#[test]
fn beans_filter_by_name_and_type() {
    let ide = shop().ide();

    let named = ide.query_beans(&BeanFilter::named("orderService"));
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].type_name.as_deref(), Some("com.example.OrderService"));
    assert_eq!(named[0].location.uri, uri("OrderService.java"));

    let typed = ide.query_beans(&BeanFilter::of_type("com.example.CustomerService"));
    assert_eq!(typed.len(), 1);
    assert_eq!(typed[0].name, "customerService");
    let qualifiers: Vec<_> = typed[0]
        .injection_points
        .iter()
        .map(|point| (point.name.as_str(), point.qualifier.as_deref()))
        .collect();
    assert_eq!(qualifiers, vec![("dataSource", Some("primaryDs"))]);

    assert!(ide.query_beans(&BeanFilter::named("missing")).is_empty());
    assert_eq!(ide.query_beans(&BeanFilter::default()).len(), 3);
}

#[test]
fn beans_filter_by_project() {
    let fixture = Fixture::with_config(
        &[
            ("CustomerService.java", CUSTOMER_SERVICE),
            ("OrderService.java", ORDER_SERVICE),
        ],
        PipelineConfig {
            projects: vec![ProjectRoot::new("shop", "file:///ws/src")],
            ..PipelineConfig::default()
        },
    );
    let ide = fixture.ide();

    let in_shop = ide.query_beans(&BeanFilter::default().in_project("shop"));
    assert_eq!(in_shop.len(), 2);
    assert!(in_shop.iter().all(|bean| bean.project.as_deref() == Some("shop")));
    assert!(ide
        .query_beans(&BeanFilter::named("orderService").in_project("billing"))
        .is_empty());
}

#[test]
fn elements_of_unknown_files_are_empty() {
    let ide = shop().ide();

    let elements = ide.query_elements(&uri("CheckoutController.java"));
    assert_eq!(elements.len(), 1);
    assert_eq!(
        elements[0].element.label,
        "@+ 'checkoutController' (@Controller <: @Component) CheckoutController"
    );
    assert!(ide.query_elements(&uri("Missing.java")).is_empty());
}

#[test]
fn bean_info_serializes_for_tools() {
    let ide = shop().ide();
    let beans = ide.query_beans(&BeanFilter::named("customerService"));

    let json = serde_json::to_value(&beans).unwrap();
    assert_eq!(json[0]["name"], "customerService");
    assert_eq!(json[0]["is_configuration"], false);
    assert_eq!(json[0]["injection_points"][0]["qualifier"], "primaryDs");
    assert_eq!(json[0]["location"]["uri"], "file:///ws/src/CustomerService.java");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn the_facade_reads_the_indexer_view() {
    let store = std::sync::Arc::new(MemorySourceStore::new());
    store.insert(uri("CheckoutController.java"), CHECKOUT_CONTROLLER);
    store.insert(uri("OrderService.java"), ORDER_SERVICE);
    let indexer = SpringIndexer::new(IndexerConfig::default(), store).unwrap();

    let _task = indexer.index_files(vec![
        FileStamp::new(uri("CheckoutController.java"), 1),
        FileStamp::new(uri("OrderService.java"), 1),
    ]);
    indexer.wait_for_quiescence().await;

    let ide = SpringIde::from_indexer(&indexer);
    let names: Vec<_> = ide
        .query_beans(&BeanFilter::default())
        .into_iter()
        .map(|bean| bean.name)
        .collect();
    assert_eq!(names, vec!["checkoutController", "orderService"]);
}
