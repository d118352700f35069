use pretty_assertions::assert_eq;
use sprig_ide::{CompletionContext, RankedCandidate};
use sprig_index::{PipelineConfig, ProjectRoot};

use super::{shop, uri, Fixture, CHECKOUT_CONTROLLER};

fn names(candidates: &[RankedCandidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn prefix_matches_only_related_beans() {
    let ide = shop().ide();
    let context = CompletionContext::new("com.example.CheckoutController");

    let candidates = ide.provide_completions("cu", &context);
    assert_eq!(names(&candidates), vec!["customerService"]);
    assert!(candidates[0].is_prefix);
    assert!(candidates[0].score > 0);
    assert_eq!(
        candidates[0].type_name.as_deref(),
        Some("com.example.CustomerService")
    );
}

#[test]
fn the_current_declaration_is_never_suggested() {
    let ide = shop().ide();

    let all = ide.provide_completions("checkout", &CompletionContext::default());
    assert_eq!(names(&all), vec!["checkoutController"]);

    let inside = ide.provide_completions(
        "checkout",
        &CompletionContext::new("com.example.CheckoutController"),
    );
    assert!(inside.is_empty());
}

#[test]
fn beans_already_held_in_fields_are_skipped() {
    let fixture = shop();
    let ide = fixture.ide();
    let offset = CHECKOUT_CONTROLLER
        .find("void checkout")
        .expect("method in fixture");

    let context = ide
        .completion_context_at(&uri("CheckoutController.java"), CHECKOUT_CONTROLLER, offset)
        .expect("offset inside a component");
    assert_eq!(
        context,
        CompletionContext::new("com.example.CheckoutController")
            .with_field_types(["com.example.CustomerService"])
    );

    let candidates = ide.provide_completions("", &context);
    assert_eq!(names(&candidates), vec!["orderService"]);
    assert_eq!(fixture.source(&uri("CheckoutController.java")), CHECKOUT_CONTROLLER);
}

#[test]
fn offsets_outside_types_have_no_context() {
    let ide = shop().ide();
    assert_eq!(
        ide.completion_context_at(&uri("CheckoutController.java"), CHECKOUT_CONTROLLER, 0),
        None
    );
}

const RECEIPT: &str = r#"
package com.example;

public class Receipt {
    private OrderService orders;

    void print() {
    }
}
"#;

#[test]
fn plain_classes_get_no_completion_context() {
    let ide = shop().ide();
    let offset = RECEIPT.find("void print").expect("method in fixture");
    assert_eq!(
        ide.completion_context_at(&uri("Receipt.java"), RECEIPT, offset),
        None
    );
}

const STOREFRONT_CONTROLLER: &str = r#"
package app.web;

import org.springframework.stereotype.Controller;

@Controller
public class StorefrontController {
    void show() {
    }
}
"#;

const CART_SERVICE: &str = r#"
package app.web;

import org.springframework.stereotype.Service;

@Service
public class CartService {
}
"#;

const CART_CLIENT: &str = r#"
package other.client;

import org.springframework.stereotype.Component;

@Component
public class CartClient {
}
"#;

#[test]
fn only_beans_of_the_same_project_are_offered() {
    let config = PipelineConfig {
        projects: vec![
            ProjectRoot::new("app", "file:///ws/src/app"),
            ProjectRoot::new("other", "file:///ws/src/other"),
        ],
        ..PipelineConfig::default()
    };
    let fixture = Fixture::with_config(
        &[
            ("app/StorefrontController.java", STOREFRONT_CONTROLLER),
            ("app/CartService.java", CART_SERVICE),
            ("other/CartClient.java", CART_CLIENT),
        ],
        config,
    );
    let ide = fixture.ide();
    let offset = STOREFRONT_CONTROLLER.find("void show").expect("method in fixture");

    let context = ide
        .completion_context_at(&uri("app/StorefrontController.java"), STOREFRONT_CONTROLLER, offset)
        .expect("offset inside a component");
    assert_eq!(
        context,
        CompletionContext::new("app.web.StorefrontController").in_project("app")
    );
    assert_eq!(names(&ide.provide_completions("cart", &context)), vec!["cartService"]);

    let everywhere = ide.provide_completions("cart", &CompletionContext::default());
    assert_eq!(names(&everywhere), vec!["cartClient", "cartService"]);
}

#[test]
fn prefix_matches_outrank_subsequences() {
    let ide = shop().ide();

    let candidates = ide.provide_completions("o", &CompletionContext::default());
    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].name, "orderService");
    assert!(candidates[0].is_prefix);
    assert!(candidates[1..].iter().all(|c| !c.is_prefix));
}

#[test]
fn equal_scores_keep_discovery_order() {
    let ide = shop().ide();

    let candidates = ide.provide_completions("", &CompletionContext::default());
    assert_eq!(
        names(&candidates),
        vec!["checkoutController", "customerService", "orderService"]
    );
}
