use pretty_assertions::assert_eq;

use super::{shop, uri, Fixture, CUSTOMER_SERVICE};

const APP_CONFIG: &str = r#"
package com.example;

import org.springframework.context.annotation.Bean;
import org.springframework.context.annotation.Configuration;

@Configuration
public class AppConfig {
    @Bean
    public DataSource primaryDs() {
        return null;
    }
}
"#;

const GREETING_HANDLER: &str = r#"
package com.example;

import org.springframework.stereotype.Component;

@Component
public class GreetingHandler {
    public Mono<ServerResponse> hello(ServerRequest request) {
        return null;
    }

    public Mono<ServerResponse> bye(ServerRequest request) {
        return null;
    }

    public void unrouted() {
    }
}
"#;

const GREETING_ROUTER: &str = r#"
package com.example;

import static org.springframework.web.reactive.function.server.RequestPredicates.GET;
import static org.springframework.web.reactive.function.server.RequestPredicates.accept;
import static org.springframework.web.reactive.function.server.RouterFunctions.route;

import org.springframework.context.annotation.Bean;
import org.springframework.context.annotation.Configuration;
import org.springframework.http.MediaType;
import org.springframework.web.reactive.function.server.RouterFunction;
import org.springframework.web.reactive.function.server.ServerResponse;

@Configuration
public class GreetingRouter {
    @Bean
    public RouterFunction<ServerResponse> routes(GreetingHandler handler) {
        return route(GET("/hello").and(accept(MediaType.TEXT_PLAIN)), handler::hello)
            .andRoute(GET("/bye"), handler::bye);
    }
}
"#;

const GREETING_CONTROLLER: &str = r#"
package com.example;

import org.springframework.web.bind.annotation.GetMapping;
import org.springframework.web.bind.annotation.RestController;

@RestController
public class GreetingController {
    @GetMapping("/hi")
    public String greet() {
        return "hi";
    }
}
"#;

#[test]
fn qualifier_values_reference_their_bean() {
    let fixture = Fixture::new(&[
        ("AppConfig.java", APP_CONFIG),
        ("CustomerService.java", CUSTOMER_SERVICE),
    ]);
    let ide = fixture.ide();

    let references = ide.provide_references("primaryDs");
    let files: Vec<_> = references.iter().map(|l| l.uri.clone()).collect();
    assert_eq!(files, vec![uri("AppConfig.java"), uri("CustomerService.java")]);

    let qualifier = &references[1];
    let text = &fixture.source(&qualifier.uri)[qualifier.span.start..qualifier.span.end];
    assert!(text.contains("primaryDs"), "unexpected span text {text:?}");

    assert!(ide.provide_references("secondaryDs").is_empty());
}

#[test]
fn symbols_are_searched_fuzzily() {
    let ide = shop().ide();

    let labels: Vec<_> = ide
        .workspace_symbols("customer", 10)
        .into_iter()
        .map(|symbol| symbol.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["@+ 'customerService' (@Service <: @Component) CustomerService"]
    );

    assert!(ide.workspace_symbols("zzz", 10).is_empty());
    assert_eq!(ide.workspace_symbols("", 2).len(), 2);
}

#[test]
fn handler_methods_get_a_lens_per_route() {
    let fixture = Fixture::new(&[
        ("GreetingHandler.java", GREETING_HANDLER),
        ("GreetingRouter.java", GREETING_ROUTER),
    ]);
    let ide = fixture.ide();
    let handler = uri("GreetingHandler.java");

    let lenses = ide.code_lenses(&handler, GREETING_HANDLER);
    let titles: Vec<_> = lenses.iter().map(|lens| lens.title.as_str()).collect();
    assert_eq!(titles, vec!["GET /hello - Accept: text/plain", "GET /bye"]);

    assert_eq!(&GREETING_HANDLER[lenses[0].span.start..lenses[0].span.end], "hello");
    assert!(lenses.iter().all(|lens| lens.target.uri == uri("GreetingRouter.java")));
}

#[test]
fn mapped_methods_do_not_point_at_themselves() {
    let fixture = Fixture::new(&[("GreetingController.java", GREETING_CONTROLLER)]);
    let ide = fixture.ide();

    assert!(ide
        .code_lenses(&uri("GreetingController.java"), GREETING_CONTROLLER)
        .is_empty());
}
