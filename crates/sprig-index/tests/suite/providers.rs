use pretty_assertions::assert_eq;
use sprig_index::{
    Bean, EventListener, EventPublisher, InjectionPoint, PipelineConfig, PlainSymbol,
    RouteHandler,
};

use super::{labels, symbol_labels, Workspace};

const CUSTOMER_SERVICE: &str = r#"
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

#[test]
fn stereotype_beans_carry_their_injection_points() {
    let mut ws = Workspace::new();
    let uri = ws.add("CustomerService.java", CUSTOMER_SERVICE);
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec!["@+ 'customerService' (@Service <: @Component) CustomerService"]
    );

    let bean = &snapshot.elements[0];
    assert_eq!(
        bean.variant::<Bean>(),
        Some(&Bean {
            name: "customerService".into(),
            is_configuration: false,
        })
    );
    assert_eq!(
        bean.element.type_name.as_deref(),
        Some("com.example.CustomerService")
    );
    assert!(bean
        .element
        .annotations
        .iter()
        .any(|a| a.annotation_type == "org.springframework.stereotype.Component" && a.is_meta));

    let points: Vec<_> = bean.children_of::<InjectionPoint>().collect();
    assert_eq!(points.len(), 1);
    let (tree, point) = points[0];
    assert_eq!(point.name, "dataSource");
    assert_eq!(point.qualifier.as_deref(), Some("primaryDs"));
    assert_eq!(tree.element.type_name.as_deref(), Some("DataSource"));

    assert_eq!(
        symbol_labels(&snapshot),
        vec!["@+ 'customerService' (@Service <: @Component) CustomerService"]
    );
}

#[test]
fn explicit_names_and_configuration_roots() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "AppConfig.java",
        r#"
package com.example;

import org.springframework.context.annotation.Bean;
import org.springframework.context.annotation.Configuration;
import org.springframework.context.annotation.Primary;

@Configuration("config")
public class AppConfig {
    @Bean
    @Primary
    public DataSource primaryDs(Environment environment) {
        return null;
    }

    @Bean(name = {"a", "b"})
    public Clock clock() {
        return null;
    }

    @Bean
    @Qualifier("backup")
    @Profile({"dev",
              "test"})
    public DataSource backupDs() {
        return null;
    }
}
"#,
    );
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec![
            "@+ 'config' (@Configuration <: @Component) AppConfig",
            "@+ 'primaryDs' (@Bean @Primary) DataSource",
            "@+ 'a' (@Bean) Clock",
            "@+ 'b' (@Bean) Clock",
            r#"@+ 'backupDs' (@Bean @Qualifier("backup") @Profile({"dev", "test"})) DataSource"#,
        ]
    );
    assert!(snapshot.elements[0].variant::<Bean>().unwrap().is_configuration);

    let params: Vec<_> = snapshot.elements[1]
        .children_of::<InjectionPoint>()
        .map(|(_, point)| point.name.as_str())
        .collect();
    assert_eq!(params, vec!["environment"]);
}

#[test]
fn listeners_move_under_the_bean_of_their_type() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "StartupListener.java",
        r#"
package com.example;

import org.springframework.context.ApplicationListener;
import org.springframework.stereotype.Component;

@Component
public class StartupListener implements ApplicationListener<ApplicationReadyEvent> {
    public void onApplicationEvent(ApplicationReadyEvent event) {
    }
}
"#,
    );
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec!["@+ 'startupListener' (@Component) StartupListener"]
    );
    let listeners: Vec<_> = snapshot.elements[0]
        .children_of::<EventListener>()
        .map(|(tree, listener)| (tree.element.label.as_str(), listener.event_type.as_deref()))
        .collect();
    assert_eq!(
        listeners,
        vec![("@EventListener (ApplicationReadyEvent)", Some("ApplicationReadyEvent"))]
    );
    assert_eq!(snapshot.all_of::<EventListener>().count(), 1);
}

#[test]
fn listeners_without_a_bean_stay_top_level() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "Audit.java",
        r#"
package com.example;

import org.springframework.context.event.EventListener;

public class Audit {
    @EventListener(OrderPlaced.class)
    public void onOrder() {
    }
}
"#,
    );
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(labels(&snapshot.elements), vec!["@EventListener (OrderPlaced)"]);
    assert_eq!(
        snapshot.elements[0].variant::<EventListener>(),
        Some(&EventListener {
            event_type: Some("OrderPlaced".into()),
            container_type: "com.example.Audit".into(),
        })
    );
}

const ORDER_SERVICE: &str = r#"
package com.example;

import org.springframework.context.ApplicationEventPublisher;
import org.springframework.stereotype.Service;

@Service
public class OrderService {
    private final ApplicationEventPublisher publisher;

    public OrderService(ApplicationEventPublisher publisher) {
        this.publisher = publisher;
    }

    public void place(String id) {
        publisher.publishEvent(new OrderPlaced(id));
    }
}
"#;

#[test]
fn publishers_are_found_in_the_second_pass() {
    let mut ws = Workspace::new();
    let uri = ws.add("OrderService.java", ORDER_SERVICE);
    let report = ws.index(1);

    assert_eq!(report.deferred, 1);
    assert_eq!(report.passes, 2);
    assert!(report.deferral_exhausted.is_empty());

    let snapshot = ws.snapshot(&uri);
    assert_eq!(snapshot.passes, 2);
    assert_eq!(snapshot.elements.len(), 1);
    let bean = &snapshot.elements[0];
    assert_eq!(labels(&bean.children), vec!["publisher", "@EventPublisher (OrderPlaced)"]);
    let (_, publisher) = bean.children_of::<EventPublisher>().next().unwrap();
    assert_eq!(publisher.event_type, "OrderPlaced");
    assert_eq!(
        symbol_labels(&snapshot),
        vec![
            "@+ 'orderService' (@Service <: @Component) OrderService",
            "@EventPublisher (OrderPlaced)",
        ]
    );
}

#[test]
fn single_pass_limit_keeps_partial_output() {
    let mut ws = Workspace::with_config(PipelineConfig {
        max_passes: 1,
        ..PipelineConfig::default()
    });
    let uri = ws.add("OrderService.java", ORDER_SERVICE);
    let report = ws.index(1);

    assert_eq!(report.deferral_exhausted, vec![uri.clone()]);
    assert_eq!(report.passes, 1);

    let snapshot = ws.snapshot(&uri);
    assert!(snapshot.deferral_exhausted);
    assert_eq!(snapshot.beans().count(), 1);
    assert_eq!(snapshot.all_of::<EventPublisher>().count(), 0);
}

#[test]
fn webflux_router_beans_produce_routes() {
    let mut ws = Workspace::new();
    ws.add(
        "GreetingHandler.java",
        r#"
package com.example;

import org.springframework.stereotype.Component;

@Component
public class GreetingHandler {
}
"#,
    );
    let router = ws.add(
        "GreetingRouter.java",
        r#"
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
"#,
    );
    let report = ws.index(1);
    assert_eq!(report.deferred, 1);

    let snapshot = ws.snapshot(&router);
    assert_eq!(
        labels(&snapshot.elements),
        vec![
            "@+ 'greetingRouter' (@Configuration <: @Component) GreetingRouter",
            "@+ 'routes' (@Bean) RouterFunction<ServerResponse>",
        ]
    );

    let routes: Vec<_> = snapshot.elements[1]
        .children_of::<RouteHandler>()
        .map(|(_, route)| route)
        .collect();
    assert_eq!(
        routes.iter().map(|r| r.label()).collect::<Vec<_>>(),
        vec!["@/hello -- GET - Accept: text/plain", "@/bye -- GET"]
    );
    assert_eq!(routes[0].handler_type.as_deref(), Some("com.example.GreetingHandler"));
    assert_eq!(routes[0].handler_method.as_deref(), Some("hello"));
    assert_eq!(routes[1].handler_method.as_deref(), Some("bye"));

    let injected: Vec<_> = snapshot.elements[1]
        .children_of::<InjectionPoint>()
        .map(|(tree, _)| tree.element.type_name.as_deref())
        .collect();
    assert_eq!(injected, vec![Some("com.example.GreetingHandler")]);
}

#[test]
fn request_mappings_combine_class_prefixes_and_constants() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "GreetingController.java",
        r#"
package com.example;

import org.springframework.web.bind.annotation.*;

@RestController
@RequestMapping("/api")
public class GreetingController {
    static final String GREETING = "/greeting";

    @GetMapping(GREETING)
    public String greet() {
        return "hi";
    }

    @PostMapping(path = "/items", consumes = "application/json")
    public void create() {
    }

    @RequestMapping(value = "/legacy", method = RequestMethod.PUT)
    public void legacy() {
    }
}
"#,
    );
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(snapshot.elements.len(), 1);
    let routes: Vec<String> = snapshot.elements[0]
        .children_of::<RouteHandler>()
        .map(|(_, route)| route.label())
        .collect();
    assert_eq!(
        routes,
        vec![
            "@/api/greeting -- GET",
            "@/api/items -- POST - Accept: application/json",
            "@/api/legacy -- PUT",
        ]
    );
    let (_, greet) = snapshot.elements[0].children_of::<RouteHandler>().next().unwrap();
    assert_eq!(greet.handler_type.as_deref(), Some("com.example.GreetingController"));
    assert_eq!(greet.handler_method.as_deref(), Some("greet"));
}

#[test]
fn data_repositories_list_query_methods() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "CustomerRepository.java",
        r#"
package com.example;

import java.util.List;
import org.springframework.data.jpa.repository.Query;
import org.springframework.data.repository.CrudRepository;

public interface CustomerRepository extends CrudRepository<Customer, Long> {
    @Query("select c from Customer c where c.lastName = ?1")
    List<Customer> findByLastName(String lastName);

    Customer findById(long id);
}
"#,
    );
    ws.add(
        "BaseRepository.java",
        r#"
package com.example;

import org.springframework.data.repository.NoRepositoryBean;
import org.springframework.data.repository.Repository;

@NoRepositoryBean
public interface BaseRepository<T, ID> extends Repository<T, ID> {
}
"#,
    );
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec!["@+ 'customerRepository' (Customer) Repository<Customer,Long>"]
    );
    let repository = &snapshot.elements[0];
    assert_eq!(labels(&repository.children), vec!["findByLastName", "findById"]);
    assert_eq!(
        labels(&repository.children[0].children),
        vec!["select c from Customer c where c.lastName = ?1"]
    );
    assert!(repository.children[1].children.is_empty());
    assert!(repository
        .children
        .iter()
        .all(|child| child.variant::<PlainSymbol>().is_some()));

    assert!(ws.snapshot(&super::uri("BaseRepository.java")).elements.is_empty());
}

#[test]
fn function_shaped_classes_are_beans() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "Uppercase.java",
        r#"
package com.example;

import java.util.function.Function;

public class Uppercase implements Function<String, String> {
    public String apply(String value) {
        return value.toUpperCase();
    }
}
"#,
    );
    ws.index(1);

    assert_eq!(
        labels(&ws.snapshot(&uri).elements),
        vec!["@> 'uppercase' Function<String,String>"]
    );
}

#[test]
fn named_members_become_plain_symbols() {
    let mut ws = Workspace::new();
    let uri = ws.add(
        "Wiring.java",
        r#"
package com.example;

import jakarta.inject.Inject;
import jakarta.inject.Named;

@Named("wiring")
public class Wiring {
    @Inject
    @Named("fast")
    private Engine engine;
}
"#,
    );
    ws.index(1);

    let snapshot = ws.snapshot(&uri);
    assert_eq!(
        labels(&snapshot.elements),
        vec!["@+ 'wiring' (@Named) Wiring", "@Named(\"fast\")"]
    );
    let (_, point) = snapshot.elements[0]
        .children_of::<InjectionPoint>()
        .next()
        .unwrap();
    assert_eq!(point.qualifier.as_deref(), Some("fast"));
}
