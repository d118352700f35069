//! Well-known qualified names.

pub const COMPONENT: &str = "org.springframework.stereotype.Component";
pub const SERVICE: &str = "org.springframework.stereotype.Service";
pub const REPOSITORY: &str = "org.springframework.stereotype.Repository";
pub const CONTROLLER: &str = "org.springframework.stereotype.Controller";
pub const INDEXED: &str = "org.springframework.stereotype.Indexed";

pub const CONFIGURATION: &str = "org.springframework.context.annotation.Configuration";
pub const BEAN: &str = "org.springframework.context.annotation.Bean";
pub const PRIMARY: &str = "org.springframework.context.annotation.Primary";
pub const PROFILE: &str = "org.springframework.context.annotation.Profile";
pub const SCOPE: &str = "org.springframework.context.annotation.Scope";
pub const DEPENDS_ON: &str = "org.springframework.context.annotation.DependsOn";
pub const CONDITIONAL: &str = "org.springframework.context.annotation.Conditional";

pub const SPRING_BOOT_APPLICATION: &str =
    "org.springframework.boot.autoconfigure.SpringBootApplication";
pub const SPRING_BOOT_CONFIGURATION: &str = "org.springframework.boot.SpringBootConfiguration";
pub const ENABLE_AUTO_CONFIGURATION: &str =
    "org.springframework.boot.autoconfigure.EnableAutoConfiguration";
pub const CONDITIONAL_ON_PROPERTY: &str =
    "org.springframework.boot.autoconfigure.condition.ConditionalOnProperty";

pub const AUTOWIRED: &str = "org.springframework.beans.factory.annotation.Autowired";
pub const QUALIFIER: &str = "org.springframework.beans.factory.annotation.Qualifier";
pub const VALUE: &str = "org.springframework.beans.factory.annotation.Value";

pub const INJECT_JAKARTA: &str = "jakarta.inject.Inject";
pub const INJECT_JAVAX: &str = "javax.inject.Inject";
pub const NAMED_JAKARTA: &str = "jakarta.inject.Named";
pub const NAMED_JAVAX: &str = "javax.inject.Named";

pub const EVENT_LISTENER: &str = "org.springframework.context.event.EventListener";
pub const TRANSACTIONAL_EVENT_LISTENER: &str =
    "org.springframework.transaction.event.TransactionalEventListener";
pub const APPLICATION_LISTENER: &str = "org.springframework.context.ApplicationListener";
pub const APPLICATION_EVENT_PUBLISHER: &str =
    "org.springframework.context.ApplicationEventPublisher";
pub const APPLICATION_EVENT: &str = "org.springframework.context.ApplicationEvent";

pub const CONTROLLER_ADVICE: &str = "org.springframework.web.bind.annotation.ControllerAdvice";
pub const REST_CONTROLLER_ADVICE: &str =
    "org.springframework.web.bind.annotation.RestControllerAdvice";
pub const REST_CONTROLLER: &str = "org.springframework.web.bind.annotation.RestController";
pub const RESPONSE_BODY: &str = "org.springframework.web.bind.annotation.ResponseBody";
pub const REQUEST_MAPPING: &str = "org.springframework.web.bind.annotation.RequestMapping";
pub const GET_MAPPING: &str = "org.springframework.web.bind.annotation.GetMapping";
pub const POST_MAPPING: &str = "org.springframework.web.bind.annotation.PostMapping";
pub const PUT_MAPPING: &str = "org.springframework.web.bind.annotation.PutMapping";
pub const DELETE_MAPPING: &str = "org.springframework.web.bind.annotation.DeleteMapping";
pub const PATCH_MAPPING: &str = "org.springframework.web.bind.annotation.PatchMapping";
pub const REQUEST_METHOD: &str = "org.springframework.web.bind.annotation.RequestMethod";

pub const ROUTER_FUNCTION: &str = "org.springframework.web.reactive.function.server.RouterFunction";
pub const ROUTER_FUNCTIONS: &str =
    "org.springframework.web.reactive.function.server.RouterFunctions";
pub const REQUEST_PREDICATES: &str =
    "org.springframework.web.reactive.function.server.RequestPredicates";

pub const DATA_REPOSITORY: &str = "org.springframework.data.repository.Repository";
pub const CRUD_REPOSITORY: &str = "org.springframework.data.repository.CrudRepository";
pub const LIST_CRUD_REPOSITORY: &str = "org.springframework.data.repository.ListCrudRepository";
pub const PAGING_AND_SORTING_REPOSITORY: &str =
    "org.springframework.data.repository.PagingAndSortingRepository";
pub const NO_REPOSITORY_BEAN: &str = "org.springframework.data.repository.NoRepositoryBean";
pub const JPA_REPOSITORY: &str = "org.springframework.data.jpa.repository.JpaRepository";
pub const QUERY: &str = "org.springframework.data.jpa.repository.Query";

pub const FUNCTION: &str = "java.util.function.Function";
pub const CONSUMER: &str = "java.util.function.Consumer";
pub const SUPPLIER: &str = "java.util.function.Supplier";

pub const OBJECT: &str = "java.lang.Object";

pub const TARGET: &str = "java.lang.annotation.Target";
pub const RETENTION: &str = "java.lang.annotation.Retention";
pub const DOCUMENTED: &str = "java.lang.annotation.Documented";
