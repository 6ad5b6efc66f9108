//! In-process registry binding.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use remote_shell_core::{
    ComponentInfo, Connector, FieldInfo, InvokeOptions, InvokeResponse, MethodInfo, Param,
    Transport, TransportError,
};

/// Code returned when a method has no registered handler.
pub const NO_HANDLER: i32 = 404;

type Handler = Arc<dyn Fn(&[Param]) -> InvokeResponse + Send + Sync>;

/// One recorded call to [`Transport::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub component: String,
    pub method: String,
    pub params: Vec<Param>,
    pub options: InvokeOptions,
}

struct RegisteredComponent {
    info: ComponentInfo,
    methods: Vec<MethodInfo>,
}

#[derive(Default)]
struct Inner {
    components: Vec<RegisteredComponent>,
    types: HashMap<String, Vec<FieldInfo>>,
    handlers: HashMap<(String, String), Handler>,
    invocations: Vec<Invocation>,
    refused: HashSet<String>,
    probe_failing: bool,
}

/// In-memory registry implementing both [`Connector`] and [`Transport`].
///
/// Clones share state, so a test can keep a handle while the session owns
/// the connected binding.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl fmt::Debug for MemoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MemoryRegistry")
            .field("components", &inner.components.len())
            .field("types", &inner.types.len())
            .field("invocations", &inner.invocations.len())
            .finish_non_exhaustive()
    }
}

impl MemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with its methods.
    #[must_use]
    pub fn with_component(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        methods: Vec<MethodInfo>,
    ) -> Self {
        self.write().components.push(RegisteredComponent {
            info: ComponentInfo::new(name, type_name),
            methods,
        });
        self
    }

    /// Register the fields of a composite type.
    #[must_use]
    pub fn with_type(self, type_name: impl Into<String>, fields: Vec<FieldInfo>) -> Self {
        self.write().types.insert(type_name.into(), fields);
        self
    }

    /// Register the handler of a method.
    #[must_use]
    pub fn on_invoke<F>(self, component: impl Into<String>, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Param]) -> InvokeResponse + Send + Sync + 'static,
    {
        self.write()
            .handlers
            .insert((component.into(), method.into()), Arc::new(handler));
        self
    }

    /// Make `connect` fail for `endpoint`.
    #[must_use]
    pub fn refuse(self, endpoint: impl Into<String>) -> Self {
        self.write().refused.insert(endpoint.into());
        self
    }

    /// Toggle a failing liveness probe.
    pub fn set_probe_failing(&self, failing: bool) {
        self.write().probe_failing = failing;
    }

    /// Every invocation received so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.read().invocations.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// A small registry for trying the shell without a server.
    #[must_use]
    pub fn demo() -> Self {
        const USER: &str = "com.example.User";
        const ORDER: &str = "com.example.Order";

        Self::new()
            .with_type(
                USER,
                vec![
                    FieldInfo::new("id", "java.lang.Long"),
                    FieldInfo::new("name", "java.lang.String"),
                    FieldInfo::new("email", "java.lang.String"),
                    FieldInfo::new("birthday", "java.util.Date"),
                    FieldInfo::new("active", "java.lang.Boolean"),
                ],
            )
            .with_type(
                ORDER,
                vec![
                    FieldInfo::new("id", "java.lang.Long"),
                    FieldInfo::new("owner", USER),
                    FieldInfo::new("amount", "java.math.BigDecimal"),
                    FieldInfo::new("tags", "java.util.List"),
                ],
            )
            .with_component(
                "userService",
                "com.example.service.UserService",
                vec![
                    MethodInfo::new("findUser", USER, vec![FieldInfo::new("id", "java.lang.Long")]),
                    MethodInfo::new(
                        "findUserByName",
                        USER,
                        vec![FieldInfo::new("name", "java.lang.String")],
                    ),
                    MethodInfo::new("saveUser", "java.lang.Long", vec![FieldInfo::new("user", USER)]),
                    MethodInfo::new("countUsers", "java.lang.Integer", vec![]),
                ],
            )
            .with_component(
                "orderService",
                "com.example.service.OrderService",
                vec![MethodInfo::new(
                    "createOrder",
                    "java.lang.String",
                    vec![FieldInfo::new("order", ORDER)],
                )],
            )
            .on_invoke("userService", "findUser", |params| {
                let id = params.first().map_or("0", |p| p.value.as_str());
                InvokeResponse::success(format!(
                    r#"{{"id":{id},"name":"user{id}","email":"user{id}@example.com","active":true}}"#
                ))
                .with_logs(vec![format!("SELECT * FROM users WHERE id = {id}")])
            })
            .on_invoke("userService", "findUserByName", |params| {
                let name = params.first().map_or("", |p| p.value.as_str());
                let body = serde_json::json!({ "id": 1, "name": name, "active": true });
                InvokeResponse::success(body.to_string())
            })
            .on_invoke("userService", "saveUser", |_| InvokeResponse::success("1"))
            .on_invoke("userService", "countUsers", |_| InvokeResponse::success("42"))
            .on_invoke("orderService", "createOrder", |params| {
                match params.first().map(|p| serde_json::from_str::<serde_json::Value>(&p.value)) {
                    Some(Ok(order)) if order.get("owner").is_some() => {
                        InvokeResponse::success("ORDER-0001")
                    }
                    _ => InvokeResponse::failure(400, "order owner is required"),
                }
            })
    }
}

#[async_trait]
impl Connector for MemoryRegistry {
    type Transport = Self;

    async fn connect(&self, endpoint: &str) -> Result<Self, TransportError> {
        if self.read().refused.contains(endpoint) {
            return Err(TransportError::Unreachable(format!("connection refused: {endpoint}")));
        }
        Ok(self.clone())
    }
}

#[async_trait]
impl Transport for MemoryRegistry {
    async fn probe(&self) -> Result<String, TransportError> {
        if self.read().probe_failing {
            return Err(TransportError::Unreachable("probe failed".to_owned()));
        }
        Ok("echo".to_owned())
    }

    async fn list_components(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<ComponentInfo>, TransportError> {
        Ok(self
            .read()
            .components
            .iter()
            .filter(|c| prefix.is_none_or(|p| c.info.type_name.starts_with(p)))
            .map(|c| c.info.clone())
            .collect())
    }

    async fn list_methods(&self, component: &str) -> Result<Vec<MethodInfo>, TransportError> {
        self.read()
            .components
            .iter()
            .find(|c| c.info.name == component)
            .map(|c| c.methods.clone())
            .ok_or_else(|| TransportError::Remote(format!("unknown component {component}")))
    }

    async fn list_fields(&self, type_name: &str) -> Result<Vec<FieldInfo>, TransportError> {
        self.read()
            .types
            .get(type_name)
            .cloned()
            .ok_or_else(|| TransportError::Remote(format!("unknown type {type_name}")))
    }

    async fn invoke(
        &self,
        component: &str,
        method: &str,
        params: &[Param],
        options: &InvokeOptions,
    ) -> Result<InvokeResponse, TransportError> {
        let handler = {
            let mut inner = self.write();
            inner.invocations.push(Invocation {
                component: component.to_owned(),
                method: method.to_owned(),
                params: params.to_vec(),
                options: options.clone(),
            });
            inner
                .handlers
                .get(&(component.to_owned(), method.to_owned()))
                .cloned()
        };

        Ok(handler.map_or_else(
            || InvokeResponse::failure(NO_HANDLER, format!("no handler for {component}.{method}")),
            |h| h(params),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prefix_filters_by_type() {
        let registry = MemoryRegistry::demo();
        let all = registry.list_components(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let users = registry
            .list_components(Some("com.example.service.User"))
            .await
            .unwrap();
        assert_eq!(users, vec![ComponentInfo::new("userService", "com.example.service.UserService")]);
    }

    #[tokio::test]
    async fn test_invocations_are_recorded() {
        let registry = MemoryRegistry::demo();
        let params = vec![Param::new("java.lang.Long", "7")];
        let response = registry
            .invoke("userService", "findUser", &params, &InvokeOptions::default())
            .await
            .unwrap();
        assert!(response.is_success());
        assert!(response.result.unwrap().contains("user7"));

        let calls = registry.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params, params);
    }

    #[tokio::test]
    async fn test_missing_handler_and_unknowns() {
        let registry = MemoryRegistry::new().with_component("a", "t.A", vec![]);
        let response = registry
            .invoke("a", "nope", &[], &InvokeOptions::default())
            .await
            .unwrap();
        assert_eq!(response.code, NO_HANDLER);
        assert!(registry.list_methods("b").await.is_err());
        assert!(registry.list_fields("t.B").await.is_err());
    }

    #[tokio::test]
    async fn test_connect_refused_and_probe() {
        let registry = MemoryRegistry::new().refuse("mem://down");
        assert!(registry.connect("mem://down").await.is_err());
        let bound = registry.connect("mem://up").await.unwrap();
        assert_eq!(bound.probe().await.unwrap(), "echo");
        registry.set_probe_failing(true);
        assert!(bound.probe().await.is_err());
    }

    #[test]
    fn test_demo_registry_describes_types() {
        let registry = MemoryRegistry::demo();
        let fields = tokio_test::block_on(registry.list_fields("com.example.Order")).unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "owner", "amount", "tags"]);
    }
}
