//! Session orchestrator.

use std::path::Path;

use remote_shell_core::{
    ComponentInfo, Connector, ContainerStore, InvokeOptions, MethodInfo, Prompter, Transport,
    container::{self, read_value},
    value::{self, is_scalar},
};

use crate::{
    BuildMode, DirectoryCache, History, Invocation, ListKind, MatchMode, ObjectBuilder,
    SessionError, SessionOptions, SessionState,
    builder::collect_arguments,
    format,
    resolver,
    state::non_empty,
};

/// Components shown when nothing is selected.
const ROOT: &str = "/";
/// Argument of `cd` that clears the selection.
const PARENT: &str = "..";

/// Outcome of a `call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Formatted result text.
    Completed(String),
    /// The user declined to pick among ambiguous methods.
    Cancelled,
}

/// What to complete against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Components,
    Methods,
    /// Components at the root, methods inside a component.
    Common,
    Containers,
}

/// One interactive session against one remote registry.
///
/// All state is owned here and touched only by the command currently running.
pub struct Session<C, P>
where
    C: Connector,
    P: Prompter,
{
    connector: C,
    prompter: P,
    transport: Option<C::Transport>,
    state: SessionState,
    directory: DirectoryCache,
    containers: ContainerStore,
    history: History,
}

impl<C, P> Session<C, P>
where
    C: Connector,
    P: Prompter,
{
    /// Create a disconnected session.
    #[must_use]
    pub fn new(connector: C, prompter: P) -> Self {
        Self {
            connector,
            prompter,
            transport: None,
            state: SessionState::default(),
            directory: DirectoryCache::default(),
            containers: ContainerStore::new(),
            history: History::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn directory(&self) -> &DirectoryCache {
        &self.directory
    }

    #[must_use]
    pub const fn containers(&self) -> &ContainerStore {
        &self.containers
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    fn transport(&self) -> Result<&C::Transport, SessionError> {
        self.transport.as_ref().ok_or(SessionError::NotConnected)
    }

    /// Bind to `endpoint`, probe it and fetch its directory.
    ///
    /// # Errors
    /// Returns `ConnectionFailed` if any step fails; the previous binding, directory
    /// and selection are then kept as they were.
    pub async fn connect(&mut self, endpoint: &str) -> Result<(), SessionError> {
        let prefix = self.state.component_prefix.clone();
        self.connect_with_prefix(endpoint, prefix.as_deref()).await
    }

    async fn connect_with_prefix(
        &mut self,
        endpoint: &str,
        prefix: Option<&str>,
    ) -> Result<(), SessionError> {
        let failed = |source| SessionError::ConnectionFailed {
            endpoint: endpoint.to_owned(),
            source,
        };
        let transport = self.connector.connect(endpoint).await.map_err(failed)?;
        transport.probe().await.map_err(failed)?;
        let directory = DirectoryCache::fetch(&transport, prefix)
            .await
            .map_err(failed)?;

        tracing::info!(endpoint, components = directory.components().len(), "Connected");
        self.transport = Some(transport);
        self.directory = directory;
        self.state.endpoint = Some(endpoint.to_owned());
        self.state.current_component = None;
        Ok(())
    }

    /// Remote liveness probe.
    ///
    /// # Errors
    /// Returns `NotConnected` or the transport error.
    pub async fn echo(&self) -> Result<String, SessionError> {
        Ok(self.transport()?.probe().await?)
    }

    /// Cached components matching `filter` as a substring.
    ///
    /// # Errors
    /// Returns `NotConnected` without a binding.
    pub fn list_components(&self, filter: Option<&str>) -> Result<Vec<ComponentInfo>, SessionError> {
        self.transport()?;
        Ok(self
            .directory
            .filter_components(filter, MatchMode::Substring)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Methods of the selected component matching `filter` as a substring.
    ///
    /// # Errors
    /// Returns `NotConnected` or `NoComponentSelected`.
    pub fn list_methods(&self, filter: Option<&str>) -> Result<Vec<MethodInfo>, SessionError> {
        self.transport()?;
        if self.state.current_component.is_none() {
            return Err(SessionError::NoComponentSelected);
        }
        Ok(self
            .directory
            .filter_methods(filter, MatchMode::Substring)
            .into_iter()
            .cloned()
            .collect())
    }

    /// `ls`: components at the root, methods inside a component.
    ///
    /// # Errors
    /// Returns `NotConnected` without a binding.
    pub fn ls(&self, filter: Option<&str>) -> Result<String, SessionError> {
        let lines: Vec<String> = if self.state.current_component.is_some() {
            self.list_methods(filter)?.iter().map(format::method_line).collect()
        } else {
            self.list_components(filter)?
                .iter()
                .map(format::component_line)
                .collect()
        };
        Ok(lines.join("\n"))
    }

    /// Select a component; `..` (or `/`) clears the selection.
    ///
    /// # Errors
    /// Returns `NotConnected`, `UnknownComponent`, or a transport error. The
    /// selection is unchanged on error.
    pub async fn select_component(&mut self, target: &str) -> Result<(), SessionError> {
        let target = target.trim();
        let component = match target {
            PARENT | ROOT | "" => None,
            name => Some(name.trim_start_matches('/')),
        };
        let transport = self.transport.as_ref().ok_or(SessionError::NotConnected)?;
        self.directory.select(transport, component).await?;
        self.state.current_component = self.directory.current().map(ToOwned::to_owned);
        Ok(())
    }

    /// `/` or `/<component>`.
    #[must_use]
    pub fn pwd(&self) -> String {
        self.state
            .current_component
            .as_deref()
            .map_or_else(|| ROOT.to_owned(), |c| format!("{ROOT}{c}"))
    }

    /// Resolve, build parameters, invoke, store under `RESULT` and record history.
    ///
    /// # Errors
    /// Any error aborts before the remote call, or reports a failed remote call;
    /// neither `RESULT` nor the history change on error.
    pub async fn call(&mut self, hint: &str) -> Result<CallOutcome, SessionError> {
        let transport = self.transport.as_ref().ok_or(SessionError::NotConnected)?;
        let component = self
            .state
            .current_component
            .clone()
            .ok_or(SessionError::NoComponentSelected)?;

        let Some(method) = resolver::resolve(self.directory.methods(), hint, &mut self.prompter)? else {
            return Ok(CallOutcome::Cancelled);
        };
        let params =
            collect_arguments(transport, &mut self.prompter, &mut self.containers, &method).await?;

        let invocation = Invocation {
            component,
            method,
            params,
        };
        let result = self.dispatch(&invocation).await?;
        self.containers.put(
            Some(container::RESULT),
            invocation.method.return_type.clone(),
            result.clone(),
        );
        self.history.record(invocation);
        Ok(CallOutcome::Completed(format::pretty_result(&result)))
    }

    /// Replay the last successful call unchanged.
    ///
    /// # Errors
    /// Returns `NoHistory` before any successful call.
    pub async fn repeat_last(&mut self) -> Result<String, SessionError> {
        let invocation = self.history.repeat()?.clone();
        let result = self.dispatch(&invocation).await?;
        self.containers.put(
            Some(container::RESULT),
            invocation.method.return_type.clone(),
            result.clone(),
        );
        Ok(format::pretty_result(&result))
    }

    async fn dispatch(&mut self, invocation: &Invocation) -> Result<String, SessionError> {
        let transport = self.transport()?;
        let options: InvokeOptions = self.state.invoke_options();
        tracing::info!(
            component = %invocation.component,
            method = %invocation.method.name,
            params = invocation.params.len(),
            "Invoking"
        );
        let response = transport
            .invoke(
                &invocation.component,
                &invocation.method.name,
                &invocation.params,
                &options,
            )
            .await?;

        if !response.is_success() {
            return Err(SessionError::RemoteInvocation {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        for line in response.logs.iter().flatten() {
            tracing::debug!(target: "remote", "{line}");
        }
        self.state.last_log = response.logs.map(|logs| logs.join("\n"));
        Ok(response.result.unwrap_or_else(|| "null".to_owned()))
    }

    /// Create a container of `type_name`, prompting unless `value` is given.
    ///
    /// Returns the name the container was stored under.
    ///
    /// # Errors
    /// Returns the builder's error; no container is written on error.
    pub async fn create(
        &mut self,
        type_name: &str,
        name: Option<&str>,
        mode: BuildMode,
        value: Option<&str>,
    ) -> Result<String, SessionError> {
        let text = match value {
            Some(value) => validated(value, type_name)?,
            None => {
                ObjectBuilder::new(self.transport.as_ref(), &mut self.prompter, &self.containers)
                    .build(type_name, mode)
                    .await?
            }
        };
        Ok(self.containers.put(name, type_name, text))
    }

    /// `type: ...` / `value: ...` of a container.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown name.
    pub fn print_container(&self, name: &str) -> Result<String, SessionError> {
        Ok(format::container_text(self.containers.get(name)?))
    }

    /// Write a container's value verbatim to `path`.
    ///
    /// # Errors
    /// Returns `NotFound` or an I/O error.
    pub fn persist_container(&self, name: &str, path: &Path) -> Result<(), SessionError> {
        self.containers.persist(name, path)?;
        tracing::info!(name, path = %path.display(), "Persisted container");
        Ok(())
    }

    /// Load a container from a file written by [`Self::persist_container`].
    ///
    /// # Errors
    /// Returns an I/O error, or `TypeMismatch` if the content does not parse as
    /// `type_name`; no container is written on error.
    pub fn load_container_from_file(
        &mut self,
        path: &Path,
        type_name: &str,
        name: Option<&str>,
    ) -> Result<String, SessionError> {
        let text = validated(&read_value(path)?, type_name)?;
        Ok(self.containers.put(name, type_name, text))
    }

    /// Sorted container names.
    #[must_use]
    pub fn list_containers(&self) -> Vec<String> {
        self.containers.list()
    }

    /// Apply a configuration update.
    ///
    /// A new endpoint reconnects; a new prefix refreshes the directory. Nothing is
    /// applied unless every step succeeds.
    ///
    /// # Errors
    /// Returns `ConnectionFailed` or the refresh's transport error.
    pub async fn configure(&mut self, options: SessionOptions) -> Result<(), SessionError> {
        let prefix = match options.prefix.as_deref() {
            Some(p) => non_empty(p),
            None => self.state.component_prefix.clone(),
        };

        if let Some(endpoint) = options.endpoint.as_deref() {
            self.connect_with_prefix(endpoint.trim(), prefix.as_deref())
                .await?;
        } else if options.prefix.is_some() {
            if let Some(transport) = self.transport.as_ref() {
                self.directory.refresh(transport, prefix.as_deref()).await?;
                self.state.current_component = self.directory.current().map(ToOwned::to_owned);
            }
        }

        self.state.component_prefix = prefix;
        if let Some(level) = options.log_level.as_deref() {
            self.state.log_level = non_empty(level);
        }
        if let Some(enabled) = options.enable_database_log {
            self.state.database_log_enabled = enabled;
        }
        tracing::debug!(state = ?self.state, "Configured session");
        Ok(())
    }

    /// `set` is accepted for compatibility and has no effect.
    pub fn set_attribute(&self, attribute: &str, value: Option<&str>) {
        tracing::info!(attribute, ?value, "Ignoring set: attributes are not supported");
    }

    /// Log lines captured by the last successful call.
    #[must_use]
    pub fn last_log(&self) -> Option<&str> {
        self.state.last_log.as_deref()
    }

    /// Console prompt text.
    #[must_use]
    pub fn prompt_label(&self) -> String {
        if self.is_connected() {
            format!("remote:{}>", self.pwd())
        } else {
            "server-unknown:>".to_owned()
        }
    }

    /// Completion candidates for `partial`.
    #[must_use]
    pub fn completions(&self, kind: CompletionKind, partial: &str) -> Vec<String> {
        let needle = Some(partial);
        match kind {
            CompletionKind::Components => {
                self.directory.filter(ListKind::Components, needle, MatchMode::Prefix)
            }
            CompletionKind::Methods => {
                self.directory.filter(ListKind::Methods, needle, MatchMode::Prefix)
            }
            CompletionKind::Common if self.directory.current().is_some() => {
                self.directory.filter(ListKind::Methods, needle, MatchMode::Prefix)
            }
            CompletionKind::Common => {
                self.directory.filter(ListKind::Components, needle, MatchMode::Prefix)
            }
            CompletionKind::Containers => self
                .containers
                .list()
                .into_iter()
                .filter(|n| n.starts_with(partial))
                .collect(),
        }
    }
}

/// Validate a user-supplied container value for `type_name`.
fn validated(text: &str, type_name: &str) -> Result<String, SessionError> {
    let materialize = !is_scalar(type_name);
    value::parse(text, type_name, materialize)?;
    Ok(text.to_owned())
}

#[cfg(test)]
mod tests {
    use remote_shell_core::{
        FieldInfo, InvokeResponse, MethodInfo, Param, ScriptedPrompter, TransportError,
    };
    use remote_shell_transport::MemoryRegistry;

    use super::*;

    const ENDPOINT: &str = "mem://registry";
    const USER: &str = "com.example.User";

    fn registry() -> MemoryRegistry {
        MemoryRegistry::new()
            .with_type(
                USER,
                vec![
                    FieldInfo::new("id", "java.lang.Long"),
                    FieldInfo::new("name", "java.lang.String"),
                ],
            )
            .with_component(
                "svc",
                "com.example.Svc",
                vec![
                    MethodInfo::new("foo", "java.lang.String", vec![FieldInfo::new("n", "java.lang.Integer")]),
                    MethodInfo::new("foobar", USER, vec![FieldInfo::new("u", USER)]),
                    MethodInfo::new("bar", "java.lang.Integer", vec![]),
                ],
            )
            .with_component("other", "org.other.Other", vec![MethodInfo::new("ping", "java.lang.String", vec![])])
            .on_invoke("svc", "foo", |params| {
                InvokeResponse::success(format!("foo:{}", params[0].value))
                    .with_logs(vec!["line 1".to_owned(), "line 2".to_owned()])
            })
            .on_invoke("svc", "foobar", |params| InvokeResponse::success(params[0].value.clone()))
            .on_invoke("svc", "bar", |_| InvokeResponse::failure(500, "bar exploded"))
            .on_invoke("other", "ping", |_| InvokeResponse::success("pong"))
    }

    async fn connected(registry: &MemoryRegistry) -> Session<MemoryRegistry, ScriptedPrompter> {
        let mut session = Session::new(registry.clone(), ScriptedPrompter::default());
        session.connect(ENDPOINT).await.unwrap();
        session
    }

    fn answer(session: &mut Session<MemoryRegistry, ScriptedPrompter>, answers: &[&str]) {
        for a in answers {
            session.prompter_mut().push(*a);
        }
    }

    #[tokio::test]
    async fn test_connect_lists_full_directory() {
        let registry = registry();
        let session = connected(&registry).await;
        assert!(session.is_connected());
        assert_eq!(session.state().endpoint.as_deref(), Some(ENDPOINT));
        let names: Vec<String> = session
            .list_components(None)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["svc", "other"]);
        assert_eq!(session.echo().await.unwrap(), "echo");
        assert_eq!(session.prompt_label(), "remote:/>");
    }

    #[tokio::test]
    async fn test_connect_failure_keeps_previous_state() {
        let registry = registry().refuse("mem://down");
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();

        let err = session.connect("mem://down").await.unwrap_err();
        assert!(matches!(err, SessionError::ConnectionFailed { .. }));
        assert_eq!(session.state().endpoint.as_deref(), Some(ENDPOINT));
        assert_eq!(session.pwd(), "/svc");

        registry.set_probe_failing(true);
        let err = session.connect("mem://other").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::ConnectionFailed {
                source: TransportError::Unreachable(_),
                ..
            }
        ));
        assert_eq!(session.state().endpoint.as_deref(), Some(ENDPOINT));
    }

    #[tokio::test]
    async fn test_connect_failure_from_disconnected() {
        let registry = registry();
        registry.set_probe_failing(true);
        let mut session = Session::new(registry, ScriptedPrompter::default());
        assert!(session.connect(ENDPOINT).await.is_err());
        assert!(!session.is_connected());
        assert_eq!(session.state(), &SessionState::default());
        assert_eq!(session.prompt_label(), "server-unknown:>");
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let mut session = Session::new(registry(), ScriptedPrompter::default());
        assert!(matches!(session.list_components(None), Err(SessionError::NotConnected)));
        assert!(matches!(session.select_component("svc").await, Err(SessionError::NotConnected)));
        assert!(matches!(session.call("foo").await, Err(SessionError::NotConnected)));
        assert!(matches!(session.echo().await, Err(SessionError::NotConnected)));
    }

    #[tokio::test]
    async fn test_select_unknown_component() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        let err = session.select_component("ghost").await.unwrap_err();
        assert!(matches!(err, SessionError::UnknownComponent(_)));
        assert_eq!(session.state().current_component.as_deref(), Some("svc"));

        session.select_component("..").await.unwrap();
        assert_eq!(session.state().current_component, None);
        assert!(session.directory().methods().is_empty());
        assert_eq!(session.pwd(), "/");
    }

    #[tokio::test]
    async fn test_ls_renders_components_then_methods() {
        let registry = registry();
        let mut session = connected(&registry).await;
        assert_eq!(session.ls(None).unwrap(), "svc[Svc]\nother[Other]");
        session.select_component("svc").await.unwrap();
        assert_eq!(
            session.ls(Some("bar")).unwrap(),
            "User foobar(User u)\nInteger bar()"
        );
    }

    #[tokio::test]
    async fn test_call_stores_result_and_history() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["5"]);

        let outcome = session.call("foo").await.unwrap();
        assert_eq!(outcome, CallOutcome::Completed("foo:5".to_owned()));
        let result = session.containers().get(container::RESULT).unwrap();
        assert_eq!(result.type_name, "java.lang.String");
        assert_eq!(result.value, "foo:5");
        assert_eq!(session.last_log(), Some("line 1\nline 2"));

        let last = session.history().last().unwrap();
        assert_eq!(last.component, "svc");
        assert_eq!(last.params, vec![Param::new("java.lang.Integer", "5")]);
    }

    #[tokio::test]
    async fn test_unlogged_call_clears_last_log() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["5"]);
        session.call("foo").await.unwrap();
        assert_eq!(session.last_log(), Some("line 1\nline 2"));

        session.select_component("other").await.unwrap();
        session.call("ping").await.unwrap();
        assert_eq!(session.last_log(), None);
    }

    #[tokio::test]
    async fn test_failed_call_keeps_last_log() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["5"]);
        session.call("foo").await.unwrap();
        assert!(session.call("bar").await.is_err());
        assert_eq!(session.last_log(), Some("line 1\nline 2"));
    }

    #[tokio::test]
    async fn test_call_type_mismatch_sends_nothing() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["five"]);

        let err = session.call("foo").await.unwrap_err();
        assert!(err.is_type_mismatch());
        assert!(registry.invocations().is_empty());
        assert!(session.containers().is_empty());
        assert!(session.history().last().is_none());
    }

    #[tokio::test]
    async fn test_call_ambiguous_then_cancel() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["<NULL>"]);

        assert_eq!(session.call("oo").await.unwrap(), CallOutcome::Cancelled);
        assert!(registry.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_call_ambiguous_then_choose() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["2", "<SIMPLE>", r#"{"id":3}"#]);

        let outcome = session.call("oo").await.unwrap();
        assert_eq!(outcome, CallOutcome::Completed("{\n  \"id\": 3\n}".to_owned()));
        assert_eq!(session.containers().get(container::RESULT).unwrap().type_name, USER);
        assert_eq!(session.containers().get(container::ARGUMENT).unwrap().value, r#"{"id":3}"#);
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_history() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["1"]);
        session.call("foo").await.unwrap();

        let err = session.call("bar").await.unwrap_err();
        assert!(matches!(err, SessionError::RemoteInvocation { code: 500, .. }));
        assert_eq!(session.history().last().unwrap().method.name, "foo");
        assert_eq!(session.containers().get(container::RESULT).unwrap().value, "foo:1");
    }

    #[tokio::test]
    async fn test_repeat_requires_history() {
        let registry = registry();
        let mut session = connected(&registry).await;
        assert!(matches!(session.repeat_last().await, Err(SessionError::NoHistory)));
    }

    #[tokio::test]
    async fn test_repeat_replays_after_selection_changes() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session.select_component("svc").await.unwrap();
        answer(&mut session, &["9"]);
        session.call("foo").await.unwrap();

        session.select_component("other").await.unwrap();
        assert_eq!(session.repeat_last().await.unwrap(), "foo:9");

        let calls = registry.invocations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(calls[1].component, "svc");
        assert_eq!(calls[1].method, "foo");
    }

    #[tokio::test]
    async fn test_create_scalar() {
        let registry = registry();
        let mut session = connected(&registry).await;
        answer(&mut session, &["42"]);
        let name = session
            .create("java.lang.Integer", Some("N"), BuildMode::Full, None)
            .await
            .unwrap();
        assert_eq!(name, "N");
        let n = session.containers().get("N").unwrap();
        assert_eq!((n.type_name.as_str(), n.value.as_str()), ("java.lang.Integer", "42"));
    }

    #[tokio::test]
    async fn test_create_scalar_mismatch_writes_nothing() {
        let registry = registry();
        let mut session = connected(&registry).await;
        answer(&mut session, &["x"]);
        let err = session
            .create("java.lang.Integer", Some("N"), BuildMode::Full, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::TypeMismatch(_)));
        assert!(!session.containers().contains("N"));
    }

    #[tokio::test]
    async fn test_create_unnamed_and_explicit_value() {
        let mut session = Session::new(registry(), ScriptedPrompter::default());
        let first = session
            .create("java.lang.String", None, BuildMode::Full, Some("a"))
            .await
            .unwrap();
        let second = session
            .create(USER, None, BuildMode::Simple, Some(r#"{"id":1}"#))
            .await
            .unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("TEMP0", "TEMP1"));
        assert!(
            session
                .create(USER, None, BuildMode::Simple, Some("{bad"))
                .await
                .is_err()
        );
        assert_eq!(session.list_containers(), ["TEMP0", "TEMP1"]);
    }

    #[tokio::test]
    async fn test_persist_and_load_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u.json");
        let mut session = Session::new(registry(), ScriptedPrompter::default());
        session
            .create(USER, Some("u"), BuildMode::Simple, Some(r#"{"id":2}"#))
            .await
            .unwrap();
        session.persist_container("u", &path).unwrap();

        let name = session.load_container_from_file(&path, USER, Some("copy")).unwrap();
        assert_eq!(name, "copy");
        assert_eq!(
            session.print_container("copy").unwrap(),
            "type: com.example.User\nvalue: {\"id\":2}"
        );

        std::fs::write(&path, "abc").unwrap();
        assert!(session.load_container_from_file(&path, "java.lang.Long", Some("n")).is_err());
        assert!(!session.containers().contains("n"));
        assert!(matches!(
            session.print_container("ghost"),
            Err(SessionError::NotFound { kind: "Object", .. })
        ));
    }

    #[tokio::test]
    async fn test_configure_prefix_refreshes() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session
            .configure(SessionOptions {
                prefix: Some("org.".to_owned()),
                log_level: Some("DEBUG".to_owned()),
                enable_database_log: Some(true),
                ..SessionOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(session.ls(None).unwrap(), "other[Other]");
        assert_eq!(session.state().component_prefix.as_deref(), Some("org."));

        session.select_component("other").await.unwrap();
        session.call("ping").await.unwrap();
        let options = &registry.invocations()[0].options;
        assert_eq!(options.log_level.as_deref(), Some("DEBUG"));
        assert!(options.capture_db_log);
    }

    #[tokio::test]
    async fn test_configure_failed_endpoint_applies_nothing() {
        let registry = registry().refuse("mem://down");
        let mut session = connected(&registry).await;
        let err = session
            .configure(SessionOptions {
                endpoint: Some("mem://down".to_owned()),
                prefix: Some("org.".to_owned()),
                log_level: Some("TRACE".to_owned()),
                ..SessionOptions::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ConnectionFailed { .. }));
        assert_eq!(session.state().component_prefix, None);
        assert_eq!(session.state().log_level, None);
        assert_eq!(session.list_components(None).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_configure_endpoint_connects() {
        let mut session = Session::new(registry(), ScriptedPrompter::default());
        session
            .configure(SessionOptions {
                endpoint: Some(ENDPOINT.to_owned()),
                ..SessionOptions::default()
            })
            .await
            .unwrap();
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_completions() {
        let registry = registry();
        let mut session = connected(&registry).await;
        session
            .create("java.lang.String", Some("name"), BuildMode::Full, Some("x"))
            .await
            .unwrap();
        assert_eq!(session.completions(CompletionKind::Common, "s"), ["svc"]);
        session.select_component("svc").await.unwrap();
        assert_eq!(session.completions(CompletionKind::Common, "foo"), ["foo", "foobar"]);
        assert_eq!(session.completions(CompletionKind::Components, "o"), ["other"]);
        assert_eq!(session.completions(CompletionKind::Containers, "na"), ["name"]);
    }

    #[test]
    fn test_disconnected_session_state() {
        let mut session = Session::new(registry(), ScriptedPrompter::default());
        assert!(matches!(
            tokio_test::block_on(session.repeat_last()),
            Err(SessionError::NoHistory)
        ));
        assert_eq!(session.pwd(), "/");
        assert_eq!(session.last_log(), None);
        session.set_attribute("verbose", Some("on"));
        assert!(session.list_containers().is_empty());
    }
}
