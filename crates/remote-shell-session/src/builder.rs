//! Interactive construction of parameter values.
//!
//! Every prompted answer goes through [`Token::parse`] first:
//! - `<NULL>` / `<SKIP>` omit an object field (or pass `<NULL>` positionally)
//! - `<name>` dereferences a container whose type must equal the slot's type
//! - `<CREATE>` / `<SIMPLE>` build a nested value on the spot
//! - anything else is coerced against the declared type

use futures::future::BoxFuture;
use indexmap::IndexMap;
use remote_shell_core::{
    ContainerStore, FieldInfo, MethodInfo, Param, ParsedValue, Prompter, ScalarKind, Token,
    Transport, TypedValue, Value, container, literal,
    value::{self, is_scalar},
};

use crate::SessionError;

/// How a composite value is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Ask for every field reported by the remote side.
    #[default]
    Full,
    /// Take the whole value as one JSON literal.
    Simple,
}

impl BuildMode {
    const fn for_token(token: Token<'_>) -> Option<Self> {
        match token {
            Token::Create => Some(Self::Full),
            Token::Simple => Some(Self::Simple),
            _ => None,
        }
    }
}

fn field_label(field: &FieldInfo) -> String {
    format!("Enter value for [{}] (type [{}])", field.name, field.type_name)
}

fn value_label(type_name: &str) -> String {
    format!("Enter value for [{type_name}]")
}

fn json_label(type_name: &str) -> String {
    format!("Enter JSON for [{type_name}]")
}

/// Builds values by asking field-by-field questions.
///
/// The transport is only needed for full composite builds; scalars and simple
/// builds work while disconnected.
pub struct ObjectBuilder<'a, T: ?Sized, P: ?Sized> {
    transport: Option<&'a T>,
    prompter: &'a mut P,
    containers: &'a ContainerStore,
}

impl<'a, T, P> ObjectBuilder<'a, T, P>
where
    T: Transport + ?Sized,
    P: Prompter + ?Sized,
{
    #[must_use]
    pub const fn new(
        transport: Option<&'a T>,
        prompter: &'a mut P,
        containers: &'a ContainerStore,
    ) -> Self {
        Self {
            transport,
            prompter,
            containers,
        }
    }

    /// Build a value of `type_name` and return its container text.
    ///
    /// Scalars come back as the literal typed by the user; composites as JSON.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a missing top-level value, `TypeMismatch` for bad
    /// literals or references, `NotFound` for unknown references. Nothing is
    /// emitted on error.
    pub async fn build(&mut self, type_name: &str, mode: BuildMode) -> Result<String, SessionError> {
        let parsed = self.build_value(type_name, mode, false).await?;
        Ok(parsed.into_text())
    }

    fn ask(&mut self, label: &str) -> Result<String, SessionError> {
        Ok(self.prompter.prompt(label, literal::NULL, true)?)
    }

    fn build_value<'s>(
        &'s mut self,
        type_name: &'s str,
        mode: BuildMode,
        materialize: bool,
    ) -> BoxFuture<'s, Result<ParsedValue, SessionError>> {
        Box::pin(async move {
            if is_scalar(type_name) {
                let answer = self.ask(&value_label(type_name))?;
                return match Token::parse(&answer) {
                    Token::Reference(name) => dereference(self.containers, name, type_name, materialize),
                    Token::Literal(text) => Ok(value::parse(text, type_name, materialize)?),
                    _ => Err(SessionError::InvalidInput(format!(
                        "no value supplied for [{type_name}]"
                    ))),
                };
            }

            match mode {
                BuildMode::Simple => {
                    let answer = self.ask(&json_label(type_name))?;
                    match Token::parse(&answer) {
                        Token::Reference(name) => {
                            dereference(self.containers, name, type_name, materialize)
                        }
                        Token::Literal(text) => {
                            let parsed = value::parse(text, type_name, true)?;
                            Ok(if materialize {
                                parsed
                            } else {
                                ParsedValue::Literal(text.to_owned())
                            })
                        }
                        _ => Err(SessionError::InvalidInput(format!(
                            "no value supplied for [{type_name}]"
                        ))),
                    }
                }
                BuildMode::Full => self.build_object(type_name).await,
            }
        })
    }

    async fn build_object(&mut self, type_name: &str) -> Result<ParsedValue, SessionError> {
        let transport = self.transport.ok_or(SessionError::NotConnected)?;
        let fields = transport.list_fields(type_name).await?;
        tracing::debug!(type_name, count = fields.len(), "Building object");

        let mut values = IndexMap::with_capacity(fields.len());
        for field in &fields {
            let answer = self.ask(&field_label(field))?;
            let token = Token::parse(&answer);
            let parsed = match token {
                Token::NoValue | Token::Skip => continue,
                Token::Reference(name) => dereference(self.containers, name, &field.type_name, true)?,
                Token::Create | Token::Simple => {
                    let mode = BuildMode::for_token(token).unwrap_or_default();
                    self.build_value(&field.type_name, mode, true).await?
                }
                Token::Literal(text) => value::parse(text, &field.type_name, true)?,
            };
            values.insert(field.name.clone(), materialized(parsed));
        }

        Ok(ParsedValue::Typed(TypedValue {
            type_name: type_name.to_owned(),
            value: Value::Object(values),
        }))
    }
}

/// Look up container `name` and check it against the slot's declared type.
///
/// # Errors
/// Returns `NotFound` for a missing container and `ReferenceMismatch` if its
/// type differs from `expected`.
pub fn dereference(
    containers: &ContainerStore,
    name: &str,
    expected: &str,
    materialize: bool,
) -> Result<ParsedValue, SessionError> {
    let container = containers.get(name)?;
    if container.type_name != expected {
        return Err(SessionError::ReferenceMismatch {
            name: name.to_owned(),
            expected: expected.to_owned(),
            actual: container.type_name.clone(),
        });
    }
    Ok(value::parse(&container.value, &container.type_name, materialize)?)
}

fn materialized(parsed: ParsedValue) -> Value {
    match parsed {
        ParsedValue::Typed(typed) => typed.value,
        ParsedValue::Literal(literal) => Value::Scalar {
            kind: ScalarKind::String,
            literal,
        },
    }
}

/// Prompt for every positional parameter of `method`.
///
/// `<CREATE>`/`<SIMPLE>` build the value on the spot. The last value built is
/// stored under [`container::ARGUMENT`] once every parameter has been collected.
///
/// # Errors
/// Returns the first error hit; nothing is stored and no parameter is sent.
pub async fn collect_arguments<T, P>(
    transport: &T,
    prompter: &mut P,
    containers: &mut ContainerStore,
    method: &MethodInfo,
) -> Result<Vec<Param>, SessionError>
where
    T: Transport + ?Sized,
    P: Prompter + ?Sized,
{
    let mut params = Vec::with_capacity(method.params.len());
    let mut argument = None;
    for field in &method.params {
        let answer = prompter.prompt(&field_label(field), literal::NULL, true)?;
        let token = Token::parse(&answer);
        let value = match token {
            Token::NoValue | Token::Skip => literal::NULL.to_owned(),
            Token::Reference(name) => dereference(containers, name, &field.type_name, false)?.into_text(),
            Token::Create | Token::Simple => {
                let mode = BuildMode::for_token(token).unwrap_or_default();
                let built = ObjectBuilder::new(Some(transport), &mut *prompter, &*containers)
                    .build(&field.type_name, mode)
                    .await?;
                let text = value::parse(&built, &field.type_name, false)?.into_text();
                argument = Some((field.type_name.clone(), built));
                text
            }
            Token::Literal(text) => value::parse(text, &field.type_name, false)?.into_text(),
        };
        params.push(Param::new(field.type_name.clone(), value));
    }
    if let Some((type_name, built)) = argument {
        containers.put(Some(container::ARGUMENT), type_name, built);
    }
    Ok(params)
}
