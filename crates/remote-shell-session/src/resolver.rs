//! Method name resolution and disambiguation.

use remote_shell_core::{MethodInfo, Prompter, Token, literal};

use crate::{SessionError, format};

/// Methods matching a hint: exact names first, substrings as a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates<'a> {
    None,
    One(&'a MethodInfo),
    Many(Vec<&'a MethodInfo>),
}

/// Match `hint` against `methods`.
#[must_use]
pub fn candidates<'a>(methods: &'a [MethodInfo], hint: &str) -> Candidates<'a> {
    let mut found: Vec<&MethodInfo> = methods.iter().filter(|m| m.name == hint).collect();
    if found.is_empty() {
        found = methods.iter().filter(|m| m.name.contains(hint)).collect();
    }
    match found.len() {
        0 => Candidates::None,
        1 => Candidates::One(found[0]),
        _ => Candidates::Many(found),
    }
}

/// Resolve `hint` to one method, asking the user to pick when ambiguous.
///
/// Returns `Ok(None)` if the user cancels the choice.
///
/// # Errors
/// Returns `NotFound` if nothing matches or the chosen number is out of range.
pub fn resolve<P>(
    methods: &[MethodInfo],
    hint: &str,
    prompter: &mut P,
) -> Result<Option<MethodInfo>, SessionError>
where
    P: Prompter + ?Sized,
{
    let choices = match candidates(methods, hint) {
        Candidates::None => return Err(SessionError::method_not_found(hint)),
        Candidates::One(method) => return Ok(Some(method.clone())),
        Candidates::Many(choices) => choices,
    };

    let label = format!(
        "{}\nSelect the method number to execute",
        format::choice_list(&choices)
    );
    let answer = prompter.prompt(&label, literal::NULL, true)?;
    let answer = answer.trim();
    if matches!(Token::parse(answer), Token::NoValue)
        || answer.is_empty()
        || !answer.bytes().all(|b| b.is_ascii_digit())
    {
        tracing::debug!(hint, answer, "Method choice cancelled");
        return Ok(None);
    }

    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i))
        .map(|m| Some((*m).clone()))
        .ok_or_else(|| SessionError::method_not_found(hint))
}
