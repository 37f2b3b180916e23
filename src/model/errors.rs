use miette::Diagnostic;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Clone, Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ModelError {
    #[error("Type arguments cannot be applied to `{name}`")]
    #[diagnostic(help("only a declared class or interface type can take type arguments"))]
    NotGeneric { name: String },
    #[error("`{name}` is already parameterized and cannot be used as a base")]
    #[diagnostic(help(
        "narrow the parameterized type to append further arguments instead of nesting it"
    ))]
    AlreadyNarrowed { name: String },
    #[error("Substitution received {variables} type variables but {bindings} bindings")]
    #[diagnostic(help("variables and bindings are matched by position and must be equal in length"))]
    BindingArity { variables: usize, bindings: usize },
    #[error("Slot `{slot}` does not support replacement")]
    SlotReadOnly { slot: &'static str },
}
