use crate::model::errors::{ModelError, ModelResult};
use crate::model::types::{JavaType, ParameterizedType, TypeRef, TypeVar};

/// Rewrites `node` with every occurrence of an entry in `variables` replaced
/// by the binding at the same position. Subtrees that reference none of the
/// variables come back as the original allocation, so callers can detect
/// "nothing changed" with `TypeRef::ptr_eq` instead of a deep comparison.
///
/// The two lists are positionally correlated; a length mismatch is a caller
/// bug and is always reported, never skipped.
pub fn substitute(
    node: &TypeRef,
    variables: &[TypeVar],
    bindings: &[TypeRef],
) -> ModelResult<TypeRef> {
    if variables.len() != bindings.len() {
        return Err(ModelError::BindingArity {
            variables: variables.len(),
            bindings: bindings.len(),
        });
    }
    Ok(apply(node, variables, bindings))
}

/// Arity already checked by the caller.
pub(crate) fn apply(node: &TypeRef, variables: &[TypeVar], bindings: &[TypeRef]) -> TypeRef {
    match node.kind() {
        JavaType::Variable(var) => {
            for (declared, bound) in variables.iter().zip(bindings) {
                if declared.same_declaration(var) {
                    return bound.clone();
                }
            }
            node.clone()
        }
        JavaType::Array(element) => {
            let substituted = apply(element, variables, bindings);
            if TypeRef::ptr_eq(&substituted, element) {
                node.clone()
            } else {
                TypeRef::array(substituted)
            }
        }
        JavaType::Parameterized(p) => {
            let base = apply(p.base(), variables, bindings);
            let mut changed = !TypeRef::ptr_eq(&base, p.base());
            let args: Vec<TypeRef> = p
                .type_arguments()
                .iter()
                .map(|arg| {
                    let substituted = apply(arg, variables, bindings);
                    changed |= !TypeRef::ptr_eq(&substituted, arg);
                    substituted
                })
                .collect();
            if changed {
                TypeRef::from_kind(JavaType::Parameterized(ParameterizedType::from_parts(
                    base, args,
                )))
            } else {
                node.clone()
            }
        }
        JavaType::Primitive(_) | JavaType::Declared(_) => node.clone(),
    }
}
