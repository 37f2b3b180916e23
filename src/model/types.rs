use crate::formatter::{Formatter, Generate};
use crate::model::errors::{ModelError, ModelResult};
use crate::model::substitute::apply;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// A type variable of a generic declaration. Identity is the declaration,
/// not the name: two `T`s from different declarations never match.
#[derive(Clone, Debug)]
pub struct TypeVar {
    id: u64,
    name: String,
    bound: Option<TypeRef>,
}

impl TypeVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            bound: None,
        }
    }

    pub fn with_bound(mut self, bound: TypeRef) -> Self {
        self.bound = Some(bound);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound(&self) -> Option<&TypeRef> {
        self.bound.as_ref()
    }

    pub fn same_declaration(&self, other: &TypeVar) -> bool {
        self.id == other.id
    }
}

/// A named class or interface as obtained from an external type registry.
/// The model only reads its shape; resolving names to declarations is the
/// registry's job.
#[derive(Clone, Debug)]
pub struct DeclaredType {
    package: String,
    name: String,
    type_params: Vec<TypeVar>,
    superclass: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    is_interface: bool,
    is_abstract: bool,
}

impl DeclaredType {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            is_interface: false,
            is_abstract: false,
        }
    }

    pub fn with_type_param(mut self, var: TypeVar) -> Self {
        self.type_params.push(var);
        self
    }

    pub fn with_superclass(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn type_params(&self) -> &[TypeVar] {
        &self.type_params
    }

    fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// A generic base applied to concrete type arguments, e.g. `List<String>`.
/// The base is never itself parameterized; appending arguments extends the
/// argument list instead of nesting.
#[derive(Clone, Debug)]
pub struct ParameterizedType {
    base: TypeRef,
    args: Vec<TypeRef>,
}

impl ParameterizedType {
    /// Callers must uphold the flat-base invariant; the public entry points
    /// are `TypeRef::parameterized` and `TypeRef::narrow`.
    pub(crate) fn from_parts(base: TypeRef, args: Vec<TypeRef>) -> Self {
        debug_assert!(!matches!(base.kind(), JavaType::Parameterized(_)));
        Self { base, args }
    }

    pub fn base(&self) -> &TypeRef {
        &self.base
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        &self.args
    }

    fn compose<F>(&self, part: F) -> String
    where
        F: Fn(&TypeRef) -> String,
    {
        let args: Vec<String> = self.args.iter().map(&part).collect();
        format!("{}<{}>", part(&self.base), args.join(","))
    }
}

#[derive(Clone, Debug)]
pub enum JavaType {
    Primitive(PrimitiveType),
    Declared(DeclaredType),
    Array(TypeRef),
    Variable(TypeVar),
    Parameterized(ParameterizedType),
}

/// Shared handle to an immutable type node. Clones are cheap and alias the
/// same node, which is what the substitution fast path observes.
#[derive(Clone, Debug)]
pub struct TypeRef(Arc<JavaType>);

impl TypeRef {
    pub fn primitive(ty: PrimitiveType) -> TypeRef {
        TypeRef::from_kind(JavaType::Primitive(ty))
    }

    pub fn declared(decl: DeclaredType) -> TypeRef {
        TypeRef::from_kind(JavaType::Declared(decl))
    }

    pub fn array(element: TypeRef) -> TypeRef {
        TypeRef::from_kind(JavaType::Array(element))
    }

    pub fn variable(var: TypeVar) -> TypeRef {
        TypeRef::from_kind(JavaType::Variable(var))
    }

    /// Checked factory for parameterized types. The base must be a plain
    /// declared type; anything else is a graph-assembly bug and is reported
    /// rather than coerced.
    pub fn parameterized(
        base: TypeRef,
        args: impl IntoIterator<Item = TypeRef>,
    ) -> ModelResult<TypeRef> {
        match base.kind() {
            JavaType::Declared(_) => Ok(TypeRef::from_kind(JavaType::Parameterized(
                ParameterizedType::from_parts(base.clone(), args.into_iter().collect()),
            ))),
            JavaType::Parameterized(_) => Err(ModelError::AlreadyNarrowed {
                name: base.full_name(),
            }),
            _ => Err(ModelError::NotGeneric {
                name: base.full_name(),
            }),
        }
    }

    pub(crate) fn from_kind(kind: JavaType) -> TypeRef {
        TypeRef(Arc::new(kind))
    }

    pub fn kind(&self) -> &JavaType {
        &self.0
    }

    /// True when both handles alias the same node allocation.
    pub fn ptr_eq(a: &TypeRef, b: &TypeRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Applies type arguments. On a declared type this produces a fresh
    /// parameterized type; on a parameterized type the arguments are
    /// appended to the existing list, in call order. The receiver is never
    /// mutated.
    pub fn narrow(&self, args: impl IntoIterator<Item = TypeRef>) -> ModelResult<TypeRef> {
        match self.kind() {
            JavaType::Parameterized(p) => {
                let mut extended = p.args.clone();
                extended.extend(args);
                Ok(TypeRef::from_kind(JavaType::Parameterized(
                    ParameterizedType::from_parts(p.base.clone(), extended),
                )))
            }
            _ => TypeRef::parameterized(self.clone(), args),
        }
    }

    pub fn name(&self) -> String {
        match self.kind() {
            JavaType::Primitive(p) => p.name().to_string(),
            JavaType::Declared(d) => d.name.clone(),
            JavaType::Array(element) => format!("{}[]", element.name()),
            JavaType::Variable(v) => v.name.clone(),
            JavaType::Parameterized(p) => p.compose(TypeRef::name),
        }
    }

    pub fn full_name(&self) -> String {
        match self.kind() {
            JavaType::Primitive(p) => p.name().to_string(),
            JavaType::Declared(d) => d.full_name(),
            JavaType::Array(element) => format!("{}[]", element.full_name()),
            JavaType::Variable(v) => v.name.clone(),
            JavaType::Parameterized(p) => p.compose(TypeRef::full_name),
        }
    }

    pub fn binary_name(&self) -> String {
        match self.kind() {
            JavaType::Primitive(p) => p.name().to_string(),
            JavaType::Declared(d) => d.full_name(),
            JavaType::Array(element) => format!("{}[]", element.binary_name()),
            JavaType::Variable(v) => v.name.clone(),
            JavaType::Parameterized(p) => p.compose(TypeRef::binary_name),
        }
    }

    /// The generics-free form: a parameterized type erases to its base,
    /// everything else to itself.
    pub fn erasure(&self) -> TypeRef {
        match self.kind() {
            JavaType::Parameterized(p) => p.base.clone(),
            _ => self.clone(),
        }
    }

    pub fn package(&self) -> Option<&str> {
        match self.kind() {
            JavaType::Declared(d) => Some(d.package()),
            JavaType::Parameterized(p) => p.base.package(),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind(), JavaType::Array(_))
    }

    pub fn is_interface(&self) -> bool {
        match self.kind() {
            JavaType::Declared(d) => d.is_interface,
            JavaType::Parameterized(p) => p.base.is_interface(),
            _ => false,
        }
    }

    pub fn is_abstract(&self) -> bool {
        match self.kind() {
            JavaType::Declared(d) => d.is_abstract,
            JavaType::Parameterized(p) => p.base.is_abstract(),
            _ => false,
        }
    }

    /// The superclass with the receiver's type arguments substituted into
    /// the base's generic superclass. Recomputed on every call. A
    /// parameterized type must be fully applied before hierarchy queries.
    pub fn superclass(&self) -> ModelResult<Option<TypeRef>> {
        match self.kind() {
            JavaType::Declared(d) => Ok(d.superclass.clone()),
            JavaType::Parameterized(p) => {
                let base = match p.base.kind() {
                    JavaType::Declared(d) => d,
                    _ => return Ok(None),
                };
                if base.type_params.len() != p.args.len() {
                    return Err(ModelError::BindingArity {
                        variables: base.type_params.len(),
                        bindings: p.args.len(),
                    });
                }
                Ok(base
                    .superclass
                    .as_ref()
                    .map(|s| apply(s, &base.type_params, &p.args)))
            }
            _ => Ok(None),
        }
    }

    /// Lazy walk over the implemented interfaces in declaration order. Each
    /// call produces a fresh traversal; substitution happens per element as
    /// the iterator advances.
    pub fn interfaces(&self) -> ModelResult<Interfaces<'_>> {
        match self.kind() {
            JavaType::Declared(d) => Ok(Interfaces {
                inner: d.interfaces.iter(),
                subst: None,
            }),
            JavaType::Parameterized(p) => {
                let base = match p.base.kind() {
                    JavaType::Declared(d) => d,
                    _ => return Ok(Interfaces::empty()),
                };
                if base.type_params.len() != p.args.len() {
                    return Err(ModelError::BindingArity {
                        variables: base.type_params.len(),
                        bindings: p.args.len(),
                    });
                }
                Ok(Interfaces {
                    inner: base.interfaces.iter(),
                    subst: Some((&base.type_params, &p.args)),
                })
            }
            _ => Ok(Interfaces::empty()),
        }
    }

    /// Javadoc-link rendering; parameterized types wrap the angle brackets
    /// in `{@code ...}` so they survive inside doc comments.
    pub fn print_link(&self, f: &mut Formatter) {
        match self.kind() {
            JavaType::Parameterized(p) => {
                p.base.print_link(f);
                f.print("{@code <}");
                for (idx, arg) in p.args.iter().enumerate() {
                    if idx > 0 {
                        f.print(",");
                    }
                    arg.print_link(f);
                }
                f.print("{@code >}");
            }
            _ => f.print(&self.full_name()),
        }
    }
}

pub struct Interfaces<'a> {
    inner: slice::Iter<'a, TypeRef>,
    subst: Option<(&'a [TypeVar], &'a [TypeRef])>,
}

impl Interfaces<'_> {
    fn empty() -> Self {
        Interfaces {
            inner: (&[] as &[TypeRef]).iter(),
            subst: None,
        }
    }
}

impl Iterator for Interfaces<'_> {
    type Item = TypeRef;

    fn next(&mut self) -> Option<TypeRef> {
        let interface = self.inner.next()?;
        Some(match self.subst {
            Some((vars, bindings)) => apply(interface, vars, bindings),
            None => interface.clone(),
        })
    }
}

// Equality is by fully qualified name, so independently built instances of
// the same instantiation collapse to one key in sets and maps.

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        TypeRef::ptr_eq(self, other) || self.full_name() == other.full_name()
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl Generate for TypeRef {
    fn generate(&self, f: &mut Formatter) {
        match self.kind() {
            JavaType::Parameterized(p) => {
                p.base.generate(f);
                f.print("<");
                for (idx, arg) in p.args.iter().enumerate() {
                    if idx > 0 {
                        f.print(",");
                    }
                    arg.generate(f);
                }
                f.print(">");
            }
            JavaType::Array(element) => {
                element.generate(f);
                f.print("[]");
            }
            _ => f.print(&self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn string() -> TypeRef {
        TypeRef::declared(DeclaredType::new("java.lang", "String"))
    }

    fn integer() -> TypeRef {
        TypeRef::declared(DeclaredType::new("java.lang", "Integer"))
    }

    fn list() -> TypeRef {
        TypeRef::declared(
            DeclaredType::new("java.util", "List")
                .with_type_param(TypeVar::new("E"))
                .as_interface(),
        )
    }

    fn map() -> TypeRef {
        TypeRef::declared(
            DeclaredType::new("java.util", "Map")
                .with_type_param(TypeVar::new("K"))
                .with_type_param(TypeVar::new("V")),
        )
    }

    #[test]
    fn narrowing_accumulates_arguments_in_call_order() {
        let list_of_string = list().narrow([string()]).unwrap();
        match list_of_string.kind() {
            JavaType::Parameterized(p) => {
                assert_eq!(p.type_arguments(), &[string()]);
            }
            other => panic!("expected parameterized type, got {:?}", other),
        }

        // Narrowing with nothing further keeps the argument list as-is.
        let unchanged = list_of_string.narrow([]).unwrap();
        match unchanged.kind() {
            JavaType::Parameterized(p) => assert_eq!(p.type_arguments(), &[string()]),
            other => panic!("expected parameterized type, got {:?}", other),
        }

        let map_inst = map().narrow([integer()]).unwrap().narrow([string()]).unwrap();
        match map_inst.kind() {
            JavaType::Parameterized(p) => {
                assert_eq!(p.type_arguments(), &[integer(), string()]);
                assert!(TypeRef::ptr_eq(p.base(), &p.base().erasure()));
            }
            other => panic!("expected parameterized type, got {:?}", other),
        }
    }

    #[test]
    fn names_compose_from_base_and_arguments() {
        let ty = list().narrow([string()]).unwrap();
        assert_eq!(ty.name(), "List<String>");
        assert_eq!(ty.full_name(), "java.util.List<java.lang.String>");
        assert_eq!(ty.binary_name(), "java.util.List<java.lang.String>");
        assert_eq!(ty.to_string(), "java.util.List<java.lang.String>");

        let arr = TypeRef::array(string());
        assert_eq!(arr.name(), "String[]");
        assert_eq!(arr.full_name(), "java.lang.String[]");
        assert!(arr.is_array());
    }

    #[test]
    fn value_equality_and_hash_follow_the_full_name() {
        let a = list().narrow([string()]).unwrap();
        let b = list().narrow([string()]).unwrap();
        assert!(!TypeRef::ptr_eq(&a, &b));
        assert_eq!(a, b);

        let hash = |ty: &TypeRef| {
            let mut hasher = DefaultHasher::new();
            ty.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&b));

        let c = list().narrow([integer()]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn erasure_returns_the_base_regardless_of_nesting() {
        let base = list();
        let inner = base.narrow([string()]).unwrap();
        let nested = list().narrow([inner]).unwrap();
        assert_eq!(nested.full_name(), "java.util.List<java.util.List<java.lang.String>>");
        assert_eq!(nested.erasure(), base);
        assert_eq!(nested.erasure().full_name(), "java.util.List");

        // Non-parameterized nodes erase to themselves.
        let s = string();
        assert!(TypeRef::ptr_eq(&s.erasure(), &s));
    }

    #[test]
    fn parameterized_types_are_never_arrays() {
        let ty = list().narrow([TypeRef::array(string())]).unwrap();
        assert!(!ty.is_array());
    }

    #[test]
    fn narrowing_a_primitive_is_rejected() {
        let err = TypeRef::primitive(PrimitiveType::Int)
            .narrow([string()])
            .unwrap_err();
        assert_eq!(err, ModelError::NotGeneric { name: "int".into() });
    }

    #[test]
    fn nesting_a_parameterized_base_is_rejected() {
        let inst = list().narrow([string()]).unwrap();
        let err = TypeRef::parameterized(inst, [integer()]).unwrap_err();
        assert_eq!(
            err,
            ModelError::AlreadyNarrowed {
                name: "java.util.List<java.lang.String>".into()
            }
        );
    }

    #[test]
    fn superclass_substitutes_the_type_arguments() {
        let e = TypeVar::new("E");
        let abstract_list = TypeRef::declared(
            DeclaredType::new("java.util", "AbstractList")
                .with_type_param(TypeVar::new("E"))
                .as_abstract(),
        );
        let generic_super = abstract_list
            .narrow([TypeRef::variable(e.clone())])
            .unwrap();
        let array_list = TypeRef::declared(
            DeclaredType::new("java.util", "ArrayList")
                .with_type_param(e)
                .with_superclass(generic_super),
        );

        let inst = array_list.narrow([string()]).unwrap();
        let superclass = inst.superclass().unwrap().expect("has a superclass");
        assert_eq!(
            superclass.full_name(),
            "java.util.AbstractList<java.lang.String>"
        );

        // A root type reports no superclass at all.
        assert_eq!(string().superclass().unwrap(), None);
    }

    #[test]
    fn interfaces_substitute_lazily_and_restart_fresh() {
        let e = TypeVar::new("E");
        let collection = TypeRef::declared(
            DeclaredType::new("java.util", "Collection")
                .with_type_param(TypeVar::new("E"))
                .as_interface(),
        );
        let iterable = TypeRef::declared(
            DeclaredType::new("java.lang", "Iterable")
                .with_type_param(TypeVar::new("T"))
                .as_interface(),
        );
        let e_ref = TypeRef::variable(e.clone());
        let list = TypeRef::declared(
            DeclaredType::new("java.util", "List")
                .with_type_param(e)
                .with_interface(collection.narrow([e_ref.clone()]).unwrap())
                .with_interface(iterable.narrow([e_ref]).unwrap())
                .as_interface(),
        );

        let inst = list.narrow([string()]).unwrap();
        let names: Vec<String> = inst
            .interfaces()
            .unwrap()
            .map(|i| i.full_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "java.util.Collection<java.lang.String>".to_string(),
                "java.lang.Iterable<java.lang.String>".to_string(),
            ]
        );

        // Re-invoking yields an independent traversal with the same order.
        let again: Vec<String> = inst
            .interfaces()
            .unwrap()
            .map(|i| i.full_name())
            .collect();
        assert_eq!(names, again);
    }

    #[test]
    fn hierarchy_queries_require_full_application() {
        let partial = map().narrow([integer()]).unwrap();
        assert_eq!(
            partial.superclass().unwrap_err(),
            ModelError::BindingArity {
                variables: 2,
                bindings: 1
            }
        );
        assert_eq!(
            partial.interfaces().err(),
            Some(ModelError::BindingArity {
                variables: 2,
                bindings: 1
            })
        );
    }

    #[test]
    fn flags_and_package_delegate_to_the_base() {
        let inst = list().narrow([string()]).unwrap();
        assert!(inst.is_interface());
        assert!(!inst.is_abstract());
        assert_eq!(inst.package(), Some("java.util"));
        assert_eq!(TypeRef::primitive(PrimitiveType::Int).package(), None);
    }

    #[test]
    fn type_variables_share_names_but_not_identity() {
        let a = TypeVar::new("T");
        let b = TypeVar::new("T");
        assert!(a.same_declaration(&a.clone()));
        assert!(!a.same_declaration(&b));
    }
}
