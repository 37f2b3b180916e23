use crate::formatter::{Formatter, Generate};

/// The slice of the expression grammar the model needs for statement
/// assembly and slot rewriting. The full grammar lives with the embedding
/// code generator.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Var(String),
    Int(i64),
    Str(String),
    Bool(bool),
    Field {
        target: Box<Expr>,
        name: String,
    },
    Invoke {
        target: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn str_lit(value: impl Into<String>) -> Expr {
        Expr::Str(value.into())
    }

    pub fn field(self, name: impl Into<String>) -> Expr {
        Expr::Field {
            target: Box::new(self),
            name: name.into(),
        }
    }

    pub fn invoke(self, name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Invoke {
            target: Box::new(self),
            name: name.into(),
            args,
        }
    }
}

impl Generate for Expr {
    fn generate(&self, f: &mut Formatter) {
        match self {
            Expr::Var(name) => f.print(name),
            Expr::Int(value) => f.print(&value.to_string()),
            Expr::Str(value) => {
                f.print("\"");
                f.print(&escape_string(value));
                f.print("\"");
            }
            Expr::Bool(value) => f.print(if *value { "true" } else { "false" }),
            Expr::Field { target, name } => {
                target.generate(f);
                f.print(".");
                f.print(name);
            }
            Expr::Invoke { target, name, args } => {
                target.generate(f);
                f.print(".");
                f.print(name);
                f.print("(");
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.print(", ");
                    }
                    arg.generate(f);
                }
                f.print(")");
            }
        }
    }
}

fn escape_string(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\\' => "\\\\".into(),
            '"' => "\\\"".into(),
            '\n' => "\\n".into(),
            '\r' => "\\r".into(),
            '\t' => "\\t".into(),
            other => other.to_string(),
        })
        .collect::<String>()
}
