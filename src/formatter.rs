const INDENT: &str = "    ";

/// Plain text sink the model nodes write themselves into. Tracks the
/// current indent level and applies it at the start of each line; import
/// resolution and line wrapping belong to the embedding code generator.
#[derive(Debug)]
pub struct Formatter {
    out: String,
    depth: usize,
    at_line_start: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
            at_line_start: true,
        }
    }

    pub fn print(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    pub fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn outdent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Implemented by every node that knows how to append its own source text.
pub trait Generate {
    fn generate(&self, f: &mut Formatter);

    fn to_source(&self) -> String
    where
        Self: Sized,
    {
        let mut f = Formatter::new();
        self.generate(&mut f);
        f.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{DeclaredType, TypeRef, TypeVar};

    #[test]
    fn indentation_applies_at_line_starts_only() {
        let mut f = Formatter::new();
        f.print("a {");
        f.newline();
        f.indent();
        f.print("b;");
        f.print(" // same line");
        f.newline();
        f.outdent();
        f.print("}");
        assert_eq!(f.finish(), "a {\n    b; // same line\n}");
    }

    #[test]
    fn outdent_never_underflows() {
        let mut f = Formatter::new();
        f.outdent();
        f.print("x");
        assert_eq!(f.finish(), "x");
    }

    #[test]
    fn type_references_generate_their_simple_form() {
        let e = TypeVar::new("E");
        let list = TypeRef::declared(DeclaredType::new("java.util", "List").with_type_param(e));
        let string = TypeRef::declared(DeclaredType::new("java.lang", "String"));
        let inst = list.narrow([TypeRef::array(string)]).unwrap();
        assert_eq!(inst.to_source(), "List<String[]>");
    }

    #[test]
    fn print_link_wraps_angle_brackets_for_javadoc() {
        let e = TypeVar::new("E");
        let list = TypeRef::declared(DeclaredType::new("java.util", "List").with_type_param(e));
        let string = TypeRef::declared(DeclaredType::new("java.lang", "String"));
        let inst = list.narrow([string.clone()]).unwrap();

        let mut f = Formatter::new();
        inst.print_link(&mut f);
        assert_eq!(
            f.finish(),
            "java.util.List{@code <}java.lang.String{@code >}"
        );

        let mut f = Formatter::new();
        string.print_link(&mut f);
        assert_eq!(f.finish(), "java.lang.String");
    }
}
