use crate::formatter::{Formatter, Generate};
use crate::model::expr::Expr;
use crate::model::slots::{ExprSlots, FixedSlot, MutSlot, SlotVisitor};
use crate::model::types::TypeRef;

/// The enhanced for statement, `for (T v: collection) ...`. Models the
/// collection-iteration form only; the classic three-clause loop is a
/// separate statement type.
#[derive(Clone, Debug)]
pub struct ForEach {
    var_type: TypeRef,
    var_name: String,
    collection: Expr,
    loop_var: Expr,
    body: Option<Block>,
}

impl ForEach {
    pub fn new(var_type: TypeRef, var_name: impl Into<String>, collection: Expr) -> Self {
        let var_name = var_name.into();
        let loop_var = Expr::var(var_name.clone());
        Self {
            var_type,
            var_name,
            collection,
            loop_var,
            body: None,
        }
    }

    pub fn var_type(&self) -> &TypeRef {
        &self.var_type
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    /// The loop variable as an expression, for use inside the body.
    pub fn var(&self) -> &Expr {
        &self.loop_var
    }

    pub fn collection(&self) -> &Expr {
        &self.collection
    }

    /// Created on first access. Until then the statement prints as a bare
    /// `for (...);`, afterwards as `for (...) { ... }` even while empty.
    pub fn body(&mut self) -> &mut Block {
        self.body.get_or_insert_with(Block::new)
    }
}

/// The collection expression is evaluated once at loop entry; the loop
/// variable is rebound on every pass. The loop-variable slot is observable
/// but fixed, since the variable's type and name are set at construction.
impl ExprSlots for ForEach {
    fn visit_slots_evaluated_once(&mut self, visitor: &mut dyn SlotVisitor) -> bool {
        visitor.visit(&mut MutSlot::new("collection", &mut self.collection))
    }

    fn visit_slots_per_iteration(&mut self, visitor: &mut dyn SlotVisitor) -> bool {
        visitor.visit(&mut FixedSlot::new("loop-var", &self.loop_var))
    }
}

impl Generate for ForEach {
    fn generate(&self, f: &mut Formatter) {
        f.print("for (");
        self.var_type.generate(f);
        f.print(" ");
        f.print(&self.var_name);
        f.print(": ");
        self.collection.generate(f);
        f.print(")");
        match &self.body {
            Some(body) => {
                f.print(" ");
                body.generate(f);
            }
            None => f.print(";"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Block {
    statements: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, statement: Stmt) -> &mut Self {
        self.statements.push(statement);
        self
    }

    pub fn add_expr(&mut self, expr: Expr) -> &mut Self {
        self.add(Stmt::Expr(expr))
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Generate for Block {
    fn generate(&self, f: &mut Formatter) {
        if self.statements.is_empty() {
            f.print("{ }");
            return;
        }
        f.print("{");
        f.newline();
        f.indent();
        for statement in &self.statements {
            statement.generate(f);
            f.newline();
        }
        f.outdent();
        f.print("}");
    }
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Expr(Expr),
    ForEach(ForEach),
}

impl Generate for Stmt {
    fn generate(&self, f: &mut Formatter) {
        match self {
            Stmt::Expr(expr) => {
                expr.generate(f);
                f.print(";");
            }
            Stmt::ForEach(loop_stmt) => loop_stmt.generate(f),
        }
    }
}
