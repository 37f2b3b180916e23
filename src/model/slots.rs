use crate::model::errors::{ModelError, ModelResult};
use crate::model::expr::Expr;
use std::mem;

/// One rewritable sub-expression reference owned by a statement. The name
/// identifies the slot within its statement, so passes can report what they
/// touched.
pub trait ExprSlot {
    fn name(&self) -> &'static str;
    fn get(&self) -> &Expr;
    /// Installs a new expression and returns the previous one. Slots that
    /// do not support rewriting return `SlotReadOnly` instead of silently
    /// dropping the replacement.
    fn replace(&mut self, expr: Expr) -> ModelResult<Expr>;
}

/// Slot backed by a direct handle into the owning statement's storage.
pub struct MutSlot<'a> {
    name: &'static str,
    cell: &'a mut Expr,
}

impl<'a> MutSlot<'a> {
    pub fn new(name: &'static str, cell: &'a mut Expr) -> Self {
        Self { name, cell }
    }
}

impl ExprSlot for MutSlot<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get(&self) -> &Expr {
        self.cell
    }

    fn replace(&mut self, expr: Expr) -> ModelResult<Expr> {
        Ok(mem::replace(self.cell, expr))
    }
}

/// Slot whose expression can be observed but never rewritten, e.g. a loop
/// variable binding whose declared type and name are fixed at construction.
pub struct FixedSlot<'a> {
    name: &'static str,
    cell: &'a Expr,
}

impl<'a> FixedSlot<'a> {
    pub fn new(name: &'static str, cell: &'a Expr) -> Self {
        Self { name, cell }
    }
}

impl ExprSlot for FixedSlot<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get(&self) -> &Expr {
        self.cell
    }

    fn replace(&mut self, _expr: Expr) -> ModelResult<Expr> {
        Err(ModelError::SlotReadOnly { slot: self.name })
    }
}

pub trait SlotVisitor {
    /// Returning false stops the traversal; no further slot is offered.
    fn visit(&mut self, slot: &mut dyn ExprSlot) -> bool;
}

impl<F> SlotVisitor for F
where
    F: FnMut(&mut dyn ExprSlot) -> bool,
{
    fn visit(&mut self, slot: &mut dyn ExprSlot) -> bool {
        self(slot)
    }
}

/// Implemented by statements that expose their sub-expressions to
/// statement-agnostic rewriting passes. Slots are partitioned by how often
/// the owning statement evaluates them. The traversal result is true when
/// every slot was offered, false when the visitor stopped early; both
/// defaults are empty always-complete groups, so a statement without
/// sub-expressions in a category implements nothing.
pub trait ExprSlots {
    fn visit_slots_evaluated_once(&mut self, _visitor: &mut dyn SlotVisitor) -> bool {
        true
    }

    fn visit_slots_per_iteration(&mut self, _visitor: &mut dyn SlotVisitor) -> bool {
        true
    }
}

/// Chains a once-slot traversal across many statements, aborting the whole
/// sweep as soon as one visitor stops.
pub fn sweep_once_slots<'a, I>(statements: I, visitor: &mut dyn SlotVisitor) -> bool
where
    I: IntoIterator<Item = &'a mut dyn ExprSlots>,
{
    for statement in statements {
        if !statement.visit_slots_evaluated_once(visitor) {
            return false;
        }
    }
    true
}

pub fn sweep_per_iteration_slots<'a, I>(statements: I, visitor: &mut dyn SlotVisitor) -> bool
where
    I: IntoIterator<Item = &'a mut dyn ExprSlots>,
{
    for statement in statements {
        if !statement.visit_slots_per_iteration(visitor) {
            return false;
        }
    }
    true
}
