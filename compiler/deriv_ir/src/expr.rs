//! Expression trees.
//!
//! Only the parts of the host syntax the engine looks at are modelled:
//! operands with a known rendering and function calls.

use std::fmt;

/// Expression id, unique within one source file.
///
/// Ids are assigned in pre-order, so an outer call has a smaller id than
/// the calls nested in its arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the front end resolved a call's callee identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CalleeKind {
    /// A predeclared function such as `len` or `append`.
    Builtin,
    /// Declared in hand-written source.
    Defined,
    /// Declared in the previously generated artifact.
    Generated,
    /// Not declared anywhere reachable.
    Undefined,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// An operand (identifier, selector, literal) rendered as `text`.
    Value { text: String },
    Call {
        func: String,
        callee: CalleeKind,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Render the expression as source text.
    pub fn render(&self) -> String {
        let mut buf = String::new();
        self.render_into(&mut buf);
        buf
    }

    fn render_into(&self, buf: &mut String) {
        match &self.kind {
            ExprKind::Value { text } => buf.push_str(text),
            ExprKind::Call { func, args, .. } => {
                buf.push_str(func);
                buf.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    arg.render_into(buf);
                }
                buf.push(')');
            }
        }
    }

    /// Visit this expression and every nested expression in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        if let ExprKind::Call { args, .. } = &self.kind {
            for arg in args {
                arg.walk(visit);
            }
        }
    }
}
