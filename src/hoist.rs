use crate::{error::ExpressionError, expression::Expression};
use std::collections::VecDeque;

/// Deepest tree the parser, the derivative and the code generator accept.
pub const MAX_DEPTH: usize = 256;

impl Expression {
    /// Number of levels in this tree; a leaf has depth 1.
    ///
    /// ```
    /// use deft_expression::Expression;
    /// let (a, b) = (Expression::variable("a"), Expression::variable("b"));
    /// assert_eq!((&a * &b).depth(), 2);
    /// assert_eq!((-(&a * &b) + 1.0).depth(), 4);
    /// ```
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut queue = VecDeque::from([(self, 1)]);
        while let Some((expr, level)) = queue.pop_front() {
            depth = depth.max(level);
            queue.extend(expr.children().map(|arg| (arg, level + 1)));
        }
        depth
    }

    /// Fails with [`ExpressionError::TooDeep`] when the tree has more than
    /// `limit` levels. Runs without recursion.
    pub fn check_depth(&self, limit: usize) -> Result<(), ExpressionError> {
        let mut queue = VecDeque::from([(self, 1)]);
        while let Some((expr, level)) = queue.pop_front() {
            if level > limit {
                return Err(ExpressionError::TooDeep {
                    depth: level,
                    limit,
                });
            }
            queue.extend(expr.children().map(|arg| (arg, level + 1)));
        }
        Ok(())
    }

    /// Whether this node or any descendant is flagged unlazy.
    pub fn is_unlazy(&self) -> bool {
        self.has_unlazy_flag() || self.children().any(Expression::is_unlazy)
    }

    /// Like [`Expression::is_unlazy`], but subtrees equal to `c` count as
    /// lazy.
    pub fn is_unlazy_apart_from(&self, c: &Expression) -> bool {
        if self == c {
            return false;
        }
        self.has_unlazy_flag() || self.children().any(|arg| arg.is_unlazy_apart_from(c))
    }

    /// Finds the shallowest node that contains every occurrence of `e` and
    /// can host a temporary computing `e`.
    ///
    /// A host is not itself unlazy, matches the type of `e` unless `e` is
    /// not a plain variable, and has no child that is unlazy apart from `e`.
    /// Returns `None` when `e` does not occur, when this tree is `e`
    /// itself, or when no host exists.
    pub fn easy_parent(&self, e: &Expression) -> Option<&Expression> {
        let count = self.count_subexpression(e);
        if count == 0 {
            return None;
        }
        self.easy_parent_holding(e, count)
    }

    fn easy_parent_holding(&self, e: &Expression, count: usize) -> Option<&Expression> {
        if self == e || self.count_subexpression(e) != count {
            return None;
        }
        if self.can_host(e) {
            return Some(self);
        }
        self.children()
            .find_map(|arg| arg.easy_parent_holding(e, count))
    }

    fn can_host(&self, e: &Expression) -> bool {
        !self.has_unlazy_flag()
            && (self.ty() == e.ty() || !e.is_variable())
            && !self.children().any(|arg| arg.is_unlazy_apart_from(e))
    }
}
