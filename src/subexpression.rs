use crate::expression::{Expression, Kind};
use std::collections::BTreeSet;

impl Expression {
    /// Counts the nodes of this tree that are structurally equal to `c`.
    ///
    /// Every child is visited whether or not the current node matched.
    pub fn count_subexpression(&self, c: &Expression) -> usize {
        let here = usize::from(self.ty() == c.ty() && self == c);
        here + self
            .children()
            .map(|arg| arg.count_subexpression(c))
            .sum::<usize>()
    }

    /// Replaces every occurrence of `c` with a variable called `name` that
    /// carries the type of `c`. Returns whether anything was replaced.
    ///
    /// ```
    /// use deft_expression::Expression;
    /// let (a, b, c) = (
    ///     Expression::variable("a"),
    ///     Expression::variable("b"),
    ///     Expression::variable("c"),
    /// );
    /// let ab = &a * &b;
    /// let mut expr = &ab + &ab + &c;
    /// assert_eq!(expr.count_subexpression(&ab), 2);
    /// assert!(expr.eliminate_subexpression(&ab, "ab"));
    /// assert_eq!(expr.to_string(), "ab + ab + c");
    /// assert_eq!(expr.count_subexpression(&ab), 0);
    /// ```
    pub fn eliminate_subexpression(&mut self, c: &Expression, name: &str) -> bool {
        if self.ty() == c.ty() && *self == *c {
            *self = Expression::variable(name).with_type(c.ty());
            return true;
        }
        let mut changed = false;
        for arg in self.children_mut() {
            changed |= arg.eliminate_subexpression(c, name);
        }
        changed
    }

    /// Whether a variable called `name` occurs anywhere in this tree.
    pub fn find_variable(&self, name: &str) -> bool {
        (self.is_variable() && self.name() == name)
            || self.children().any(|arg| arg.find_variable(name))
    }

    /// Names of all variables in this tree, sorted and without duplicates.
    pub fn variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&Expression::is_variable, &mut names);
        names.into_iter().collect()
    }

    /// Names of the variables, functions and methods used in this tree.
    pub(crate) fn identifiers(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_names(
            &|e: &Expression| matches!(e.kind(), Kind::Variable | Kind::Function | Kind::Method),
            &mut names,
        );
        names
    }

    fn collect_names<F>(&self, include: &F, names: &mut BTreeSet<String>)
    where
        F: Fn(&Expression) -> bool,
    {
        if include(self) {
            names.insert(self.name().to_string());
        }
        for arg in self.children() {
            arg.collect_names(include, names);
        }
    }

    /// Finds the first unlazy node, searching the deeper child first and
    /// `arg3` last. Children are searched before their parent.
    ///
    /// Returns `None` when no node of the tree is flagged unlazy.
    pub fn find_common_subexpression(&self) -> Option<&Expression> {
        self.search_deeper_first(&|e: &Expression| e.has_unlazy_flag(), false)
    }

    /// Finds a non-leaf subtree that occurs at least twice in this tree.
    ///
    /// Parents are tried before their children, so the largest repeated
    /// computation is reported first. Children are visited in the same
    /// order as [`Expression::find_common_subexpression`].
    pub fn find_repeated_subexpression(&self) -> Option<&Expression> {
        self.search_deeper_first(&|e: &Expression| self.is_repeated(e), true)
    }

    /// Like [`Expression::find_repeated_subexpression`], skipping repeats
    /// that have no [`Expression::easy_parent`] in this tree.
    pub fn find_hoistable_subexpression(&self) -> Option<&Expression> {
        self.search_deeper_first(
            &|e: &Expression| self.is_repeated(e) && self.easy_parent(e).is_some(),
            true,
        )
    }

    fn is_repeated(&self, e: &Expression) -> bool {
        !e.is_leaf() && self.count_subexpression(e) > 1
    }

    /// Visits `arg1` and `arg2` deeper-first (`arg2` first on equal depth),
    /// then `arg3`.
    fn search_deeper_first<'a, F>(&'a self, found: &F, parent_first: bool) -> Option<&'a Expression>
    where
        F: Fn(&Expression) -> bool,
    {
        if parent_first && found(self) {
            return Some(self);
        }
        let (first, second) = match (self.arg1(), self.arg2()) {
            (Some(arg1), Some(arg2)) if arg1.depth() > arg2.depth() => (Some(arg1), Some(arg2)),
            (Some(arg1), Some(arg2)) => (Some(arg2), Some(arg1)),
            (arg1, _) => (arg1, None),
        };
        for arg in [first, second, self.arg3()].into_iter().flatten() {
            if let Some(cs) = arg.search_deeper_first(found, parent_first) {
                return Some(cs);
            }
        }
        if !parent_first && found(self) {
            return Some(self);
        }
        None
    }
}
