//! Terms and the term manager.
//!
//! Terms are hash-consed: the [`TermManager`] hands out exactly one
//! [`TermId`] per structurally distinct term, so comparing two ids is the
//! same as comparing the terms they denote. Duplicate detection in the
//! simplifier depends on this.
//!
//! Rule variables are [`TermKind::Var`] nodes carrying a small index local to
//! their rule. Inside a quantifier body the first `num_bound` indices refer
//! to the quantifier's own bound variables.

pub mod traversal;

use crate::sort::{SortId, SortManager};
use lasso::{Key, Rodeo, Spur};
use num_bigint::BigInt;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

/// Argument list of an n-ary term.
pub type TermArgs = SmallVec<[TermId; 4]>;

/// Number of operator codes reserved for built-in term kinds.
const BUILTIN_OPS: u32 = 32;

/// Unique identifier for a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub u32);

impl TermId {
    /// Create a term identifier from its raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index of this term.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The shape of a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Boolean true.
    True,
    /// Boolean false.
    False,
    /// Integer numeral.
    IntConst(BigInt),
    /// Rule-local variable.
    Var(u32),
    /// Negation.
    Not(TermId),
    /// N-ary conjunction.
    And(TermArgs),
    /// N-ary disjunction.
    Or(TermArgs),
    /// Implication.
    Implies(TermId, TermId),
    /// Biconditional.
    Iff(TermId, TermId),
    /// Equality.
    Eq(TermId, TermId),
    /// Less than or equal.
    Le(TermId, TermId),
    /// Strictly less than.
    Lt(TermId, TermId),
    /// Greater than or equal.
    Ge(TermId, TermId),
    /// Strictly greater than.
    Gt(TermId, TermId),
    /// N-ary addition.
    Add(TermArgs),
    /// Subtraction.
    Sub(TermId, TermId),
    /// N-ary multiplication.
    Mul(TermArgs),
    /// Unary minus.
    Neg(TermId),
    /// Application of an uninterpreted symbol (relations, 0-ary atoms).
    Apply {
        /// Interned symbol name.
        func: Spur,
        /// Arguments.
        args: TermArgs,
    },
    /// Existential quantifier over `num_bound` variables.
    Exists {
        /// Number of bound variables.
        num_bound: u32,
        /// Quantified body.
        body: TermId,
    },
    /// Universal quantifier over `num_bound` variables.
    Forall {
        /// Number of bound variables.
        num_bound: u32,
        /// Quantified body.
        body: TermId,
    },
}

impl TermKind {
    /// Stable identity number of the symbol heading this term.
    ///
    /// Built-in operators use fixed codes; uninterpreted symbols follow them
    /// in interner order.
    pub fn op_code(&self) -> u32 {
        match self {
            TermKind::True => 0,
            TermKind::False => 1,
            TermKind::IntConst(_) => 2,
            TermKind::Var(_) => 3,
            TermKind::Not(_) => 4,
            TermKind::And(_) => 5,
            TermKind::Or(_) => 6,
            TermKind::Implies(..) => 7,
            TermKind::Iff(..) => 8,
            TermKind::Eq(..) => 9,
            TermKind::Le(..) => 10,
            TermKind::Lt(..) => 11,
            TermKind::Ge(..) => 12,
            TermKind::Gt(..) => 13,
            TermKind::Add(_) => 14,
            TermKind::Sub(..) => 15,
            TermKind::Mul(_) => 16,
            TermKind::Neg(_) => 17,
            TermKind::Exists { .. } => 18,
            TermKind::Forall { .. } => 19,
            TermKind::Apply { func, .. } => BUILTIN_OPS + func.into_usize() as u32,
        }
    }
}

/// A hash-consed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Identifier of this term.
    pub id: TermId,
    /// Shape of this term.
    pub kind: TermKind,
    /// Sort of this term.
    pub sort: SortId,
}

/// Owner of all terms, symbols and sorts.
///
/// Every accessor taking a [`TermId`] expects an id created by this manager
/// and panics otherwise, like slice indexing.
#[derive(Debug)]
pub struct TermManager {
    terms: Vec<Term>,
    cache: FxHashMap<(TermKind, SortId), TermId>,
    names: Rodeo,
    /// Sorts known to this manager.
    pub sorts: SortManager,
    true_id: TermId,
    false_id: TermId,
}

impl TermManager {
    /// Create a term manager.
    pub fn new() -> Self {
        let sorts = SortManager::new();
        let bool_sort = sorts.bool_sort;
        let mut tm = Self {
            terms: Vec::new(),
            cache: FxHashMap::default(),
            names: Rodeo::default(),
            sorts,
            true_id: TermId(0),
            false_id: TermId(0),
        };
        tm.true_id = tm.intern(TermKind::True, bool_sort);
        tm.false_id = tm.intern(TermKind::False, bool_sort);
        tm
    }

    fn intern(&mut self, kind: TermKind, sort: SortId) -> TermId {
        let key = (kind, sort);
        if let Some(&id) = self.cache.get(&key) {
            return id;
        }
        let id = TermId(self.terms.len() as u32);
        self.terms.push(Term {
            id,
            kind: key.0.clone(),
            sort,
        });
        self.cache.insert(key, id);
        id
    }

    /// Look up a term.
    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.0 as usize)
    }

    /// Shape of a term.
    pub fn kind(&self, id: TermId) -> &TermKind {
        &self.terms[id.0 as usize].kind
    }

    /// Sort of a term.
    pub fn sort_of(&self, id: TermId) -> SortId {
        self.terms[id.0 as usize].sort
    }

    /// Number of distinct terms created so far.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Intern a symbol name.
    pub fn intern_name(&mut self, name: &str) -> Spur {
        self.names.get_or_intern(name)
    }

    /// Resolve an interned symbol name.
    pub fn resolve_str(&self, name: Spur) -> &str {
        self.names.resolve(&name)
    }

    // ----- builders -------------------------------------------------------

    /// The constant `true`.
    pub fn mk_true(&self) -> TermId {
        self.true_id
    }

    /// The constant `false`.
    pub fn mk_false(&self) -> TermId {
        self.false_id
    }

    /// A boolean constant.
    pub fn mk_bool(&self, value: bool) -> TermId {
        if value { self.true_id } else { self.false_id }
    }

    /// An integer numeral.
    pub fn mk_int(&mut self, value: impl Into<BigInt>) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::IntConst(value.into()), sort)
    }

    /// A rule variable with the given index and sort.
    pub fn mk_var(&mut self, index: u32, sort: SortId) -> TermId {
        self.intern(TermKind::Var(index), sort)
    }

    /// Negation, without simplification.
    pub fn mk_not(&mut self, arg: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Not(arg), sort)
    }

    /// Conjunction, without simplification.
    ///
    /// An empty conjunction is `true` and a singleton is its only argument.
    pub fn mk_and(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        match args.len() {
            0 => self.true_id,
            1 => args[0],
            _ => {
                let sort = self.sorts.bool_sort;
                self.intern(TermKind::And(args), sort)
            }
        }
    }

    /// Disjunction, without simplification.
    ///
    /// An empty disjunction is `false` and a singleton is its only argument.
    pub fn mk_or(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        match args.len() {
            0 => self.false_id,
            1 => args[0],
            _ => {
                let sort = self.sorts.bool_sort;
                self.intern(TermKind::Or(args), sort)
            }
        }
    }

    /// Implication.
    pub fn mk_implies(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Implies(lhs, rhs), sort)
    }

    /// Biconditional.
    pub fn mk_iff(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Iff(lhs, rhs), sort)
    }

    /// Equality.
    pub fn mk_eq(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Eq(lhs, rhs), sort)
    }

    /// `lhs <= rhs`.
    pub fn mk_le(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Le(lhs, rhs), sort)
    }

    /// `lhs < rhs`.
    pub fn mk_lt(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Lt(lhs, rhs), sort)
    }

    /// `lhs >= rhs`.
    pub fn mk_ge(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Ge(lhs, rhs), sort)
    }

    /// `lhs > rhs`.
    pub fn mk_gt(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Gt(lhs, rhs), sort)
    }

    /// Sum. A singleton sum is its only argument, an empty one is `0`.
    pub fn mk_add(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        match args.len() {
            0 => self.mk_int(0),
            1 => args[0],
            _ => {
                let sort = self.sorts.int_sort;
                self.intern(TermKind::Add(args), sort)
            }
        }
    }

    /// Difference.
    pub fn mk_sub(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::Sub(lhs, rhs), sort)
    }

    /// Product. A singleton product is its only argument, an empty one is `1`.
    pub fn mk_mul(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        match args.len() {
            0 => self.mk_int(1),
            1 => args[0],
            _ => {
                let sort = self.sorts.int_sort;
                self.intern(TermKind::Mul(args), sort)
            }
        }
    }

    /// Unary minus.
    pub fn mk_neg(&mut self, arg: TermId) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::Neg(arg), sort)
    }

    /// Application of the uninterpreted symbol `name`.
    pub fn mk_apply(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = TermId>,
        sort: SortId,
    ) -> TermId {
        let func = self.intern_name(name);
        self.mk_apply_sym(func, args, sort)
    }

    /// Application of an already interned symbol.
    pub fn mk_apply_sym(
        &mut self,
        func: Spur,
        args: impl IntoIterator<Item = TermId>,
        sort: SortId,
    ) -> TermId {
        let args = args.into_iter().collect();
        self.intern(TermKind::Apply { func, args }, sort)
    }

    /// Existential quantifier.
    pub fn mk_exists(&mut self, num_bound: u32, body: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Exists { num_bound, body }, sort)
    }

    /// Universal quantifier.
    pub fn mk_forall(&mut self, num_bound: u32, body: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Forall { num_bound, body }, sort)
    }

    // ----- predicates -----------------------------------------------------

    /// Is `t` the constant `true`?
    pub fn is_true(&self, t: TermId) -> bool {
        t == self.true_id
    }

    /// Is `t` the constant `false`?
    pub fn is_false(&self, t: TermId) -> bool {
        t == self.false_id
    }

    /// Is `t` a rule variable?
    pub fn is_var(&self, t: TermId) -> bool {
        matches!(self.kind(t), TermKind::Var(_))
    }

    /// Index of a rule variable.
    pub fn var_index(&self, t: TermId) -> Option<u32> {
        match self.kind(t) {
            TermKind::Var(idx) => Some(*idx),
            _ => None,
        }
    }

    /// Is `t` a value (boolean constant or numeral)?
    pub fn is_value(&self, t: TermId) -> bool {
        matches!(
            self.kind(t),
            TermKind::True | TermKind::False | TermKind::IntConst(_)
        )
    }

    /// Is `t` a variable or a value?
    pub fn is_flexible(&self, t: TermId) -> bool {
        self.is_var(t) || self.is_value(t)
    }

    /// Integer value of a numeral.
    pub fn int_value(&self, t: TermId) -> Option<&BigInt> {
        match self.kind(t) {
            TermKind::IntConst(n) => Some(n),
            _ => None,
        }
    }

    /// Is `t` boolean-sorted?
    pub fn is_bool(&self, t: TermId) -> bool {
        self.sorts.is_bool(self.sort_of(t))
    }

    /// Is `t` a quantifier?
    pub fn is_quantifier(&self, t: TermId) -> bool {
        matches!(
            self.kind(t),
            TermKind::Exists { .. } | TermKind::Forall { .. }
        )
    }

    /// Is `t` an application (anything but a variable or a quantifier)?
    ///
    /// Values count as nullary applications.
    pub fn is_app(&self, t: TermId) -> bool {
        !self.is_var(t) && !self.is_quantifier(t)
    }

    /// If `t` is `not(a)`, return `a`.
    pub fn is_not(&self, t: TermId) -> Option<TermId> {
        match self.kind(t) {
            TermKind::Not(a) => Some(*a),
            _ => None,
        }
    }

    /// Strip one negation layer, reporting whether one was present.
    pub fn strip_not(&self, t: TermId) -> (TermId, bool) {
        match self.is_not(t) {
            Some(inner) => (inner, true),
            None => (t, false),
        }
    }

    /// Arguments of a conjunction.
    pub fn is_and(&self, t: TermId) -> Option<&[TermId]> {
        match self.kind(t) {
            TermKind::And(args) => Some(args),
            _ => None,
        }
    }

    /// Arguments of a disjunction.
    pub fn is_or(&self, t: TermId) -> Option<&[TermId]> {
        match self.kind(t) {
            TermKind::Or(args) => Some(args),
            _ => None,
        }
    }

    /// Arguments of a conjunction with exactly two arguments.
    pub fn binary_and(&self, t: TermId) -> Option<(TermId, TermId)> {
        match self.is_and(t) {
            Some([a, b]) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Arguments of a disjunction with exactly two arguments.
    pub fn binary_or(&self, t: TermId) -> Option<(TermId, TermId)> {
        match self.is_or(t) {
            Some([a, b]) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Sides of an equality.
    pub fn is_eq(&self, t: TermId) -> Option<(TermId, TermId)> {
        match self.kind(t) {
            TermKind::Eq(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Sides of a biconditional.
    pub fn is_iff(&self, t: TermId) -> Option<(TermId, TermId)> {
        match self.kind(t) {
            TermKind::Iff(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Sides of `a <= b`.
    pub fn is_le(&self, t: TermId) -> Option<(TermId, TermId)> {
        match self.kind(t) {
            TermKind::Le(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Sides of `a >= b`.
    pub fn is_ge(&self, t: TermId) -> Option<(TermId, TermId)> {
        match self.kind(t) {
            TermKind::Ge(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Identity number of the symbol heading `t`.
    pub fn decl_id(&self, t: TermId) -> u32 {
        self.kind(t).op_code()
    }

    // ----- generic traversal ----------------------------------------------

    /// Immediate subterms of `t`, in argument order.
    pub fn children(&self, t: TermId) -> TermArgs {
        match self.kind(t) {
            TermKind::True | TermKind::False | TermKind::IntConst(_) | TermKind::Var(_) => {
                TermArgs::new()
            }
            TermKind::Not(a) | TermKind::Neg(a) => smallvec::smallvec![*a],
            TermKind::Exists { body, .. } | TermKind::Forall { body, .. } => {
                smallvec::smallvec![*body]
            }
            TermKind::Implies(a, b)
            | TermKind::Iff(a, b)
            | TermKind::Eq(a, b)
            | TermKind::Le(a, b)
            | TermKind::Lt(a, b)
            | TermKind::Ge(a, b)
            | TermKind::Gt(a, b)
            | TermKind::Sub(a, b) => smallvec::smallvec![*a, *b],
            TermKind::And(args)
            | TermKind::Or(args)
            | TermKind::Add(args)
            | TermKind::Mul(args)
            | TermKind::Apply { args, .. } => args.clone(),
        }
    }

    /// Number of immediate subterms of `t`.
    pub fn num_args(&self, t: TermId) -> usize {
        self.children(t).len()
    }

    /// Rebuild `t` with new immediate subterms.
    ///
    /// `children` must have the same length as [`children`](Self::children)
    /// returns for `t`. Returns `t` itself when nothing changed.
    pub fn rebuild(&mut self, t: TermId, children: &[TermId]) -> TermId {
        if self.children(t).as_slice() == children {
            return t;
        }
        debug_assert_eq!(self.num_args(t), children.len());
        let sort = self.sort_of(t);
        let kind = match self.kind(t) {
            TermKind::True | TermKind::False | TermKind::IntConst(_) | TermKind::Var(_) => {
                return t;
            }
            TermKind::Not(_) => TermKind::Not(children[0]),
            TermKind::Neg(_) => TermKind::Neg(children[0]),
            TermKind::Exists { num_bound, .. } => TermKind::Exists {
                num_bound: *num_bound,
                body: children[0],
            },
            TermKind::Forall { num_bound, .. } => TermKind::Forall {
                num_bound: *num_bound,
                body: children[0],
            },
            TermKind::Implies(..) => TermKind::Implies(children[0], children[1]),
            TermKind::Iff(..) => TermKind::Iff(children[0], children[1]),
            TermKind::Eq(..) => TermKind::Eq(children[0], children[1]),
            TermKind::Le(..) => TermKind::Le(children[0], children[1]),
            TermKind::Lt(..) => TermKind::Lt(children[0], children[1]),
            TermKind::Ge(..) => TermKind::Ge(children[0], children[1]),
            TermKind::Gt(..) => TermKind::Gt(children[0], children[1]),
            TermKind::Sub(..) => TermKind::Sub(children[0], children[1]),
            TermKind::And(_) => TermKind::And(children.into()),
            TermKind::Or(_) => TermKind::Or(children.into()),
            TermKind::Add(_) => TermKind::Add(children.into()),
            TermKind::Mul(_) => TermKind::Mul(children.into()),
            TermKind::Apply { func, .. } => TermKind::Apply {
                func: *func,
                args: children.into(),
            },
        };
        self.intern(kind, sort)
    }

    /// Simplify a term with the local simplifier.
    pub fn simplify(&mut self, t: TermId) -> TermId {
        crate::rewrite::simplifier::simplify(self, t)
    }

    /// Displayable rendering of a term.
    pub fn display(&self, t: TermId) -> TermDisplay<'_> {
        TermDisplay { tm: self, term: t }
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

/// SMT-LIB flavoured rendering of a term. Variables print as `#i`.
pub struct TermDisplay<'a> {
    tm: &'a TermManager,
    term: TermId,
}

impl TermDisplay<'_> {
    fn write_term(&self, f: &mut fmt::Formatter<'_>, t: TermId) -> fmt::Result {
        let tm = self.tm;
        let op = match tm.kind(t) {
            TermKind::True => return write!(f, "true"),
            TermKind::False => return write!(f, "false"),
            TermKind::IntConst(n) if n.sign() == num_bigint::Sign::Minus => {
                return write!(f, "(- {})", n.magnitude());
            }
            TermKind::IntConst(n) => return write!(f, "{n}"),
            TermKind::Var(idx) => return write!(f, "#{idx}"),
            TermKind::Apply { func, args } if args.is_empty() => {
                return write!(f, "{}", tm.resolve_str(*func));
            }
            TermKind::Exists { num_bound, body } | TermKind::Forall { num_bound, body } => {
                let q = if matches!(tm.kind(t), TermKind::Exists { .. }) {
                    "exists"
                } else {
                    "forall"
                };
                write!(f, "({q} ({num_bound}) ")?;
                self.write_term(f, *body)?;
                return write!(f, ")");
            }
            TermKind::Apply { func, .. } => tm.resolve_str(*func),
            TermKind::Not(_) => "not",
            TermKind::And(_) => "and",
            TermKind::Or(_) => "or",
            TermKind::Implies(..) => "=>",
            TermKind::Iff(..) => "iff",
            TermKind::Eq(..) => "=",
            TermKind::Le(..) => "<=",
            TermKind::Lt(..) => "<",
            TermKind::Ge(..) => ">=",
            TermKind::Gt(..) => ">",
            TermKind::Add(_) => "+",
            TermKind::Sub(..) | TermKind::Neg(_) => "-",
            TermKind::Mul(_) => "*",
        };
        write!(f, "({op}")?;
        for child in tm.children(t) {
            write!(f, " ")?;
            self.write_term(f, child)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_term(f, self.term)
    }
}
