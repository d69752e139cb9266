use crate::error::TreeBuildError;
use crate::grammar::{Grammar, Rule, ZOM_PREFIX};
use crate::lexer::{Token, TokenKind};
use crate::syntax::decl::Modifier;
use crate::syntax::expr::Expression;
use crate::syntax::stmt::Block;
use crate::syntax::types::{Annotation, DottedName, Identifier, Type, TypeArgument, TypeParameter};
use crate::syntax::{GenericNode, TreeNode, ZomEntry, reduce};
use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Operand stack of one parser state, in production order
pub type OperandStack = SmallVec<[Arc<TreeNode>; 4]>;

/// Builds the node for one completed rule from its operands
pub type Reduce = fn(&mut Operands<'_>) -> Result<TreeNode, TreeBuildError>;

#[derive(Debug, Clone, Copy)]
enum Reduction {
    Construct(Reduce),
    /// `X -> Y`: the child is the result
    PassThrough,
    /// Generated repetition: seed or extend a [`ZomEntry`]
    Zom,
    Missing,
}

/// The reduction table: for every rule id, how a completed instance of the
/// rule becomes a [`TreeNode`].
///
/// Unit rules and generated repetitions are handled without registration.
/// Every other rule needs a constructor registered under its collection name;
/// reducing a rule without one is a [`TreeBuildError::NoReduction`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    reductions: Vec<Reduction>,
    names: Vec<CompactString>,
    keep_tokens: bool,
}

impl TreeBuilder {
    /// Build the table for `grammar` from `(collection name, constructor)` pairs
    pub fn new<'a>(grammar: &Grammar, constructors: impl IntoIterator<Item = (&'a str, Reduce)>) -> Self {
        let constructors: HashMap<&str, Reduce, ahash::RandomState> = constructors.into_iter().collect();
        let mut reductions = Vec::with_capacity(grammar.number_of_rules());
        let mut names = Vec::with_capacity(grammar.number_of_rules());
        for rule in grammar.rules() {
            let name = grammar.name(rule.name());
            let reduction = if name.starts_with(ZOM_PREFIX) {
                Reduction::Zom
            } else if rule.unit_target().is_some() {
                Reduction::PassThrough
            } else {
                constructors
                    .get(name)
                    .map_or(Reduction::Missing, |reduce| Reduction::Construct(*reduce))
            };
            reductions.push(reduction);
            names.push(CompactString::from(name));
        }
        Self {
            reductions,
            names,
            keep_tokens: false,
        }
    }

    /// The tree builder for the bundled Java grammar.
    ///
    /// `Goal` always yields a compilation unit when the grammar has one;
    /// grammars with another goal yield the goal's child.
    #[must_use]
    pub fn java(grammar: &Grammar) -> Self {
        let goal: Reduce = if grammar.get_rules("CompilationUnit").is_some() {
            reduce::compilation_unit_goal
        } else {
            reduce::goal
        };
        Self::new(
            grammar,
            reduce::JAVA_REDUCTIONS.iter().copied().chain([("Goal", goal)]),
        )
    }

    /// A builder that accepts any grammar: every rule that is neither a unit
    /// rule nor a repetition becomes a [`GenericNode`] holding its operands.
    ///
    /// Repetitions keep their separator tokens, so the leaves of the result are
    /// exactly the tokens that were parsed.
    #[must_use]
    pub fn generic(grammar: &Grammar) -> Self {
        let names: Vec<&str> = grammar.collections().map(|c| grammar.name(c.name())).collect();
        let mut builder = Self::new(grammar, names.into_iter().map(|name| (name, generic as Reduce)));
        builder.keep_tokens = true;
        builder
    }

    /// Names of rules that would fail with [`TreeBuildError::NoReduction`]
    #[must_use]
    pub fn missing_reductions(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .reductions
            .iter()
            .zip(&self.names)
            .filter(|(reduction, _)| matches!(reduction, Reduction::Missing))
            .map(|(_, name)| name.as_str())
            .collect();
        missing.dedup();
        missing
    }

    /// Reduce a completed rule.
    ///
    /// `operands` holds exactly one entry per part of `rule`.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeBuildError`] if the rule has no reduction or the
    /// operands do not have the shape the reduction expects.
    pub fn reduce(&self, rule: &Rule, operands: OperandStack) -> Result<Arc<TreeNode>, TreeBuildError> {
        let index = rule.id().index();
        let name = self.names.get(index).map_or("<unknown>", CompactString::as_str);
        match self.reductions.get(index).copied().unwrap_or(Reduction::Missing) {
            Reduction::PassThrough => operands
                .into_iter()
                .next()
                .ok_or_else(|| TreeBuildError::MissingOperand { rule: name.into() }),
            Reduction::Zom => reduce_zom(name, rule.is_left_recursive(), operands, self.keep_tokens),
            Reduction::Construct(reduce) => {
                let mut operands = Operands::new(name, operands);
                reduce(&mut operands).map(Arc::new)
            }
            Reduction::Missing => Err(TreeBuildError::NoReduction { rule: name.into() }),
        }
    }
}

/// `ZOM_n -> body` seeds a list, `ZOM_n -> ZOM_n body` appends to it.
///
/// The accumulator is only copied when another state still shares it.
fn reduce_zom(
    name: &str,
    left_recursive: bool,
    operands: OperandStack,
    keep_tokens: bool,
) -> Result<Arc<TreeNode>, TreeBuildError> {
    let mut operands = operands.into_iter();
    let accumulator = if left_recursive {
        Some(operands.next().ok_or_else(|| TreeBuildError::MissingOperand { rule: name.into() })?)
    } else {
        None
    };
    let body: SmallVec<[TreeNode; 2]> = operands.map(Arc::unwrap_or_clone).collect();
    let elements = if keep_tokens { body } else { zom_elements(body) };

    let Some(mut accumulator) = accumulator else {
        return Ok(Arc::new(TreeNode::Zom(ZomEntry {
            element: name.into(),
            items: elements.into_vec(),
        })));
    };
    match Arc::make_mut(&mut accumulator) {
        TreeNode::Zom(entry) => entry.items.extend(elements),
        other => {
            return Err(TreeBuildError::UnexpectedOperand {
                rule: name.into(),
                expected: "a repetition",
                found: other.kind_name(),
            });
        }
    }
    Ok(accumulator)
}

/// Separators are dropped from a repeated body; a body of only tokens keeps
/// its first token.
fn zom_elements(mut body: SmallVec<[TreeNode; 2]>) -> SmallVec<[TreeNode; 2]> {
    if body.iter().all(|node| matches!(node, TreeNode::Token(_))) {
        body.truncate(1);
    } else {
        body.retain(|node| !matches!(node, TreeNode::Token(_)));
    }
    body
}

fn generic(operands: &mut Operands<'_>) -> Result<TreeNode, TreeBuildError> {
    let rule = CompactString::from(operands.rule());
    Ok(TreeNode::Generic(GenericNode {
        rule,
        children: operands.rest(),
    }))
}

/// The operands of one completed rule, consumed front to back.
///
/// Optional parts may be absent, so most accessors come in a `take_*` form that
/// only consumes the next operand when it has the wanted shape.
pub struct Operands<'a> {
    rule: &'a str,
    items: smallvec::IntoIter<[Arc<TreeNode>; 4]>,
}

impl<'a> Operands<'a> {
    #[must_use]
    pub fn new(rule: &'a str, operands: OperandStack) -> Self {
        Self {
            rule,
            items: operands.into_iter(),
        }
    }

    /// Name of the rule being reduced
    #[must_use]
    pub const fn rule(&self) -> &'a str {
        self.rule
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.as_slice().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn peek(&self) -> Option<&TreeNode> {
        self.items.as_slice().first().map(|node| &**node)
    }

    /// Whether the next operand is the token `kind`
    #[must_use]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek().and_then(TreeNode::token_kind) == Some(kind)
    }

    /// Whether any remaining operand is the token `kind`
    #[must_use]
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.items.as_slice().iter().any(|node| node.token_kind() == Some(kind))
    }

    /// The next operand
    ///
    /// # Errors
    ///
    /// Fails with [`TreeBuildError::MissingOperand`] when none are left.
    pub fn next(&mut self) -> Result<TreeNode, TreeBuildError> {
        self.items
            .next()
            .map(Arc::unwrap_or_clone)
            .ok_or_else(|| TreeBuildError::MissingOperand { rule: self.rule.into() })
    }

    /// Consume the next operand if `wanted` accepts it
    pub fn take_if(&mut self, wanted: impl FnOnce(&TreeNode) -> bool) -> Option<TreeNode> {
        if self.peek().is_some_and(wanted) {
            self.items.next().map(Arc::unwrap_or_clone)
        } else {
            None
        }
    }

    /// All remaining operands
    pub fn rest(&mut self) -> Vec<TreeNode> {
        self.items.by_ref().map(Arc::unwrap_or_clone).collect()
    }

    /// The error for an operand of the wrong shape
    #[must_use]
    pub fn unexpected(&self, expected: &'static str, found: &TreeNode) -> TreeBuildError {
        self.mismatch(expected, found.kind_name())
    }

    fn mismatch(&self, expected: &'static str, found: &'static str) -> TreeBuildError {
        TreeBuildError::UnexpectedOperand {
            rule: self.rule.into(),
            expected,
            found,
        }
    }

    /// Consume the token `kind` if it is next
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        match self.take_if(|node| node.token_kind() == Some(kind)) {
            Some(TreeNode::Token(token)) => Some(token),
            _ => None,
        }
    }

    /// Any token
    ///
    /// # Errors
    ///
    /// Fails if the next operand is not a plain token.
    pub fn token(&mut self) -> Result<Token, TreeBuildError> {
        match self.next()? {
            TreeNode::Token(token) => Ok(token),
            other => Err(self.unexpected("token", &other)),
        }
    }

    /// The token `kind`
    ///
    /// # Errors
    ///
    /// Fails if the next operand is anything else.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, TreeBuildError> {
        match self.next()? {
            TreeNode::Token(token) if token.kind == kind => Ok(token),
            other => Err(self.unexpected(kind.text(), &other)),
        }
    }

    /// Skip tokens up to the first non-token operand
    pub fn skip_tokens(&mut self) {
        while self.take_if(|node| matches!(node, TreeNode::Token(_))).is_some() {}
    }

    /// # Errors
    ///
    /// Fails if the next operand is not an identifier.
    pub fn identifier(&mut self) -> Result<Identifier, TreeBuildError> {
        match self.next()? {
            TreeNode::Identifier(identifier) => Ok(identifier),
            other => Err(self.unexpected("identifier", &other)),
        }
    }

    pub fn take_identifier(&mut self) -> Option<Identifier> {
        match self.take_if(|node| matches!(node, TreeNode::Identifier(_))) {
            Some(TreeNode::Identifier(identifier)) => Some(identifier),
            _ => None,
        }
    }

    /// A dotted name; a single identifier is a name of one part
    ///
    /// # Errors
    ///
    /// Fails for anything else.
    pub fn name(&mut self) -> Result<DottedName, TreeBuildError> {
        match self.next()? {
            TreeNode::Name(name) => Ok(name),
            TreeNode::Identifier(identifier) => Ok(DottedName {
                parts: vec![identifier],
            }),
            other => Err(self.unexpected("name", &other)),
        }
    }

    /// # Errors
    ///
    /// Fails if the next operand is not an expression, a name or a literal.
    pub fn expression(&mut self) -> Result<Expression, TreeBuildError> {
        let node = self.next()?;
        let found = node.kind_name();
        node.into_expression().ok_or_else(|| self.mismatch("expression", found))
    }

    pub fn take_expression(&mut self) -> Option<Expression> {
        self.take_if(|node| matches!(node, TreeNode::Expression(_) | TreeNode::Name(_) | TreeNode::Literal(_)))
            .and_then(TreeNode::into_expression)
    }

    /// # Errors
    ///
    /// Fails if the next operand is not a type.
    pub fn ty(&mut self) -> Result<Type, TreeBuildError> {
        match self.next()? {
            TreeNode::Type(ty) => Ok(ty),
            other => Err(self.unexpected("type", &other)),
        }
    }

    pub fn take_type(&mut self) -> Option<Type> {
        match self.take_if(|node| matches!(node, TreeNode::Type(_))) {
            Some(TreeNode::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Fails if the next operand is not a block.
    pub fn block(&mut self) -> Result<Block, TreeBuildError> {
        match self.next()? {
            TreeNode::Block(block) => Ok(block),
            other => Err(self.unexpected("block", &other)),
        }
    }

    /// Optional `[Dims]`, zero when absent
    pub fn dims(&mut self) -> u32 {
        match self.take_if(|node| matches!(node, TreeNode::Dims(_))) {
            Some(TreeNode::Dims(dims)) => dims,
            _ => 0,
        }
    }

    /// Optional `{Modifier}` or `{VariableModifier}`
    ///
    /// # Errors
    ///
    /// Fails if the repetition holds something other than modifiers.
    pub fn modifiers(&mut self) -> Result<Vec<Modifier>, TreeBuildError> {
        let Some(node) = self.take_if(is_modifier_like) else {
            return Ok(Vec::new());
        };
        node.into_items()
            .into_iter()
            .map(|item| match item {
                TreeNode::Modifier(modifier) => Ok(modifier),
                TreeNode::Annotation(annotation) => Ok(Modifier::Annotation(annotation)),
                other => Err(self.unexpected("modifier", &other)),
            })
            .collect()
    }

    /// Optional `{Annotation}`
    ///
    /// # Errors
    ///
    /// Fails if the repetition holds something other than annotations.
    pub fn annotations(&mut self) -> Result<Vec<Annotation>, TreeBuildError> {
        let Some(node) = self.take_if(is_annotations) else {
            return Ok(Vec::new());
        };
        node.into_items()
            .into_iter()
            .map(|item| match item {
                TreeNode::Annotation(annotation) => Ok(annotation),
                other => Err(self.unexpected("annotation", &other)),
            })
            .collect()
    }

    /// Optional `[TypeArguments]`
    pub fn type_arguments(&mut self) -> Vec<TypeArgument> {
        match self.take_if(|node| matches!(node, TreeNode::TypeArguments(_))) {
            Some(TreeNode::TypeArguments(arguments)) => arguments,
            _ => Vec::new(),
        }
    }

    /// Optional `[TypeParameters]`
    pub fn type_parameters(&mut self) -> Vec<TypeParameter> {
        match self.take_if(|node| matches!(node, TreeNode::TypeParameters(_))) {
            Some(TreeNode::TypeParameters(parameters)) => parameters,
            _ => Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Fails if the next operand is not an argument list.
    pub fn arguments(&mut self) -> Result<Vec<Expression>, TreeBuildError> {
        match self.next()? {
            TreeNode::Arguments(arguments) => Ok(arguments),
            other => Err(self.unexpected("arguments", &other)),
        }
    }

    /// Every remaining operand that is not a token, with lists flattened
    pub fn items(&mut self) -> Vec<TreeNode> {
        self.rest()
            .into_iter()
            .filter(|node| !matches!(node, TreeNode::Token(_)))
            .flat_map(TreeNode::into_items)
            .collect()
    }

    /// Every remaining non-token operand as an expression
    ///
    /// # Errors
    ///
    /// Fails if one of them is not an expression.
    pub fn expressions(&mut self) -> Result<Vec<Expression>, TreeBuildError> {
        self.items()
            .into_iter()
            .map(|node| {
                let found = node.kind_name();
                node.into_expression().ok_or_else(|| self.mismatch("expression", found))
            })
            .collect()
    }

    /// Every remaining non-token operand as a type
    ///
    /// # Errors
    ///
    /// Fails if one of them is not a type.
    pub fn types(&mut self) -> Result<Vec<Type>, TreeBuildError> {
        self.items()
            .into_iter()
            .map(|node| match node {
                TreeNode::Type(ty) => Ok(ty),
                other => Err(self.unexpected("type", &other)),
            })
            .collect()
    }
}

fn is_modifier_like(node: &TreeNode) -> bool {
    match node {
        TreeNode::Modifier(_) | TreeNode::Annotation(_) => true,
        TreeNode::Zom(entry) => entry
            .items
            .first()
            .is_some_and(|item| matches!(item, TreeNode::Modifier(_) | TreeNode::Annotation(_))),
        _ => false,
    }
}

fn is_annotations(node: &TreeNode) -> bool {
    match node {
        TreeNode::Annotation(_) => true,
        TreeNode::Zom(entry) => entry.items.first().is_some_and(|item| matches!(item, TreeNode::Annotation(_))),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use crate::syntax::ParsePosition;

    fn token(kind: TokenKind) -> Arc<TreeNode> {
        Arc::new(TreeNode::Token(Token::new(kind, kind.text(), ParsePosition::start())))
    }

    fn grammar() -> Grammar {
        GrammarBuilder::new()
            .read("Goal ::= List END_OF_INPUT ; List ::= '(' {Item} ')' ; Item ::= IDENTIFIER | Wrapped ; Wrapped ::= '[' Item ']' ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build")
    }

    fn rule<'g>(grammar: &'g Grammar, description: &str) -> &'g Rule {
        grammar
            .rules()
            .iter()
            .find(|rule| grammar.describe(rule.id()) == description)
            .expect("rule exists")
    }

    #[test]
    fn zom_seeds_then_appends_in_order() {
        let grammar = grammar();
        let builder = TreeBuilder::generic(&grammar);
        let first = Arc::new(TreeNode::Identifier(Identifier::new("a", ParsePosition::start())));
        let second = Arc::new(TreeNode::Identifier(Identifier::new("b", ParsePosition::start())));

        let seeded = builder
            .reduce(rule(&grammar, "ZOM_1 -> Item"), SmallVec::from_vec(vec![first]))
            .expect("seed");
        let extended = builder
            .reduce(
                rule(&grammar, "ZOM_1 -> ZOM_1 Item"),
                SmallVec::from_vec(vec![seeded.clone(), second]),
            )
            .expect("append");

        let TreeNode::Zom(entry) = extended.as_ref() else {
            panic!("expected a list, got {extended:?}");
        };
        assert_eq!(entry.items.len(), 2);
        // the shared seed is left untouched
        let TreeNode::Zom(seed) = seeded.as_ref() else {
            panic!("expected a list");
        };
        assert_eq!(seed.items.len(), 1);
    }

    #[test]
    fn appending_to_anything_but_a_list_fails() {
        let grammar = grammar();
        let builder = TreeBuilder::generic(&grammar);
        let item = Arc::new(TreeNode::Identifier(Identifier::new("b", ParsePosition::start())));
        let error = builder
            .reduce(
                rule(&grammar, "ZOM_1 -> ZOM_1 Item"),
                SmallVec::from_vec(vec![token(TokenKind::Identifier), item]),
            )
            .expect_err("not a list");
        assert!(
            matches!(&error, TreeBuildError::UnexpectedOperand { rule, .. } if rule.as_str() == "ZOM_1"),
            "{error:?}"
        );
    }

    #[test]
    fn unit_rules_pass_the_child_through() {
        let grammar = grammar();
        let builder = TreeBuilder::generic(&grammar);
        let child = Arc::new(TreeNode::Dims(3));
        let result = builder
            .reduce(rule(&grammar, "Item -> Wrapped"), SmallVec::from_vec(vec![child.clone()]))
            .expect("pass through");
        assert!(Arc::ptr_eq(&result, &child));
    }

    #[test]
    fn unregistered_rules_are_internal_errors() {
        let grammar = grammar();
        let builder = TreeBuilder::new(&grammar, []);
        assert_eq!(builder.missing_reductions(), ["Goal", "List", "Item", "Wrapped"]);
        let error = builder
            .reduce(
                rule(&grammar, "Wrapped -> '[' Item ']'"),
                SmallVec::from_vec(vec![token(TokenKind::LeftBracket), token(TokenKind::Identifier), token(TokenKind::RightBracket)]),
            )
            .expect_err("no reduction");
        assert_eq!(error, TreeBuildError::NoReduction { rule: "Wrapped".into() });
    }

    #[test]
    fn generic_nodes_keep_their_operands() {
        let grammar = grammar();
        let builder = TreeBuilder::generic(&grammar);
        assert!(builder.missing_reductions().is_empty());
        let node = builder
            .reduce(
                rule(&grammar, "List -> '(' ')'"),
                SmallVec::from_vec(vec![token(TokenKind::LeftParenthesis), token(TokenKind::RightParenthesis)]),
            )
            .expect("generic");
        assert_eq!(
            node.leaf_kinds(),
            [TokenKind::LeftParenthesis, TokenKind::RightParenthesis]
        );
    }
}
