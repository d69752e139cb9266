//! # Syntax Module
//!
//! The typed syntax tree and the machinery that builds it.
//!
//! ## Overview
//!
//! - [`types`], [`expr`], [`stmt`] and [`decl`]: the node types of the tree,
//!   from names and types up to whole compilation units
//! - [`TreeNode`]: the operand type of the tree builder; every value the
//!   parser pushes onto an operand stack is a `TreeNode`
//! - [`TreeBuilder`]: turns completed rules into nodes through a reduction
//!   table indexed by rule id
//! - [`SyntaxTree`]: the finished tree of one source file
//! - [`visitor`]: read-only traversal of finished trees
//! - [`anonymous`]: binary names for anonymous classes

pub mod anonymous;
mod builder;
pub mod decl;
pub mod expr;
mod line_col;
mod reduce;
pub mod stmt;
pub mod types;
pub mod visitor;

pub use builder::{OperandStack, Operands, Reduce, TreeBuilder};
pub use line_col::ParsePosition;

use crate::lexer::{Token, TokenKind, TokenValue};
use compact_str::CompactString;
use decl::{
    ClassBody, CompilationUnit, EnumConstant, FormalParameter, ImportDeclaration, Member, Modifier,
    PackageDeclaration, TypeDeclaration,
};
use expr::{Expression, LambdaParameters, Literal, LiteralValue};
use std::path::{Path, PathBuf};
use stmt::{
    Block, CatchClause, LocalVariableDeclaration, Resource, Statement, SwitchGroup, SwitchLabel,
    VariableDeclarator,
};
use types::{
    Annotation, DottedName, ElementValue, ElementValuePair, Identifier, Type, TypeArgument, TypeParameter,
};

/// The accumulator of a zero-or-more repetition, or the elements of a
/// separated list
#[derive(Debug, Clone, PartialEq)]
pub struct ZomEntry {
    /// Name of the rule that produced the list
    pub element: CompactString,
    pub items: Vec<TreeNode>,
}

/// A node for a rule without a dedicated constructor, see
/// [`TreeBuilder::generic`]
#[derive(Debug, Clone, PartialEq)]
pub struct GenericNode {
    pub rule: CompactString,
    pub children: Vec<TreeNode>,
}

/// Everything that can sit on an operand stack.
///
/// Leaves come straight from tokens; every other variant is built by a
/// reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Token(Token),
    Identifier(Identifier),
    Literal(Literal),
    Name(DottedName),
    Type(Type),
    Dims(u32),
    TypeArguments(Vec<TypeArgument>),
    TypeArgument(TypeArgument),
    Diamond,
    TypeParameters(Vec<TypeParameter>),
    TypeParameter(TypeParameter),
    Annotation(Annotation),
    ElementValue(ElementValue),
    ElementValuePair(ElementValuePair),
    Modifier(Modifier),
    Expression(Expression),
    Arguments(Vec<Expression>),
    LambdaParameters(LambdaParameters),
    Statement(Statement),
    Block(Block),
    LocalVariable(LocalVariableDeclaration),
    VariableDeclarator(VariableDeclarator),
    FormalParameter(FormalParameter),
    CatchClause(CatchClause),
    Finally(Block),
    Resources(Vec<Resource>),
    Resource(Resource),
    SwitchLabel(SwitchLabel),
    SwitchGroup(SwitchGroup),
    SwitchBlock(Vec<SwitchGroup>),
    Superclass(Type),
    Interfaces(Vec<Type>),
    Throws(Vec<Type>),
    ClassBody(ClassBody),
    Member(Member),
    EnumConstant(EnumConstant),
    EnumBody {
        constants: Vec<EnumConstant>,
        body: ClassBody,
    },
    TypeDeclaration(TypeDeclaration),
    Package(PackageDeclaration),
    Import(ImportDeclaration),
    CompilationUnit(CompilationUnit),
    Zom(ZomEntry),
    /// A lone `;` where a declaration or statement may appear
    Empty(ParsePosition),
    Generic(GenericNode),
}

impl TreeNode {
    /// The leaf for a scanned token
    #[must_use]
    pub fn from_token(token: Token) -> Self {
        let literal = match (&token.kind, &token.value) {
            (TokenKind::Identifier, _) => {
                return Self::Identifier(Identifier::new(token.text, token.position));
            }
            (_, TokenValue::Int(value)) => LiteralValue::Int(*value),
            (_, TokenValue::Long(value)) => LiteralValue::Long(*value),
            (_, TokenValue::Float(value)) => LiteralValue::Float(*value),
            (_, TokenValue::Double(value)) => LiteralValue::Double(*value),
            (_, TokenValue::Char(value)) => LiteralValue::Char(*value),
            (_, TokenValue::String(value)) => LiteralValue::String(value.clone()),
            (TokenKind::True, _) => LiteralValue::Boolean(true),
            (TokenKind::False, _) => LiteralValue::Boolean(false),
            (TokenKind::Null, _) => LiteralValue::Null,
            _ => return Self::Token(token),
        };
        Self::Literal(Literal {
            value: literal,
            position: token.position,
        })
    }

    /// Short name of the variant, used in error messages
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Token(_) => "token",
            Self::Identifier(_) => "identifier",
            Self::Literal(_) => "literal",
            Self::Name(_) => "name",
            Self::Type(_) => "type",
            Self::Dims(_) => "dims",
            Self::TypeArguments(_) => "type arguments",
            Self::TypeArgument(_) => "type argument",
            Self::Diamond => "diamond",
            Self::TypeParameters(_) => "type parameters",
            Self::TypeParameter(_) => "type parameter",
            Self::Annotation(_) => "annotation",
            Self::ElementValue(_) => "element value",
            Self::ElementValuePair(_) => "element value pair",
            Self::Modifier(_) => "modifier",
            Self::Expression(_) => "expression",
            Self::Arguments(_) => "arguments",
            Self::LambdaParameters(_) => "lambda parameters",
            Self::Statement(_) => "statement",
            Self::Block(_) => "block",
            Self::LocalVariable(_) => "local variable",
            Self::VariableDeclarator(_) => "variable declarator",
            Self::FormalParameter(_) => "formal parameter",
            Self::CatchClause(_) => "catch clause",
            Self::Finally(_) => "finally",
            Self::Resources(_) => "resources",
            Self::Resource(_) => "resource",
            Self::SwitchLabel(_) => "switch label",
            Self::SwitchGroup(_) => "switch group",
            Self::SwitchBlock(_) => "switch block",
            Self::Superclass(_) => "superclass",
            Self::Interfaces(_) => "interfaces",
            Self::Throws(_) => "throws",
            Self::ClassBody(_) => "class body",
            Self::Member(_) => "member",
            Self::EnumConstant(_) => "enum constant",
            Self::EnumBody { .. } => "enum body",
            Self::TypeDeclaration(_) => "type declaration",
            Self::Package(_) => "package",
            Self::Import(_) => "import",
            Self::CompilationUnit(_) => "compilation unit",
            Self::Zom(_) => "list",
            Self::Empty(_) => "empty",
            Self::Generic(_) => "generic node",
        }
    }

    /// The token kind if this is a plain token leaf
    #[must_use]
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Self::Token(token) => Some(token.kind),
            _ => None,
        }
    }

    /// The elements of a list; anything else is a list of one
    #[must_use]
    pub fn into_items(self) -> Vec<Self> {
        match self {
            Self::Zom(entry) => entry.items,
            other => vec![other],
        }
    }

    /// Names and literals are expressions too
    #[must_use]
    pub fn into_expression(self) -> Option<Expression> {
        match self {
            Self::Expression(expression) => Some(expression),
            Self::Name(name) => Some(Expression::Name(name)),
            Self::Literal(literal) => Some(Expression::Literal(literal)),
            Self::Identifier(identifier) => Some(Expression::Name(DottedName {
                parts: vec![identifier],
            })),
            _ => None,
        }
    }

    /// Blocks, local variables and local classes all stand where a statement may
    #[must_use]
    pub fn into_statement(self) -> Option<Statement> {
        match self {
            Self::Statement(statement) => Some(statement),
            Self::Block(block) => Some(Statement::Block(block)),
            Self::LocalVariable(declaration) => Some(Statement::LocalVariable(declaration)),
            Self::TypeDeclaration(declaration) => Some(Statement::LocalClass(Box::new(declaration))),
            Self::Empty(position) => Some(Statement::Empty(position)),
            _ => None,
        }
    }

    /// Every token leaf in order, including those inside lists and generic nodes
    #[must_use]
    pub fn leaf_kinds(&self) -> Vec<TokenKind> {
        let mut kinds = Vec::new();
        self.collect_leaves(&mut kinds);
        kinds
    }

    fn collect_leaves(&self, kinds: &mut Vec<TokenKind>) {
        match self {
            Self::Token(token) => kinds.push(token.kind),
            Self::Identifier(_) => kinds.push(TokenKind::Identifier),
            Self::Literal(literal) => kinds.push(match literal.value {
                LiteralValue::Int(_) => TokenKind::IntLiteral,
                LiteralValue::Long(_) => TokenKind::LongLiteral,
                LiteralValue::Float(_) => TokenKind::FloatLiteral,
                LiteralValue::Double(_) => TokenKind::DoubleLiteral,
                LiteralValue::Char(_) => TokenKind::CharacterLiteral,
                LiteralValue::String(_) => TokenKind::StringLiteral,
                LiteralValue::Boolean(true) => TokenKind::True,
                LiteralValue::Boolean(false) => TokenKind::False,
                LiteralValue::Null => TokenKind::Null,
            }),
            Self::Zom(entry) => entry.items.iter().for_each(|item| item.collect_leaves(kinds)),
            Self::Generic(node) => node.children.iter().for_each(|child| child.collect_leaves(kinds)),
            _ => {}
        }
    }
}

/// The result of parsing one file
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    origin: PathBuf,
    root: TreeNode,
}

impl SyntaxTree {
    #[must_use]
    pub fn new(origin: impl Into<PathBuf>, root: TreeNode) -> Self {
        Self {
            origin: origin.into(),
            root,
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    #[must_use]
    pub const fn root(&self) -> &TreeNode {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> TreeNode {
        self.root
    }

    /// The root as a compilation unit, when the tree was built for the
    /// compilation unit goal
    #[must_use]
    pub const fn compilation_unit(&self) -> Option<&CompilationUnit> {
        match &self.root {
            TreeNode::CompilationUnit(unit) => Some(unit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_become_typed_leaves() {
        let position = ParsePosition::new(2, 5);
        let identifier = TreeNode::from_token(Token::new(TokenKind::Identifier, "foo", position));
        assert_eq!(identifier, TreeNode::Identifier(Identifier::new("foo", position)));

        let int = Token::new(TokenKind::IntLiteral, "42", position).with_value(TokenValue::Int(42));
        assert!(matches!(
            TreeNode::from_token(int),
            TreeNode::Literal(Literal { value: LiteralValue::Int(42), .. })
        ));
        assert!(matches!(
            TreeNode::from_token(Token::new(TokenKind::Null, "null", position)),
            TreeNode::Literal(Literal { value: LiteralValue::Null, .. })
        ));
        assert_eq!(
            TreeNode::from_token(Token::new(TokenKind::Semicolon, ";", position)).token_kind(),
            Some(TokenKind::Semicolon)
        );
    }

    #[test]
    fn single_nodes_are_lists_of_one() {
        let node = TreeNode::Dims(2);
        assert_eq!(node.clone().into_items(), vec![node]);
        let list = TreeNode::Zom(ZomEntry {
            element: "ZOM_1".into(),
            items: vec![TreeNode::Dims(1), TreeNode::Dims(2)],
        });
        assert_eq!(list.into_items().len(), 2);
    }
}
