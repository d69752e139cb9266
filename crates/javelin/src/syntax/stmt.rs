//! Blocks and statements.

use crate::syntax::ParsePosition;
use crate::syntax::decl::{Modifier, TypeDeclaration};
use crate::syntax::expr::Expression;
use crate::syntax::types::{Identifier, Type, TypeArgument};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub position: ParsePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    Empty(ParsePosition),
    LocalVariable(LocalVariableDeclaration),
    LocalClass(Box<TypeDeclaration>),
    /// An expression evaluated for its side effects
    Expression(Expression),
    If {
        condition: Expression,
        then: Box<Statement>,
        otherwise: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    Do {
        body: Box<Statement>,
        condition: Expression,
    },
    For {
        init: Option<ForInit>,
        condition: Option<Expression>,
        update: Vec<Expression>,
        body: Box<Statement>,
    },
    EnhancedFor {
        variable: LocalVariableDeclaration,
        iterable: Expression,
        body: Box<Statement>,
    },
    Labeled {
        label: Identifier,
        statement: Box<Statement>,
    },
    Break(Option<Identifier>, ParsePosition),
    Continue(Option<Identifier>, ParsePosition),
    Return(Option<Expression>, ParsePosition),
    Throw(Expression),
    Synchronized {
        lock: Expression,
        body: Block,
    },
    Try(TryStatement),
    Switch {
        selector: Expression,
        groups: Vec<SwitchGroup>,
    },
    Assert {
        condition: Expression,
        message: Option<Expression>,
    },
    /// `this(...)` or `super(...)` as the first statement of a constructor
    ConstructorCall(ConstructorCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableDeclaration {
    pub modifiers: Vec<Modifier>,
    pub ty: Type,
    pub declarators: Vec<VariableDeclarator>,
}

/// `name[] = initializer`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: Identifier,
    pub dims: u32,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Expressions(Vec<Expression>),
    Declaration(LocalVariableDeclaration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub resources: Vec<Resource>,
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Block>,
}

/// `Type name = initializer` in a try-with-resources header
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub modifiers: Vec<Modifier>,
    pub ty: Type,
    pub name: Identifier,
    pub initializer: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub modifiers: Vec<Modifier>,
    /// More than one for multi-catch
    pub types: Vec<Type>,
    pub name: Identifier,
    pub body: Block,
}

/// Labels followed by the statements they select; the last group may have no
/// statements
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchGroup {
    pub labels: Vec<SwitchLabel>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwitchLabel {
    Case(Expression),
    Default(ParsePosition),
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum ConstructorCallKind {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorCall {
    pub kind: ConstructorCallKind,
    /// `outer.super(...)`
    pub qualifier: Option<Expression>,
    pub type_arguments: Vec<TypeArgument>,
    pub arguments: Vec<Expression>,
    pub position: ParsePosition,
}
