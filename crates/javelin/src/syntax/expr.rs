//! Expressions.

use crate::lexer::TokenKind;
use crate::syntax::ParsePosition;
use crate::syntax::decl::{ClassBody, FormalParameter};
use crate::syntax::stmt::Block;
use crate::syntax::types::{DottedName, Identifier, Type, TypeArgument};
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub position: ParsePosition,
}

/// Decoded literal values; integer literals are already range checked
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(CompactString),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    /// A simple or qualified name: a local, a field or a class, decided later
    Name(DottedName),
    This(ParsePosition),
    /// `Outer.this`
    QualifiedThis(DottedName),
    Binary {
        left: Box<Expression>,
        operator: TokenKind,
        right: Box<Expression>,
    },
    /// Prefix `+ - ~ ! ++ --` and postfix `++ --`
    Unary {
        operator: TokenKind,
        operand: Box<Expression>,
        postfix: bool,
    },
    Ternary {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    Assignment {
        target: Box<Expression>,
        operator: TokenKind,
        value: Box<Expression>,
    },
    InstanceOf {
        expression: Box<Expression>,
        ty: Type,
    },
    /// `(A & B) expression`; `types` is never empty
    Cast {
        types: Vec<Type>,
        expression: Box<Expression>,
    },
    MethodInvocation(MethodInvocation),
    FieldAccess {
        receiver: Receiver,
        name: Identifier,
    },
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    New(ClassInstanceCreation),
    NewArray {
        element: Type,
        dimensions: Vec<Expression>,
        extra_dims: u32,
        initializer: Option<Vec<Expression>>,
    },
    /// `{ 1, 2, 3 }` in a variable initializer
    ArrayInitializer(Vec<Expression>),
    Lambda(Lambda),
    /// `name` is `None` for `Type::new`
    MethodReference {
        receiver: Receiver,
        type_arguments: Vec<TypeArgument>,
        name: Option<Identifier>,
    },
    /// `ty` is `None` for `void.class`
    ClassLiteral {
        ty: Option<Type>,
        position: ParsePosition,
    },
}

impl Expression {
    /// Where the expression starts
    #[must_use]
    pub fn position(&self) -> ParsePosition {
        match self {
            Self::Literal(literal) => literal.position,
            Self::Name(name) | Self::QualifiedThis(name) => name.position(),
            Self::This(position) | Self::ClassLiteral { position, .. } => *position,
            Self::Binary { left, .. } | Self::Assignment { target: left, .. } => left.position(),
            Self::Unary { operand, .. } => operand.position(),
            Self::Ternary { condition, .. } => condition.position(),
            Self::InstanceOf { expression, .. } => expression.position(),
            Self::Cast { types, expression } => types.first().map_or_else(|| expression.position(), Type::position),
            Self::MethodInvocation(invocation) => invocation
                .receiver
                .as_ref()
                .map_or(invocation.name.position, Receiver::position),
            Self::FieldAccess { receiver, .. } | Self::MethodReference { receiver, .. } => receiver.position(),
            Self::ArrayAccess { array, .. } => array.position(),
            Self::New(creation) => creation.position,
            Self::NewArray { element, .. } => element.position(),
            Self::ArrayInitializer(values) => values.first().map(Self::position).unwrap_or_default(),
            Self::Lambda(lambda) => lambda.position,
        }
    }
}

/// What a method, field or method reference is selected from
#[derive(Debug, Clone, PartialEq)]
pub enum Receiver {
    Name(DottedName),
    Expression(Box<Expression>),
    Super(ParsePosition),
    /// `Outer.super`
    QualifiedSuper(DottedName),
    Type(Type),
}

impl Receiver {
    #[must_use]
    pub fn position(&self) -> ParsePosition {
        match self {
            Self::Name(name) | Self::QualifiedSuper(name) => name.position(),
            Self::Expression(expression) => expression.position(),
            Self::Super(position) => *position,
            Self::Type(ty) => ty.position(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInvocation {
    pub receiver: Option<Receiver>,
    pub type_arguments: Vec<TypeArgument>,
    pub name: Identifier,
    pub arguments: Vec<Expression>,
}

/// `outer.new <T> Foo<>(args) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInstanceCreation {
    pub outer: Option<Box<Expression>>,
    pub type_arguments: Vec<TypeArgument>,
    pub ty: Type,
    pub diamond: bool,
    pub arguments: Vec<Expression>,
    /// The body of an anonymous class
    pub body: Option<ClassBody>,
    pub position: ParsePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameters: LambdaParameters,
    pub body: LambdaBody,
    pub position: ParsePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaParameters {
    /// `x -> ...` and `(x, y) -> ...`
    Inferred(Vec<Identifier>),
    /// `(int x, int y) -> ...`
    Formal(Vec<FormalParameter>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expression(Box<Expression>),
    Block(Block),
}
