//! Compilation units and declarations.

use crate::lexer::TokenKind;
use crate::syntax::ParsePosition;
use crate::syntax::stmt::{Block, VariableDeclarator};
use crate::syntax::types::{Annotation, DottedName, Identifier, Type, TypeParameter};
use crate::syntax::expr::Expression;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub package: Option<PackageDeclaration>,
    pub imports: Vec<ImportDeclaration>,
    pub types: Vec<TypeDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDeclaration {
    pub annotations: Vec<Annotation>,
    pub name: DottedName,
}

/// `import static a.b.*;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub name: DottedName,
    pub is_static: bool,
    pub on_demand: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    /// `public`, `static`, `final`, ...
    Keyword { kind: TokenKind, position: ParsePosition },
    Annotation(Annotation),
}

impl Modifier {
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        matches!(self, Self::Keyword { kind: k, .. } if *k == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDeclaration {
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    Enum(EnumDeclaration),
}

impl TypeDeclaration {
    #[must_use]
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Class(class) => &class.name,
            Self::Interface(interface) => &interface.name,
            Self::Enum(enumeration) => &enumeration.name,
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Self::Class(class) => &class.modifiers,
            Self::Interface(interface) => &interface.modifiers,
            Self::Enum(enumeration) => &enumeration.modifiers,
        }
    }

    /// The body; for enums this holds the members after the constants
    #[must_use]
    pub fn body(&self) -> &ClassBody {
        match self {
            Self::Class(class) => &class.body,
            Self::Interface(interface) => &interface.body,
            Self::Enum(enumeration) => &enumeration.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub modifiers: Vec<Modifier>,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: Option<Type>,
    pub interfaces: Vec<Type>,
    pub body: ClassBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub modifiers: Vec<Modifier>,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Vec<Type>,
    pub body: ClassBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    pub modifiers: Vec<Modifier>,
    pub name: Identifier,
    pub interfaces: Vec<Type>,
    pub constants: Vec<EnumConstant>,
    pub body: ClassBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub annotations: Vec<Annotation>,
    pub name: Identifier,
    pub arguments: Option<Vec<Expression>>,
    pub body: Option<ClassBody>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassBody {
    pub members: Vec<Member>,
    /// Position of the opening brace
    pub position: ParsePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDeclaration),
    Method(MethodDeclaration),
    Constructor(ConstructorDeclaration),
    Type(TypeDeclaration),
    Initializer { is_static: bool, block: Block },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub modifiers: Vec<Modifier>,
    pub ty: Type,
    pub declarators: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub modifiers: Vec<Modifier>,
    pub type_parameters: Vec<TypeParameter>,
    /// `None` for `void`
    pub result: Option<Type>,
    pub name: Identifier,
    pub parameters: Vec<FormalParameter>,
    pub throws: Vec<Type>,
    /// `None` for abstract and interface methods
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDeclaration {
    pub modifiers: Vec<Modifier>,
    pub type_parameters: Vec<TypeParameter>,
    pub name: Identifier,
    pub parameters: Vec<FormalParameter>,
    pub throws: Vec<Type>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub modifiers: Vec<Modifier>,
    pub ty: Type,
    pub name: Identifier,
    pub varargs: bool,
}
