//! Names, types and annotations.

use crate::lexer::TokenKind;
use crate::syntax::ParsePosition;
use crate::syntax::expr::Expression;
use compact_str::CompactString;
use std::fmt;

/// A single identifier with the position it was written at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: CompactString,
    pub position: ParsePosition,
}

impl Identifier {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, position: ParsePosition) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// `a.b.c`; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedName {
    pub parts: Vec<Identifier>,
}

impl DottedName {
    #[must_use]
    pub fn position(&self) -> ParsePosition {
        self.parts.first().map(|part| part.position).unwrap_or_default()
    }

    /// Split `a.b.c` into `a.b` and `c`
    #[must_use]
    pub fn split_last(mut self) -> (Option<Self>, Option<Identifier>) {
        let last = self.parts.pop();
        let rest = (!self.parts.is_empty()).then_some(self);
        (rest, last)
    }
}

impl fmt::Display for DottedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, part) in self.parts.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(&part.name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveType {
    /// One of the primitive type keywords, such as [`TokenKind::Int`]
    pub kind: TokenKind,
    pub annotations: Vec<Annotation>,
    pub position: ParsePosition,
}

/// One `.`-separated segment of a class type: `@A Map<K, V>`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleClassType {
    pub annotations: Vec<Annotation>,
    pub name: Identifier,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassType {
    pub segments: Vec<SimpleClassType>,
}

impl ClassType {
    #[must_use]
    pub fn position(&self) -> ParsePosition {
        self.segments.first().map(|segment| segment.name.position).unwrap_or_default()
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name.name)?;
            if !segment.type_arguments.is_empty() {
                f.write_str("<")?;
                for (index, argument) in segment.type_arguments.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(">")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Array { element: Box<Type>, dims: u32 },
}

impl Type {
    #[must_use]
    pub fn position(&self) -> ParsePosition {
        match self {
            Self::Primitive(primitive) => primitive.position,
            Self::Class(class) => class.position(),
            Self::Array { element, .. } => element.position(),
        }
    }

    /// Wrap in `dims` more array dimensions
    #[must_use]
    pub fn with_dims(self, dims: u32) -> Self {
        match (self, dims) {
            (ty, 0) => ty,
            (Self::Array { element, dims: inner }, _) => Self::Array {
                element,
                dims: inner + dims,
            },
            (ty, _) => Self::Array {
                element: Box::new(ty),
                dims,
            },
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.write_str(primitive.kind.text()),
            Self::Class(class) => write!(f, "{class}"),
            Self::Array { element, dims } => {
                write!(f, "{element}")?;
                for _ in 0..*dims {
                    f.write_str("[]")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArgument {
    Type(Type),
    Wildcard(Option<WildcardBound>),
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => write!(f, "{ty}"),
            Self::Wildcard(None) => f.write_str("?"),
            Self::Wildcard(Some(WildcardBound::Extends(ty))) => write!(f, "? extends {ty}"),
            Self::Wildcard(Some(WildcardBound::Super(ty))) => write!(f, "? super {ty}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WildcardBound {
    Extends(Type),
    Super(Type),
}

/// `<T extends Comparable<T> & Serializable>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub annotations: Vec<Annotation>,
    pub name: Identifier,
    pub bounds: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: DottedName,
    pub arguments: AnnotationArguments,
    pub position: ParsePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArguments {
    /// `@Marker` or `@Marker()`
    Marker,
    /// `@Single(value)`
    Single(ElementValue),
    /// `@Normal(a = 1, b = 2)`
    Pairs(Vec<ElementValuePair>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Expression(Expression),
    Array(Vec<ElementValue>),
    Annotation(Box<Annotation>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
    pub name: Identifier,
    pub value: ElementValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> Type {
        Type::Class(ClassType {
            segments: vec![SimpleClassType {
                annotations: Vec::new(),
                name: Identifier::new(name, ParsePosition::start()),
                type_arguments: Vec::new(),
            }],
        })
    }

    #[test]
    fn array_dims_accumulate() {
        let ty = class("Foo").with_dims(1).with_dims(2);
        assert!(matches!(ty, Type::Array { dims: 3, .. }));
        assert_eq!(ty.to_string(), "Foo[][][]");
    }

    #[test]
    fn dotted_name_splits_off_the_last_part() {
        let name = DottedName {
            parts: vec![
                Identifier::new("a", ParsePosition::new(1, 1)),
                Identifier::new("b", ParsePosition::new(1, 3)),
            ],
        };
        assert_eq!(name.to_string(), "a.b");
        let (rest, last) = name.split_last();
        assert_eq!(rest.map(|rest| rest.to_string()).as_deref(), Some("a"));
        assert_eq!(last.map(|last| last.name), Some("b".into()));
    }
}
