//! Binary names for the classes of a compilation unit.
//!
//! Named classes get `Outer$Inner`, anonymous classes the next number of the
//! class that encloses them: `Outer$1`, `Outer$2`, `Outer$Inner$1`. Every
//! class on the traversal stack owns its own counter, so numbering restarts in
//! each nested class and never leaks between files.

use crate::syntax::ParsePosition;
use crate::syntax::decl::{ClassBody, CompilationUnit, EnumConstant, TypeDeclaration};
use crate::syntax::expr::ClassInstanceCreation;
use crate::syntax::visitor::{self, Visitor};
use std::ops::ControlFlow;

/// Whether a class was declared with a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Named,
    Anonymous,
}

/// One class of a compilation unit with its binary name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    /// `Outer$Inner$1`
    pub binary_name: String,
    /// The binary name prefixed with the package, `some.pkg.Outer$Inner$1`
    pub qualified_name: String,
    pub kind: ClassKind,
    /// Start of the declaration or of the anonymous class body
    pub position: ParsePosition,
}

/// Name every class of `unit`, in declaration order
#[must_use]
pub fn class_names(unit: &CompilationUnit) -> Vec<ClassName> {
    let mut namer = ClassNamer {
        package: unit.package.as_ref().map(|package| package.name.to_string()),
        frames: Vec::new(),
        names: Vec::new(),
    };
    // the namer never breaks
    let _ = namer.visit_compilation_unit(unit);
    namer.names
}

struct Frame {
    id: String,
    anonymous_classes: u32,
}

struct ClassNamer {
    package: Option<String>,
    frames: Vec<Frame>,
    names: Vec<ClassName>,
}

impl ClassNamer {
    fn push(&mut self, id: String, kind: ClassKind, position: ParsePosition) {
        self.frames.push(Frame {
            id,
            anonymous_classes: 0,
        });
        let binary_name = self
            .frames
            .iter()
            .map(|frame| frame.id.as_str())
            .collect::<Vec<_>>()
            .join("$");
        let qualified_name = match &self.package {
            Some(package) => format!("{package}.{binary_name}"),
            None => binary_name.clone(),
        };
        log::trace!("class {qualified_name}");
        self.names.push(ClassName {
            binary_name,
            qualified_name,
            kind,
            position,
        });
    }

    /// Anonymous classes outside any class, e.g. in a malformed tree, are
    /// numbered from a frame of their own.
    fn next_anonymous_id(&mut self) -> String {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.anonymous_classes += 1;
                frame.anonymous_classes.to_string()
            }
            None => String::from("1"),
        }
    }

    fn anonymous(&mut self, body: &ClassBody) -> ControlFlow<()> {
        let id = self.next_anonymous_id();
        self.push(id, ClassKind::Anonymous, body.position);
        visitor::walk_class_body(self, body)?;
        self.frames.pop();
        ControlFlow::Continue(())
    }
}

impl Visitor for ClassNamer {
    fn visit_type_declaration(&mut self, declaration: &TypeDeclaration) -> ControlFlow<()> {
        let name = declaration.name();
        self.push(name.name.to_string(), ClassKind::Named, name.position);
        visitor::walk_type_declaration(self, declaration)?;
        self.frames.pop();
        ControlFlow::Continue(())
    }

    fn visit_enum_constant(&mut self, constant: &EnumConstant) -> ControlFlow<()> {
        for annotation in &constant.annotations {
            self.visit_annotation(annotation)?;
        }
        for argument in constant.arguments.iter().flatten() {
            self.visit_expression(argument)?;
        }
        match &constant.body {
            Some(body) => self.anonymous(body),
            None => ControlFlow::Continue(()),
        }
    }

    fn visit_class_instance_creation(&mut self, creation: &ClassInstanceCreation) -> ControlFlow<()> {
        if let Some(outer) = &creation.outer {
            self.visit_expression(outer)?;
        }
        self.visit_type(&creation.ty)?;
        for argument in &creation.arguments {
            self.visit_expression(argument)?;
        }
        match &creation.body {
            Some(body) => self.anonymous(body),
            None => ControlFlow::Continue(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::decl::{ClassDeclaration, FieldDeclaration, Member, PackageDeclaration};
    use crate::syntax::expr::Expression;
    use crate::syntax::stmt::VariableDeclarator;
    use crate::syntax::types::{ClassType, DottedName, Identifier, SimpleClassType, Type};

    fn at(line: u32) -> ParsePosition {
        ParsePosition::new(line, 1)
    }

    fn class_type(name: &str) -> Type {
        Type::Class(ClassType {
            segments: vec![SimpleClassType {
                annotations: Vec::new(),
                name: Identifier::new(name, at(1)),
                type_arguments: Vec::new(),
            }],
        })
    }

    /// `Runnable name = new Runnable() { members };`
    fn anonymous_field(name: &str, line: u32, members: Vec<Member>) -> Member {
        Member::Field(FieldDeclaration {
            modifiers: Vec::new(),
            ty: class_type("Runnable"),
            declarators: vec![VariableDeclarator {
                name: Identifier::new(name, at(line)),
                dims: 0,
                initializer: Some(Expression::New(ClassInstanceCreation {
                    outer: None,
                    type_arguments: Vec::new(),
                    ty: class_type("Runnable"),
                    diamond: false,
                    arguments: Vec::new(),
                    body: Some(ClassBody {
                        members,
                        position: at(line),
                    }),
                    position: at(line),
                })),
            }],
        })
    }

    fn class(name: &str, line: u32, members: Vec<Member>) -> TypeDeclaration {
        TypeDeclaration::Class(ClassDeclaration {
            modifiers: Vec::new(),
            name: Identifier::new(name, at(line)),
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            body: ClassBody {
                members,
                position: at(line),
            },
        })
    }

    #[test]
    fn numbering_is_per_enclosing_class() {
        let inner = class("Inner", 4, vec![anonymous_field("c", 5, Vec::new())]);
        let unit = CompilationUnit {
            package: Some(PackageDeclaration {
                annotations: Vec::new(),
                name: DottedName {
                    parts: vec![Identifier::new("foo", at(1)), Identifier::new("bar", at(1))],
                },
            }),
            imports: Vec::new(),
            types: vec![class(
                "Outer",
                2,
                vec![
                    anonymous_field("a", 3, vec![anonymous_field("nested", 3, Vec::new())]),
                    Member::Type(inner),
                    anonymous_field("b", 6, Vec::new()),
                ],
            )],
        };

        let names: Vec<_> = class_names(&unit)
            .into_iter()
            .map(|name| (name.binary_name, name.kind))
            .collect();
        assert_eq!(
            names,
            [
                ("Outer".to_string(), ClassKind::Named),
                ("Outer$1".to_string(), ClassKind::Anonymous),
                ("Outer$1$1".to_string(), ClassKind::Anonymous),
                ("Outer$Inner".to_string(), ClassKind::Named),
                ("Outer$Inner$1".to_string(), ClassKind::Anonymous),
                ("Outer$2".to_string(), ClassKind::Anonymous),
            ]
        );
        assert_eq!(class_names(&unit)[5].qualified_name, "foo.bar.Outer$2");
    }

    #[test]
    fn counters_do_not_leak_between_units() {
        let unit = CompilationUnit {
            types: vec![class("A", 1, vec![anonymous_field("x", 2, Vec::new())])],
            ..CompilationUnit::default()
        };
        assert_eq!(class_names(&unit)[1].binary_name, "A$1");
        assert_eq!(class_names(&unit)[1].binary_name, "A$1");
    }
}
