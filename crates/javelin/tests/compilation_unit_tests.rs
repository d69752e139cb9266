//! Parsing whole source files with the bundled Java grammar

use javelin::lexer::TokenKind;
use javelin::parser::Parser;
use javelin::syntax::anonymous::{self, ClassKind};
use javelin::syntax::decl::{CompilationUnit, Member, TypeDeclaration};
use javelin::syntax::expr::Expression;
use javelin::syntax::visitor::{self, Visitor};
use javelin::syntax::types::AnnotationArguments;
use pretty_assertions::assert_eq;
use std::ops::ControlFlow;
use std::path::Path;

fn unit(source: &str) -> CompilationUnit {
    let parser = Parser::java().expect("bundled grammar is valid");
    let tree = parser
        .parse_source(Path::new("Test.java"), source)
        .unwrap_or_else(|error| panic!("{error}"));
    assert_eq!(tree.origin(), Path::new("Test.java"));
    tree.compilation_unit().cloned().expect("compilation unit goal")
}

#[test]
fn empty_file_is_an_empty_unit() {
    assert_eq!(unit(""), CompilationUnit::default());
    assert_eq!(unit("  // nothing here\n"), CompilationUnit::default());
}

#[test]
fn package_and_imports() {
    let unit = unit(
        "package com.example.app;\n\
         import java.util.List;\n\
         import java.util.*;\n\
         import static java.lang.Math.max;\n\
         import static java.lang.Math.*;\n",
    );
    assert_eq!(unit.package.map(|package| package.name.to_string()).as_deref(), Some("com.example.app"));
    let imports: Vec<_> = unit
        .imports
        .iter()
        .map(|import| (import.name.to_string(), import.is_static, import.on_demand))
        .collect();
    assert_eq!(
        imports,
        [
            ("java.util.List".to_owned(), false, false),
            ("java.util".to_owned(), false, true),
            ("java.lang.Math.max".to_owned(), true, false),
            ("java.lang.Math".to_owned(), true, true),
        ]
    );
    assert!(unit.types.is_empty());
}

#[test]
fn single_class_without_package() {
    let unit = unit("public final class Main { }");
    assert!(unit.package.is_none());
    let [TypeDeclaration::Class(class)] = &unit.types[..] else {
        panic!("expected one class, got {:?}", unit.types);
    };
    assert_eq!(class.name.name, "Main");
    assert!(class.modifiers[0].is(TokenKind::Public));
    assert!(class.modifiers[1].is(TokenKind::Final));
    assert!(class.body.members.is_empty());
}

#[test]
fn class_members() {
    let unit = unit(
        r#"
        class Box<T extends Comparable<T>> extends Base implements Cloneable, java.io.Serializable {
            private static final int LIMIT = 10, OTHER[] = {};
            static { init(); }
            { count++; }
            Box(T value) { super(value); }
            @Override
            public <R> R map(final Function<? super T, ? extends R> f, String... rest) throws IOException {
                return f.apply(value);
            }
            abstract void nothing();
            class Inner { }
        }
        "#,
    );
    let [TypeDeclaration::Class(class)] = &unit.types[..] else {
        panic!("expected one class");
    };
    assert_eq!(class.type_parameters.len(), 1);
    assert_eq!(class.type_parameters[0].bounds[0].to_string(), "Comparable<T>");
    assert_eq!(class.superclass.as_ref().map(ToString::to_string).as_deref(), Some("Base"));
    assert_eq!(class.interfaces.len(), 2);
    assert_eq!(class.interfaces[1].to_string(), "java.io.Serializable");

    let members = &class.body.members;
    assert_eq!(members.len(), 7);

    let Member::Field(field) = &members[0] else {
        panic!("expected a field");
    };
    assert_eq!(field.declarators.len(), 2);
    assert_eq!(field.declarators[1].dims, 1);
    assert!(matches!(field.declarators[1].initializer, Some(Expression::ArrayInitializer(ref values)) if values.is_empty()));

    assert!(matches!(members[1], Member::Initializer { is_static: true, .. }));
    assert!(matches!(members[2], Member::Initializer { is_static: false, .. }));
    assert!(matches!(&members[3], Member::Constructor(constructor) if constructor.parameters.len() == 1));

    let Member::Method(method) = &members[4] else {
        panic!("expected a method");
    };
    assert_eq!(method.name.name, "map");
    assert_eq!(method.type_parameters.len(), 1);
    assert_eq!(method.parameters.len(), 2);
    assert_eq!(method.parameters[0].ty.to_string(), "Function<? super T, ? extends R>");
    assert!(method.parameters[1].varargs);
    assert_eq!(method.throws.len(), 1);
    assert!(method.body.is_some());
    assert!(matches!(&method.modifiers[0], javelin::syntax::decl::Modifier::Annotation(annotation)
        if annotation.name.to_string() == "Override" && annotation.arguments == AnnotationArguments::Marker));

    let Member::Method(nothing) = &members[5] else {
        panic!("expected a method");
    };
    assert!(nothing.result.is_none());
    assert!(nothing.body.is_none());

    assert!(matches!(&members[6], Member::Type(TypeDeclaration::Class(inner)) if inner.name.name == "Inner"));
}

#[test]
fn interfaces_and_enums() {
    let unit = unit(
        r"
        interface Shape extends Comparable<Shape> {
            double area();
            default String label() { return name(); }
        }
        enum Color implements Shape {
            RED, GREEN(1), BLUE { double area() { return 0; } };
            Color() { }
            Color(int shade) { }
        }
        ",
    );
    let [TypeDeclaration::Interface(interface), TypeDeclaration::Enum(enumeration)] = &unit.types[..] else {
        panic!("expected an interface and an enum, got {:?}", unit.types);
    };
    assert_eq!(interface.extends.len(), 1);
    assert_eq!(interface.body.members.len(), 2);

    let constants: Vec<_> = enumeration.constants.iter().map(|constant| constant.name.name.as_str()).collect();
    assert_eq!(constants, ["RED", "GREEN", "BLUE"]);
    assert!(enumeration.constants[0].arguments.is_none());
    assert_eq!(enumeration.constants[1].arguments.as_ref().map(Vec::len), Some(1));
    assert!(enumeration.constants[2].body.is_some());
    assert_eq!(enumeration.body.members.len(), 2);
}

#[test]
fn enum_with_trailing_comma_and_no_members() {
    let unit = unit("enum E { A, B, }");
    let [TypeDeclaration::Enum(enumeration)] = &unit.types[..] else {
        panic!("expected an enum");
    };
    assert_eq!(enumeration.constants.len(), 2);
    assert!(enumeration.body.members.is_empty());
}

#[test]
fn anonymous_classes_are_numbered_per_enclosing_class() {
    let unit = unit(
        r"
        package p;
        class Outer {
            Runnable a = new Runnable() { public void run() { } };
            void m() {
                Object b = new Object() {
                    Object c = new Object() { };
                };
            }
            class Inner {
                Runnable d = new Runnable() { public void run() { } };
            }
        }
        class Second {
            Object e = new Object() { };
        }
        ",
    );
    let names: Vec<_> = anonymous::class_names(&unit)
        .into_iter()
        .map(|name| (name.qualified_name, name.kind))
        .collect();
    assert_eq!(
        names,
        [
            ("p.Outer".to_owned(), ClassKind::Named),
            ("p.Outer$1".to_owned(), ClassKind::Anonymous),
            ("p.Outer$2".to_owned(), ClassKind::Anonymous),
            ("p.Outer$2$1".to_owned(), ClassKind::Anonymous),
            ("p.Outer$Inner".to_owned(), ClassKind::Named),
            ("p.Outer$Inner$1".to_owned(), ClassKind::Anonymous),
            ("p.Second".to_owned(), ClassKind::Named),
            ("p.Second$1".to_owned(), ClassKind::Anonymous),
        ]
    );
}

#[test]
fn anonymous_numbering_restarts_for_each_file() {
    let source = "class A { Object o = new Object() { }; }";
    for _ in 0..2 {
        let names = anonymous::class_names(&unit(source));
        assert_eq!(names[1].binary_name, "A$1");
    }
}

#[derive(Default)]
struct Invocations {
    names: Vec<String>,
}

impl Visitor for Invocations {
    fn visit_expression(&mut self, expression: &Expression) -> ControlFlow<()> {
        if let Expression::MethodInvocation(invocation) = expression {
            self.names.push(invocation.name.name.to_string());
        }
        visitor::walk_expression(self, expression)
    }
}

#[test]
fn visitor_reaches_nested_expressions() {
    let unit = unit(
        r"
        class Calls {
            int x = first();
            void m() {
                if (second()) { for (;;) third(fourth()); }
                Runnable r = () -> fifth();
            }
        }
        ",
    );
    let mut invocations = Invocations::default();
    assert_eq!(invocations.visit_compilation_unit(&unit), ControlFlow::Continue(()));
    assert_eq!(invocations.names, ["first", "second", "third", "fourth", "fifth"]);
}

struct FirstLiteral(Option<i32>);

impl Visitor for FirstLiteral {
    fn visit_expression(&mut self, expression: &Expression) -> ControlFlow<()> {
        if let Expression::Literal(literal) = expression {
            if let javelin::syntax::expr::LiteralValue::Int(value) = literal.value {
                self.0 = Some(value);
                return ControlFlow::Break(());
            }
        }
        visitor::walk_expression(self, expression)
    }
}

#[test]
fn visitor_can_stop_early() {
    let unit = unit("class C { int a = 1; int b = 2; }");
    let mut first = FirstLiteral(None);
    assert_eq!(first.visit_compilation_unit(&unit), ControlFlow::Break(()));
    assert_eq!(first.0, Some(1));
}
