//! Parsing blocks with the `Block` goal of the Java grammar

use javelin::error::ParseError;
use javelin::lexer::TokenKind;
use javelin::parser::Parser;
use javelin::syntax::ParsePosition;
use javelin::syntax::TreeNode;
use javelin::syntax::expr::{Expression, LambdaBody, LambdaParameters, Receiver};
use javelin::syntax::stmt::{Block, ForInit, Statement, SwitchLabel};
use javelin::syntax::types::Type;
use pretty_assertions::assert_eq;

fn parser() -> Parser {
    Parser::for_goal("Block").expect("bundled grammar is valid")
}

fn try_block(source: &str) -> Result<Block, ParseError> {
    match parser().parse_str(source)? {
        TreeNode::Block(block) => Ok(block),
        other => panic!("expected a block, got {}", other.kind_name()),
    }
}

fn block(source: &str) -> Block {
    try_block(source).unwrap_or_else(|error| panic!("{source}: {error}"))
}

fn single(source: &str) -> Statement {
    let mut block = block(source);
    assert_eq!(block.statements.len(), 1, "{source}");
    block.statements.remove(0)
}

fn name(expression: &Expression) -> String {
    match expression {
        Expression::Name(name) => name.to_string(),
        other => panic!("expected a name, got {other:?}"),
    }
}

#[test]
fn empty_block() {
    let block = block("{ }");
    assert!(block.statements.is_empty());
    assert_eq!(block.position, ParsePosition::new(1, 1));
}

#[test]
fn local_variable_with_binary_initializer() {
    let Statement::LocalVariable(declaration) = single("{ int a = b + c; }") else {
        panic!("expected a local variable declaration");
    };
    assert!(matches!(&declaration.ty, Type::Primitive(primitive) if primitive.kind == TokenKind::Int));
    assert_eq!(declaration.declarators.len(), 1);
    let declarator = &declaration.declarators[0];
    assert_eq!(declarator.name.name, "a");
    let Some(Expression::Binary { left, operator, right }) = &declarator.initializer else {
        panic!("expected a binary initializer, got {:?}", declarator.initializer);
    };
    assert_eq!(*operator, TokenKind::Plus);
    assert_eq!(name(left), "b");
    assert_eq!(name(right), "c");
}

#[test]
fn missing_initializer_is_a_syntax_error() {
    let error = try_block("{ int a = ; }").expect_err("no initializer");
    let ParseError::Syntax { position, found, expected } = &error else {
        panic!("expected a syntax error, got {error:?}");
    };
    assert_eq!(*position, ParsePosition::new(1, 11));
    assert_eq!(*found, TokenKind::Semicolon);
    for kind in [
        TokenKind::Identifier,
        TokenKind::IntLiteral,
        TokenKind::StringLiteral,
        TokenKind::LeftParenthesis,
        TokenKind::New,
    ] {
        assert!(expected.contains(&kind), "{kind} should be expected");
    }
}

#[test]
fn fractions_without_integer_digits() {
    let Statement::LocalVariable(declaration) = single("{ double d = .5 * x; }") else {
        panic!("expected a local variable declaration");
    };
    let Some(Expression::Binary { left, operator, .. }) = &declaration.declarators[0].initializer else {
        panic!("expected a product");
    };
    assert_eq!(*operator, TokenKind::Multiply);
    assert!(matches!(**left, Expression::Literal(_)), "{left:?}");
}

#[test]
fn statements_keep_source_order() {
    let block = block("{ a.foo(); a.bar(); }");
    let names: Vec<_> = block
        .statements
        .iter()
        .map(|statement| match statement {
            Statement::Expression(Expression::MethodInvocation(invocation)) => {
                assert!(matches!(&invocation.receiver, Some(Receiver::Name(receiver)) if receiver.to_string() == "a"));
                assert!(invocation.arguments.is_empty());
                invocation.name.name.to_string()
            }
            other => panic!("expected a method invocation, got {other:?}"),
        })
        .collect();
    assert_eq!(names, ["foo", "bar"]);
}

#[test]
fn precedence_and_associativity() {
    let Statement::Expression(Expression::Assignment { value, .. }) = single("{ x = a - b - c * d; }") else {
        panic!("expected an assignment");
    };
    // (a - b) - (c * d)
    let Expression::Binary { left, operator: TokenKind::Minus, right } = *value else {
        panic!("expected a subtraction");
    };
    assert!(matches!(*left, Expression::Binary { operator: TokenKind::Minus, .. }));
    assert!(matches!(*right, Expression::Binary { operator: TokenKind::Multiply, .. }));
}

#[test]
fn dangling_else_binds_to_the_inner_if() {
    let Statement::If { then, otherwise, .. } = single("{ if (a) if (b) x(); else y(); }") else {
        panic!("expected an if statement");
    };
    assert!(otherwise.is_none());
    assert!(matches!(*then, Statement::If { otherwise: Some(_), .. }));
}

#[test]
fn loops() {
    let Statement::For { init, condition, update, .. } = single("{ for (int i = 0; i < n; i++, j--) {} }") else {
        panic!("expected a for loop");
    };
    assert!(matches!(init, Some(ForInit::Declaration(_))));
    assert!(matches!(condition, Some(Expression::Binary { operator: TokenKind::Lt, .. })));
    assert_eq!(update.len(), 2);

    let Statement::For { init, condition, update, .. } = single("{ for (;;) ; }") else {
        panic!("expected a for loop");
    };
    assert!(init.is_none() && condition.is_none() && update.is_empty());

    let Statement::EnhancedFor { variable, iterable, .. } = single("{ for (final String s : names) use(s); }") else {
        panic!("expected an enhanced for loop");
    };
    assert_eq!(variable.modifiers.len(), 1);
    assert_eq!(name(&iterable), "names");

    assert!(matches!(single("{ while (true) break; }"), Statement::While { .. }));
    assert!(matches!(single("{ do x++; while (x < 3); }"), Statement::Do { .. }));
}

#[test]
fn try_catch_finally() {
    let Statement::Try(statement) = single(
        "{ try (Reader r = open()) { r.read(); } catch (IOException | RuntimeException e) { } finally { close(); } }",
    ) else {
        panic!("expected a try statement");
    };
    assert_eq!(statement.resources.len(), 1);
    assert_eq!(statement.resources[0].name.name, "r");
    assert_eq!(statement.catches.len(), 1);
    assert_eq!(statement.catches[0].types.len(), 2);
    assert_eq!(statement.finally.map(|block| block.statements.len()), Some(1));
}

#[test]
fn switch_groups() {
    let Statement::Switch { groups, .. } = single("{ switch (x) { case 1: case 2: a(); break; default: b(); case 3: } }") else {
        panic!("expected a switch statement");
    };
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].labels.len(), 2);
    assert_eq!(groups[0].statements.len(), 2);
    assert!(matches!(groups[1].labels[..], [SwitchLabel::Default(_)]));
    assert!(groups[2].statements.is_empty());
}

#[test]
fn labels_and_jumps() {
    let Statement::Labeled { label, statement } = single("{ outer: while (true) { continue outer; } }") else {
        panic!("expected a labeled statement");
    };
    assert_eq!(label.name, "outer");
    let Statement::While { body, .. } = *statement else {
        panic!("expected a while loop");
    };
    let Statement::Block(body) = *body else {
        panic!("expected a block");
    };
    assert!(matches!(&body.statements[..], [Statement::Continue(Some(label), _)] if label.name == "outer"));
}

#[test]
fn lambdas_and_method_references() {
    let Statement::LocalVariable(declaration) = single("{ Function<String, Integer> f = s -> s.length(); }") else {
        panic!("expected a local variable declaration");
    };
    let Some(Expression::Lambda(lambda)) = &declaration.declarators[0].initializer else {
        panic!("expected a lambda");
    };
    assert!(matches!(&lambda.parameters, LambdaParameters::Inferred(names) if names.len() == 1));
    assert!(matches!(lambda.body, LambdaBody::Expression(_)));

    let Statement::Expression(Expression::MethodInvocation(invocation)) = single("{ map.forEach((k, v) -> { }); }") else {
        panic!("expected a method invocation");
    };
    let [Expression::Lambda(lambda)] = &invocation.arguments[..] else {
        panic!("expected a single lambda argument");
    };
    assert!(matches!(&lambda.parameters, LambdaParameters::Inferred(names) if names.len() == 2));
    assert!(matches!(&lambda.body, LambdaBody::Block(body) if body.statements.is_empty()));

    let Statement::Expression(Expression::MethodInvocation(invocation)) = single("{ names.map(String::valueOf); }") else {
        panic!("expected a method invocation");
    };
    assert!(matches!(&invocation.arguments[..], [Expression::MethodReference { name: Some(_), .. }]));
}

#[test]
fn nested_type_arguments_close_with_single_tokens() {
    let Statement::LocalVariable(declaration) = single("{ Map<String, List<List<Integer>>> m = new HashMap<>(); }") else {
        panic!("expected a local variable declaration");
    };
    assert_eq!(declaration.ty.to_string(), "Map<String, List<List<Integer>>>");
    let Some(Expression::New(creation)) = &declaration.declarators[0].initializer else {
        panic!("expected a class instance creation");
    };
    assert!(creation.diamond);
}

#[test]
fn shift_operators_outside_type_context() {
    let Statement::LocalVariable(declaration) = single("{ int x = a >> 2 >>> b; }") else {
        panic!("expected a local variable declaration");
    };
    let Some(Expression::Binary { operator, left, .. }) = &declaration.declarators[0].initializer else {
        panic!("expected a shift");
    };
    assert_eq!(*operator, TokenKind::RightShiftUnsigned);
    assert!(matches!(**left, Expression::Binary { operator: TokenKind::RightShift, .. }));
}

#[test]
fn casts_to_nested_generic_types() {
    for (source, ty) in [
        ("{ Object o = (List<List<String>>) y; }", "List<List<String>>"),
        ("{ Object o = (Map<String, List<List<Integer>>>) y; }", "Map<String, List<List<Integer>>>"),
    ] {
        let Statement::LocalVariable(declaration) = single(source) else {
            panic!("expected a local variable declaration in {source}");
        };
        let Some(Expression::Cast { types, expression }) = &declaration.declarators[0].initializer else {
            panic!("expected a cast in {source}, got {:?}", declaration.declarators[0].initializer);
        };
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].to_string(), ty);
        assert_eq!(name(expression), "y");
    }

    // a shift in parentheses is still a shift
    let Statement::LocalVariable(declaration) = single("{ int x = (a >> b); }") else {
        panic!("expected a local variable declaration");
    };
    assert!(matches!(
        &declaration.declarators[0].initializer,
        Some(Expression::Binary { operator: TokenKind::RightShift, .. })
    ));
}

#[test]
fn casts_and_anonymous_classes() {
    let Statement::Expression(Expression::Assignment { value, .. }) = single("{ x = (Runnable & Serializable) () -> run(); }") else {
        panic!("expected an assignment");
    };
    assert!(matches!(*value, Expression::Cast { ref types, .. } if types.len() == 2));

    let Statement::Expression(Expression::New(creation)) = single("{ new Thread() { public void run() { } }; }") else {
        panic!("expected a class instance creation");
    };
    assert_eq!(creation.body.map(|body| body.members.len()), Some(1));
}

#[test]
fn local_classes() {
    assert!(matches!(single("{ class Local { } }"), Statement::LocalClass(_)));
}
