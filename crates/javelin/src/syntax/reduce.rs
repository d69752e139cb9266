//! Reductions for the Java grammar, registered by collection name.

use crate::error::TreeBuildError;
use crate::lexer::TokenKind;
use crate::syntax::builder::{Operands, Reduce};
use crate::syntax::decl::{
    ClassBody, ClassDeclaration, CompilationUnit, ConstructorDeclaration, EnumConstant, EnumDeclaration,
    FieldDeclaration, FormalParameter, ImportDeclaration, InterfaceDeclaration, Member, MethodDeclaration,
    Modifier, PackageDeclaration, TypeDeclaration,
};
use crate::syntax::expr::{
    ClassInstanceCreation, Expression, Lambda, LambdaBody, LambdaParameters, MethodInvocation, Receiver,
};
use crate::syntax::stmt::{
    Block, CatchClause, ConstructorCall, ConstructorCallKind, ForInit, LocalVariableDeclaration, Resource,
    Statement, SwitchGroup, SwitchLabel, TryStatement, VariableDeclarator,
};
use crate::syntax::types::{
    Annotation, AnnotationArguments, ClassType, DottedName, ElementValue, ElementValuePair, PrimitiveType, SimpleClassType,
    Type, TypeArgument, TypeParameter, WildcardBound,
};
use crate::syntax::{TreeNode, ZomEntry};

type Reduced = Result<TreeNode, TreeBuildError>;

pub(crate) const JAVA_REDUCTIONS: &[(&str, Reduce)] = &[
    // compilation units
    ("CompilationUnit", compilation_unit),
    ("PackageDeclaration", package_declaration),
    ("ImportDeclaration", import_declaration),
    ("TypeDeclaration", empty),
    // names and types
    ("DottedName", dotted_name),
    ("PrimitiveType", primitive_type),
    ("ClassType", class_type),
    ("SimpleClassType", simple_class_type),
    ("ArrayType", array_type),
    ("Dims", dims),
    ("TypeArguments", type_arguments),
    ("Wildcard", wildcard),
    ("TypeParameters", type_parameters),
    ("TypeParameter", type_parameter),
    ("AdditionalBound", additional_bound),
    // annotations
    ("Annotation", annotation),
    ("ElementValuePair", element_value_pair),
    ("ElementValueArrayInitializer", element_value_array),
    // classes and interfaces
    ("NormalClassDeclaration", class_declaration),
    ("Modifier", modifier),
    ("VariableModifier", modifier),
    ("Superclass", superclass),
    ("Superinterfaces", interfaces),
    ("ExtendsInterfaces", interfaces),
    ("ClassBody", class_body),
    ("ClassMemberDeclaration", empty),
    ("StaticInitializer", static_initializer),
    ("FieldDeclaration", field_declaration),
    ("VariableDeclaratorList", list),
    ("VariableDeclarator", variable_declarator),
    ("VariableDeclaratorId", variable_declarator_id),
    ("MethodDeclaration", method_declaration),
    ("Result", first),
    ("FormalParameterList", list),
    ("FormalParameter", formal_parameter),
    ("Throws", throws),
    ("MethodBody", empty),
    ("ConstructorDeclaration", constructor_declaration),
    ("ConstructorBody", block),
    ("ExplicitConstructorInvocation", explicit_constructor_invocation),
    ("EnumDeclaration", enum_declaration),
    ("EnumBody", enum_body),
    ("EnumConstant", enum_constant),
    ("EnumBodyDeclarations", enum_body_declarations),
    ("InterfaceDeclaration", interface_declaration),
    ("ArrayInitializer", array_initializer),
    // blocks and statements
    ("Block", block),
    ("LocalVariableDeclarationStatement", local_variable_statement),
    ("LocalVariableDeclaration", local_variable_declaration),
    ("EmptyStatement", empty_statement),
    ("LabeledStatement", labeled_statement),
    ("LabeledStatementNoShortIf", labeled_statement),
    ("ExpressionStatement", expression_statement),
    ("IfThenStatement", if_statement),
    ("IfThenElseStatement", if_statement),
    ("IfThenElseStatementNoShortIf", if_statement),
    ("AssertStatement", assert_statement),
    ("SwitchStatement", switch_statement),
    ("SwitchBlock", switch_block),
    ("SwitchBlockStatementGroup", switch_group),
    ("SwitchLabel", switch_label),
    ("WhileStatement", while_statement),
    ("WhileStatementNoShortIf", while_statement),
    ("DoStatement", do_statement),
    ("BasicForStatement", basic_for),
    ("BasicForStatementNoShortIf", basic_for),
    ("StatementExpressionList", list),
    ("EnhancedForStatement", enhanced_for),
    ("EnhancedForStatementNoShortIf", enhanced_for),
    ("BreakStatement", jump_statement),
    ("ContinueStatement", jump_statement),
    ("ReturnStatement", return_statement),
    ("ThrowStatement", throw_statement),
    ("SynchronizedStatement", synchronized_statement),
    ("TryStatement", try_statement),
    ("CatchClause", catch_clause),
    ("CatchType", list),
    ("Finally", finally),
    ("ResourceSpecification", resource_specification),
    ("Resource", resource),
    // expressions
    ("PrimaryNoNewArray", primary),
    ("Literal", first),
    ("ClassLiteral", class_literal),
    ("ClassInstanceCreationExpression", qualified_creation),
    ("UnqualifiedClassInstanceCreationExpression", class_instance_creation),
    ("Diamond", diamond),
    ("Arguments", arguments),
    ("FieldAccess", field_access),
    ("ArrayAccess", array_access),
    ("MethodInvocation", method_invocation),
    ("MethodReference", method_reference),
    ("ArrayCreationExpression", array_creation),
    ("DimExprs", list),
    ("DimExpr", dim_expr),
    ("LambdaExpression", lambda),
    ("LambdaParameters", lambda_parameters),
    ("Assignment", assignment),
    ("AssignmentOperator", first),
    ("ConditionalExpression", conditional),
    ("ConditionalOrExpression", binary),
    ("ConditionalAndExpression", binary),
    ("InclusiveOrExpression", binary),
    ("ExclusiveOrExpression", binary),
    ("AndExpression", binary),
    ("EqualityExpression", binary),
    ("RelationalExpression", binary),
    ("ShiftExpression", binary),
    ("AdditiveExpression", binary),
    ("MultiplicativeExpression", binary),
    ("UnaryExpression", prefix),
    ("PreIncrementExpression", prefix),
    ("PreDecrementExpression", prefix),
    ("UnaryExpressionNotPlusMinus", prefix),
    ("PostIncrementExpression", postfix),
    ("PostDecrementExpression", postfix),
    ("CastExpression", cast),
];

/// `Goal ::= X END_OF_INPUT`
pub(crate) fn goal(ops: &mut Operands<'_>) -> Reduced {
    ops.next()
}

/// `Goal ::= [CompilationUnit] END_OF_INPUT`: always a compilation unit, even
/// for empty input or a unit with a single part
pub(crate) fn compilation_unit_goal(ops: &mut Operands<'_>) -> Reduced {
    if ops.at(TokenKind::EndOfInput) {
        return Ok(TreeNode::CompilationUnit(CompilationUnit::default()));
    }
    match ops.next()? {
        TreeNode::CompilationUnit(unit) => Ok(TreeNode::CompilationUnit(unit)),
        part => unit_from(ops, vec![part]),
    }
}

fn compilation_unit(ops: &mut Operands<'_>) -> Reduced {
    let parts = ops.items();
    unit_from(ops, parts)
}

fn unit_from(ops: &Operands<'_>, parts: Vec<TreeNode>) -> Reduced {
    let mut unit = CompilationUnit::default();
    for part in parts {
        match part {
            TreeNode::Package(package) => unit.package = Some(package),
            TreeNode::Import(import) => unit.imports.push(import),
            TreeNode::TypeDeclaration(declaration) => unit.types.push(declaration),
            TreeNode::Empty(_) => {}
            other => return Err(ops.unexpected("package, import or type declaration", &other)),
        }
    }
    Ok(TreeNode::CompilationUnit(unit))
}

fn package_declaration(ops: &mut Operands<'_>) -> Reduced {
    let annotations = ops.annotations()?;
    ops.expect(TokenKind::Package)?;
    let name = ops.name()?;
    Ok(TreeNode::Package(PackageDeclaration { annotations, name }))
}

fn import_declaration(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Import)?;
    let is_static = ops.eat(TokenKind::Static).is_some();
    let name = ops.name()?;
    let on_demand = ops.contains(TokenKind::Multiply);
    Ok(TreeNode::Import(ImportDeclaration {
        name,
        is_static,
        on_demand,
    }))
}

/// A lone `;`
fn empty(ops: &mut Operands<'_>) -> Reduced {
    Ok(TreeNode::Empty(ops.token()?.position))
}

/// The single operand itself
fn first(ops: &mut Operands<'_>) -> Reduced {
    ops.next()
}

/// `X {',' X}` as one flat list
fn list(ops: &mut Operands<'_>) -> Reduced {
    let element = ops.rule().into();
    Ok(TreeNode::Zom(ZomEntry {
        element,
        items: ops.items(),
    }))
}

fn dotted_name(ops: &mut Operands<'_>) -> Reduced {
    let mut parts = vec![ops.identifier()?];
    for item in ops.items() {
        match item {
            TreeNode::Identifier(identifier) => parts.push(identifier),
            other => return Err(ops.unexpected("identifier", &other)),
        }
    }
    Ok(TreeNode::Name(DottedName { parts }))
}

fn primitive_type(ops: &mut Operands<'_>) -> Reduced {
    if let Some(TreeNode::Token(token)) = ops.peek() {
        let (kind, position) = (token.kind, token.position);
        ops.next()?;
        return Ok(TreeNode::Type(Type::Primitive(PrimitiveType {
            kind,
            annotations: Vec::new(),
            position,
        })));
    }
    let mut annotations = Vec::new();
    while let Some(node) = ops.take_if(|node| !matches!(node, TreeNode::Type(_))) {
        for item in node.into_items() {
            match item {
                TreeNode::Annotation(annotation) => annotations.push(annotation),
                other => return Err(ops.unexpected("annotation", &other)),
            }
        }
    }
    match ops.ty()? {
        Type::Primitive(mut primitive) => {
            annotations.append(&mut primitive.annotations);
            primitive.annotations = annotations;
            Ok(TreeNode::Type(Type::Primitive(primitive)))
        }
        other => Ok(TreeNode::Type(other)),
    }
}

fn class_type(ops: &mut Operands<'_>) -> Reduced {
    let mut segments = Vec::new();
    for ty in ops.types()? {
        match ty {
            Type::Class(class) => segments.extend(class.segments),
            other => return Err(ops.unexpected("class type", &TreeNode::Type(other))),
        }
    }
    Ok(TreeNode::Type(Type::Class(ClassType { segments })))
}

fn simple_class_type(ops: &mut Operands<'_>) -> Reduced {
    let annotations = ops.annotations()?;
    let name = ops.identifier()?;
    let type_arguments = ops.type_arguments();
    Ok(TreeNode::Type(Type::Class(ClassType {
        segments: vec![SimpleClassType {
            annotations,
            name,
            type_arguments,
        }],
    })))
}

fn array_type(ops: &mut Operands<'_>) -> Reduced {
    let element = ops.ty()?;
    let dims = ops.dims();
    Ok(TreeNode::Type(element.with_dims(dims)))
}

fn dims(ops: &mut Operands<'_>) -> Reduced {
    let inner = ops.dims();
    Ok(TreeNode::Dims(inner + 1))
}

fn type_arguments(ops: &mut Operands<'_>) -> Reduced {
    let arguments = ops
        .items()
        .into_iter()
        .map(|item| match item {
            TreeNode::Type(ty) => Ok(TypeArgument::Type(ty)),
            TreeNode::TypeArgument(argument) => Ok(argument),
            other => Err(ops.unexpected("type argument", &other)),
        })
        .collect::<Result<_, _>>()?;
    Ok(TreeNode::TypeArguments(arguments))
}

fn wildcard(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::QuestionMark)?;
    let bound = if ops.eat(TokenKind::Extends).is_some() {
        Some(WildcardBound::Extends(ops.ty()?))
    } else if ops.eat(TokenKind::Super).is_some() {
        Some(WildcardBound::Super(ops.ty()?))
    } else {
        None
    };
    Ok(TreeNode::TypeArgument(TypeArgument::Wildcard(bound)))
}

fn type_parameters(ops: &mut Operands<'_>) -> Reduced {
    let parameters = ops
        .items()
        .into_iter()
        .map(|item| match item {
            TreeNode::TypeParameter(parameter) => Ok(parameter),
            other => Err(ops.unexpected("type parameter", &other)),
        })
        .collect::<Result<_, _>>()?;
    Ok(TreeNode::TypeParameters(parameters))
}

fn type_parameter(ops: &mut Operands<'_>) -> Reduced {
    let annotations = ops.annotations()?;
    let name = ops.identifier()?;
    let bounds = if ops.eat(TokenKind::Extends).is_some() {
        ops.types()?
    } else {
        Vec::new()
    };
    Ok(TreeNode::TypeParameter(TypeParameter {
        annotations,
        name,
        bounds,
    }))
}

fn additional_bound(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::BitAnd)?;
    Ok(TreeNode::Type(ops.ty()?))
}

fn annotation(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::At)?.position;
    let name = ops.name()?;
    let mut items = ops.items().into_iter();
    let arguments = match items.next() {
        None => AnnotationArguments::Marker,
        Some(TreeNode::ElementValuePair(pair)) => {
            let mut pairs = vec![pair];
            for item in items {
                match item {
                    TreeNode::ElementValuePair(pair) => pairs.push(pair),
                    other => return Err(ops.unexpected("element value pair", &other)),
                }
            }
            AnnotationArguments::Pairs(pairs)
        }
        Some(value) => AnnotationArguments::Single(element_value(ops, value)?),
    };
    Ok(TreeNode::Annotation(Annotation {
        name,
        arguments,
        position,
    }))
}

fn element_value(ops: &Operands<'_>, node: TreeNode) -> Result<ElementValue, TreeBuildError> {
    match node {
        TreeNode::ElementValue(value) => Ok(value),
        TreeNode::Annotation(annotation) => Ok(ElementValue::Annotation(Box::new(annotation))),
        other => expression_of(ops, other).map(ElementValue::Expression),
    }
}

fn element_value_pair(ops: &mut Operands<'_>) -> Reduced {
    let name = ops.identifier()?;
    ops.expect(TokenKind::Equal)?;
    let node = ops.next()?;
    let value = element_value(ops, node)?;
    Ok(TreeNode::ElementValuePair(ElementValuePair { name, value }))
}

fn element_value_array(ops: &mut Operands<'_>) -> Reduced {
    let values = ops
        .items()
        .into_iter()
        .map(|item| element_value(ops, item))
        .collect::<Result<_, _>>()?;
    Ok(TreeNode::ElementValue(ElementValue::Array(values)))
}

fn modifier(ops: &mut Operands<'_>) -> Reduced {
    let token = ops.token()?;
    Ok(TreeNode::Modifier(Modifier::Keyword {
        kind: token.kind,
        position: token.position,
    }))
}

fn superclass(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Extends)?;
    Ok(TreeNode::Superclass(ops.ty()?))
}

/// `implements A, B` and `extends A, B`
fn interfaces(ops: &mut Operands<'_>) -> Reduced {
    ops.token()?;
    Ok(TreeNode::Interfaces(ops.types()?))
}

fn take_superclass(ops: &mut Operands<'_>) -> Option<Type> {
    match ops.take_if(|node| matches!(node, TreeNode::Superclass(_))) {
        Some(TreeNode::Superclass(ty)) => Some(ty),
        _ => None,
    }
}

fn take_interfaces(ops: &mut Operands<'_>) -> Vec<Type> {
    match ops.take_if(|node| matches!(node, TreeNode::Interfaces(_))) {
        Some(TreeNode::Interfaces(types)) => types,
        _ => Vec::new(),
    }
}

fn take_throws(ops: &mut Operands<'_>) -> Vec<Type> {
    match ops.take_if(|node| matches!(node, TreeNode::Throws(_))) {
        Some(TreeNode::Throws(types)) => types,
        _ => Vec::new(),
    }
}

fn class_body_of(ops: &mut Operands<'_>) -> Result<ClassBody, TreeBuildError> {
    match ops.next()? {
        TreeNode::ClassBody(body) => Ok(body),
        other => Err(ops.unexpected("class body", &other)),
    }
}

fn class_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    ops.expect(TokenKind::Class)?;
    let name = ops.identifier()?;
    let type_parameters = ops.type_parameters();
    let superclass = take_superclass(ops);
    let interfaces = take_interfaces(ops);
    let body = class_body_of(ops)?;
    Ok(TreeNode::TypeDeclaration(TypeDeclaration::Class(ClassDeclaration {
        modifiers,
        name,
        type_parameters,
        superclass,
        interfaces,
        body,
    })))
}

fn interface_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    ops.expect(TokenKind::Interface)?;
    let name = ops.identifier()?;
    let type_parameters = ops.type_parameters();
    let extends = take_interfaces(ops);
    let body = class_body_of(ops)?;
    Ok(TreeNode::TypeDeclaration(TypeDeclaration::Interface(InterfaceDeclaration {
        modifiers,
        name,
        type_parameters,
        extends,
        body,
    })))
}

fn members(ops: &Operands<'_>, items: Vec<TreeNode>) -> Result<Vec<Member>, TreeBuildError> {
    let mut members = Vec::with_capacity(items.len());
    for item in items {
        match item {
            TreeNode::Member(member) => members.push(member),
            TreeNode::TypeDeclaration(declaration) => members.push(Member::Type(declaration)),
            TreeNode::Block(block) => members.push(Member::Initializer {
                is_static: false,
                block,
            }),
            TreeNode::Empty(_) => {}
            other => return Err(ops.unexpected("member", &other)),
        }
    }
    Ok(members)
}

fn class_body(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::LeftCurly)?.position;
    let items = ops.items();
    Ok(TreeNode::ClassBody(ClassBody {
        members: members(ops, items)?,
        position,
    }))
}

fn static_initializer(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Static)?;
    Ok(TreeNode::Member(Member::Initializer {
        is_static: true,
        block: ops.block()?,
    }))
}

fn declarators(ops: &mut Operands<'_>) -> Result<Vec<VariableDeclarator>, TreeBuildError> {
    ops.next()?
        .into_items()
        .into_iter()
        .map(|item| match item {
            TreeNode::VariableDeclarator(declarator) => Ok(declarator),
            other => Err(ops.unexpected("variable declarator", &other)),
        })
        .collect()
}

fn field_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    let ty = ops.ty()?;
    let declarators = declarators(ops)?;
    Ok(TreeNode::Member(Member::Field(FieldDeclaration {
        modifiers,
        ty,
        declarators,
    })))
}

fn variable_declarator(ops: &mut Operands<'_>) -> Reduced {
    let mut declarator = match ops.next()? {
        TreeNode::VariableDeclarator(declarator) => declarator,
        other => return Err(ops.unexpected("variable declarator", &other)),
    };
    ops.expect(TokenKind::Equal)?;
    declarator.initializer = Some(ops.expression()?);
    Ok(TreeNode::VariableDeclarator(declarator))
}

fn variable_declarator_id(ops: &mut Operands<'_>) -> Reduced {
    let name = ops.identifier()?;
    let dims = ops.dims();
    Ok(TreeNode::VariableDeclarator(VariableDeclarator {
        name,
        dims,
        initializer: None,
    }))
}

fn formal_parameters(ops: &mut Operands<'_>) -> Result<Vec<FormalParameter>, TreeBuildError> {
    let Some(node) = ops.take_if(|node| matches!(node, TreeNode::FormalParameter(_) | TreeNode::Zom(_))) else {
        return Ok(Vec::new());
    };
    node.into_items()
        .into_iter()
        .map(|item| match item {
            TreeNode::FormalParameter(parameter) => Ok(parameter),
            other => Err(ops.unexpected("formal parameter", &other)),
        })
        .collect()
}

fn method_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    let type_parameters = ops.type_parameters();
    let result = match ops.next()? {
        TreeNode::Type(ty) => Some(ty),
        TreeNode::Token(token) if token.kind == TokenKind::Void => None,
        other => return Err(ops.unexpected("result type", &other)),
    };
    let name = ops.identifier()?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let parameters = formal_parameters(ops)?;
    ops.expect(TokenKind::RightParenthesis)?;
    let dims = ops.dims();
    let result = result.map(|ty| ty.with_dims(dims));
    let throws = take_throws(ops);
    let body = match ops.next()? {
        TreeNode::Block(block) => Some(block),
        TreeNode::Empty(_) => None,
        other => return Err(ops.unexpected("method body", &other)),
    };
    Ok(TreeNode::Member(Member::Method(MethodDeclaration {
        modifiers,
        type_parameters,
        result,
        name,
        parameters,
        throws,
        body,
    })))
}

fn formal_parameter(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    let ty = ops.ty()?;
    let parameter = if ops.eat(TokenKind::Ellipsis).is_some() {
        FormalParameter {
            modifiers,
            ty,
            name: ops.identifier()?,
            varargs: true,
        }
    } else {
        let declarator = match ops.next()? {
            TreeNode::VariableDeclarator(declarator) => declarator,
            other => return Err(ops.unexpected("parameter name", &other)),
        };
        FormalParameter {
            modifiers,
            ty: ty.with_dims(declarator.dims),
            name: declarator.name,
            varargs: false,
        }
    };
    Ok(TreeNode::FormalParameter(parameter))
}

fn throws(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Throws)?;
    Ok(TreeNode::Throws(ops.types()?))
}

fn constructor_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    let type_parameters = ops.type_parameters();
    let name = ops.identifier()?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let parameters = formal_parameters(ops)?;
    ops.expect(TokenKind::RightParenthesis)?;
    let throws = take_throws(ops);
    let body = ops.block()?;
    Ok(TreeNode::Member(Member::Constructor(ConstructorDeclaration {
        modifiers,
        type_parameters,
        name,
        parameters,
        throws,
        body,
    })))
}

fn explicit_constructor_invocation(ops: &mut Operands<'_>) -> Reduced {
    let qualifier = ops.take_expression();
    if qualifier.is_some() {
        ops.expect(TokenKind::Dot)?;
    }
    let type_arguments = ops.type_arguments();
    let token = ops.token()?;
    let kind = match token.kind {
        TokenKind::This => ConstructorCallKind::This,
        _ => ConstructorCallKind::Super,
    };
    let arguments = ops.arguments()?;
    Ok(TreeNode::Statement(Statement::ConstructorCall(ConstructorCall {
        kind,
        qualifier,
        type_arguments,
        arguments,
        position: token.position,
    })))
}

fn enum_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    ops.expect(TokenKind::Enum)?;
    let name = ops.identifier()?;
    let interfaces = take_interfaces(ops);
    let (constants, body) = match ops.next()? {
        TreeNode::EnumBody { constants, body } => (constants, body),
        other => return Err(ops.unexpected("enum body", &other)),
    };
    Ok(TreeNode::TypeDeclaration(TypeDeclaration::Enum(EnumDeclaration {
        modifiers,
        name,
        interfaces,
        constants,
        body,
    })))
}

fn enum_body(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::LeftCurly)?.position;
    let mut constants = Vec::new();
    let mut body = ClassBody {
        members: Vec::new(),
        position,
    };
    for item in ops.items() {
        match item {
            TreeNode::EnumConstant(constant) => constants.push(constant),
            TreeNode::ClassBody(members) => body = members,
            other => return Err(ops.unexpected("enum constant", &other)),
        }
    }
    Ok(TreeNode::EnumBody { constants, body })
}

fn enum_constant(ops: &mut Operands<'_>) -> Reduced {
    let annotations = ops.annotations()?;
    let name = ops.identifier()?;
    let arguments = match ops.take_if(|node| matches!(node, TreeNode::Arguments(_))) {
        Some(TreeNode::Arguments(arguments)) => Some(arguments),
        _ => None,
    };
    let body = match ops.take_if(|node| matches!(node, TreeNode::ClassBody(_))) {
        Some(TreeNode::ClassBody(body)) => Some(body),
        _ => None,
    };
    Ok(TreeNode::EnumConstant(EnumConstant {
        annotations,
        name,
        arguments,
        body,
    }))
}

fn enum_body_declarations(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::Semicolon)?.position;
    let items = ops.items();
    Ok(TreeNode::ClassBody(ClassBody {
        members: members(ops, items)?,
        position,
    }))
}

fn array_initializer(ops: &mut Operands<'_>) -> Reduced {
    Ok(TreeNode::Expression(Expression::ArrayInitializer(ops.expressions()?)))
}

fn statement(ops: &Operands<'_>, node: TreeNode) -> Result<Statement, TreeBuildError> {
    let found = node.kind_name();
    node.into_statement().ok_or_else(|| TreeBuildError::UnexpectedOperand {
        rule: ops.rule().into(),
        expected: "statement",
        found,
    })
}

fn next_statement(ops: &mut Operands<'_>) -> Result<Statement, TreeBuildError> {
    let node = ops.next()?;
    statement(ops, node)
}

/// `{ statements }`, also used for constructor bodies
fn block(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::LeftCurly)?.position;
    let statements = ops
        .items()
        .into_iter()
        .map(|item| statement(ops, item))
        .collect::<Result<_, _>>()?;
    Ok(TreeNode::Block(Block { statements, position }))
}

fn local_variable_statement(ops: &mut Operands<'_>) -> Reduced {
    match ops.next()? {
        TreeNode::LocalVariable(declaration) => Ok(TreeNode::Statement(Statement::LocalVariable(declaration))),
        other => Err(ops.unexpected("local variable declaration", &other)),
    }
}

fn local_variable_declaration(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    let ty = ops.ty()?;
    let declarators = declarators(ops)?;
    Ok(TreeNode::LocalVariable(LocalVariableDeclaration {
        modifiers,
        ty,
        declarators,
    }))
}

fn empty_statement(ops: &mut Operands<'_>) -> Reduced {
    Ok(TreeNode::Statement(Statement::Empty(ops.token()?.position)))
}

fn labeled_statement(ops: &mut Operands<'_>) -> Reduced {
    let label = ops.identifier()?;
    ops.expect(TokenKind::Colon)?;
    let statement = Box::new(next_statement(ops)?);
    Ok(TreeNode::Statement(Statement::Labeled { label, statement }))
}

fn expression_statement(ops: &mut Operands<'_>) -> Reduced {
    Ok(TreeNode::Statement(Statement::Expression(ops.expression()?)))
}

/// `if (c) s` and `if (c) s else s`
fn if_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::If)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let condition = ops.expression()?;
    ops.expect(TokenKind::RightParenthesis)?;
    let then = Box::new(next_statement(ops)?);
    let otherwise = match ops.eat(TokenKind::Else) {
        Some(_) => Some(Box::new(next_statement(ops)?)),
        None => None,
    };
    Ok(TreeNode::Statement(Statement::If {
        condition,
        then,
        otherwise,
    }))
}

fn assert_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Assert)?;
    let condition = ops.expression()?;
    let message = match ops.eat(TokenKind::Colon) {
        Some(_) => Some(ops.expression()?),
        None => None,
    };
    Ok(TreeNode::Statement(Statement::Assert { condition, message }))
}

fn switch_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Switch)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let selector = ops.expression()?;
    ops.expect(TokenKind::RightParenthesis)?;
    let groups = match ops.next()? {
        TreeNode::SwitchBlock(groups) => groups,
        other => return Err(ops.unexpected("switch block", &other)),
    };
    Ok(TreeNode::Statement(Statement::Switch { selector, groups }))
}

fn switch_block(ops: &mut Operands<'_>) -> Reduced {
    let mut groups = Vec::new();
    let mut trailing = Vec::new();
    for item in ops.items() {
        match item {
            TreeNode::SwitchGroup(group) => groups.push(group),
            TreeNode::SwitchLabel(label) => trailing.push(label),
            other => return Err(ops.unexpected("switch group", &other)),
        }
    }
    if !trailing.is_empty() {
        groups.push(SwitchGroup {
            labels: trailing,
            statements: Vec::new(),
        });
    }
    Ok(TreeNode::SwitchBlock(groups))
}

fn switch_group(ops: &mut Operands<'_>) -> Reduced {
    let mut labels = Vec::new();
    let mut statements = Vec::new();
    for item in ops.items() {
        match item {
            TreeNode::SwitchLabel(label) => labels.push(label),
            other => statements.push(statement(ops, other)?),
        }
    }
    Ok(TreeNode::SwitchGroup(SwitchGroup { labels, statements }))
}

fn switch_label(ops: &mut Operands<'_>) -> Reduced {
    let token = ops.token()?;
    let label = if token.kind == TokenKind::Default {
        SwitchLabel::Default(token.position)
    } else {
        SwitchLabel::Case(ops.expression()?)
    };
    Ok(TreeNode::SwitchLabel(label))
}

fn while_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::While)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let condition = ops.expression()?;
    ops.expect(TokenKind::RightParenthesis)?;
    let body = Box::new(next_statement(ops)?);
    Ok(TreeNode::Statement(Statement::While { condition, body }))
}

fn do_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Do)?;
    let body = Box::new(next_statement(ops)?);
    ops.expect(TokenKind::While)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let condition = ops.expression()?;
    Ok(TreeNode::Statement(Statement::Do { body, condition }))
}

/// `for (init; condition; update) body`; each header part is optional, so the
/// parts are told apart by the `;` tokens between them
fn basic_for(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::For)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let mut init = None;
    if !ops.at(TokenKind::Semicolon) {
        init = Some(match ops.next()? {
            TreeNode::LocalVariable(declaration) => ForInit::Declaration(declaration),
            node => ForInit::Expressions(expressions_of(ops, node)?),
        });
    }
    ops.expect(TokenKind::Semicolon)?;
    let condition = ops.take_expression();
    ops.expect(TokenKind::Semicolon)?;
    let mut update = Vec::new();
    if !ops.at(TokenKind::RightParenthesis) {
        let node = ops.next()?;
        update = expressions_of(ops, node)?;
    }
    ops.expect(TokenKind::RightParenthesis)?;
    let body = Box::new(next_statement(ops)?);
    Ok(TreeNode::Statement(Statement::For {
        init,
        condition,
        update,
        body,
    }))
}

fn expression_of(ops: &Operands<'_>, node: TreeNode) -> Result<Expression, TreeBuildError> {
    let found = node.kind_name();
    node.into_expression().ok_or_else(|| TreeBuildError::UnexpectedOperand {
        rule: ops.rule().into(),
        expected: "expression",
        found,
    })
}

fn expressions_of(ops: &Operands<'_>, node: TreeNode) -> Result<Vec<Expression>, TreeBuildError> {
    node.into_items()
        .into_iter()
        .map(|item| expression_of(ops, item))
        .collect()
}

fn enhanced_for(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::For)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let modifiers = ops.modifiers()?;
    let ty = ops.ty()?;
    let declarator = match ops.next()? {
        TreeNode::VariableDeclarator(declarator) => declarator,
        other => return Err(ops.unexpected("variable name", &other)),
    };
    ops.expect(TokenKind::Colon)?;
    let iterable = ops.expression()?;
    ops.expect(TokenKind::RightParenthesis)?;
    let body = Box::new(next_statement(ops)?);
    Ok(TreeNode::Statement(Statement::EnhancedFor {
        variable: LocalVariableDeclaration {
            modifiers,
            ty,
            declarators: vec![declarator],
        },
        iterable,
        body,
    }))
}

/// `break [label];` and `continue [label];`
fn jump_statement(ops: &mut Operands<'_>) -> Reduced {
    let token = ops.token()?;
    let label = ops.take_identifier();
    Ok(TreeNode::Statement(if token.kind == TokenKind::Break {
        Statement::Break(label, token.position)
    } else {
        Statement::Continue(label, token.position)
    }))
}

fn return_statement(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::Return)?.position;
    Ok(TreeNode::Statement(Statement::Return(ops.take_expression(), position)))
}

fn throw_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Throw)?;
    Ok(TreeNode::Statement(Statement::Throw(ops.expression()?)))
}

fn synchronized_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Synchronized)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let lock = ops.expression()?;
    ops.expect(TokenKind::RightParenthesis)?;
    let body = ops.block()?;
    Ok(TreeNode::Statement(Statement::Synchronized { lock, body }))
}

fn try_statement(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Try)?;
    let resources = match ops.take_if(|node| matches!(node, TreeNode::Resources(_))) {
        Some(TreeNode::Resources(resources)) => resources,
        _ => Vec::new(),
    };
    let body = ops.block()?;
    let mut catches = Vec::new();
    let mut finally = None;
    for item in ops.items() {
        match item {
            TreeNode::CatchClause(clause) => catches.push(clause),
            TreeNode::Finally(block) => finally = Some(block),
            other => return Err(ops.unexpected("catch or finally", &other)),
        }
    }
    Ok(TreeNode::Statement(Statement::Try(TryStatement {
        resources,
        body,
        catches,
        finally,
    })))
}

fn catch_clause(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Catch)?;
    ops.expect(TokenKind::LeftParenthesis)?;
    let modifiers = ops.modifiers()?;
    let types = ops
        .next()?
        .into_items()
        .into_iter()
        .map(|item| match item {
            TreeNode::Type(ty) => Ok(ty),
            other => Err(ops.unexpected("type", &other)),
        })
        .collect::<Result<_, _>>()?;
    let name = ops.identifier()?;
    ops.expect(TokenKind::RightParenthesis)?;
    let body = ops.block()?;
    Ok(TreeNode::CatchClause(CatchClause {
        modifiers,
        types,
        name,
        body,
    }))
}

fn finally(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::Finally)?;
    Ok(TreeNode::Finally(ops.block()?))
}

fn resource_specification(ops: &mut Operands<'_>) -> Reduced {
    let resources = ops
        .items()
        .into_iter()
        .map(|item| match item {
            TreeNode::Resource(resource) => Ok(resource),
            other => Err(ops.unexpected("resource", &other)),
        })
        .collect::<Result<_, _>>()?;
    Ok(TreeNode::Resources(resources))
}

fn resource(ops: &mut Operands<'_>) -> Reduced {
    let modifiers = ops.modifiers()?;
    let ty = ops.ty()?;
    let name = ops.identifier()?;
    ops.expect(TokenKind::Equal)?;
    let initializer = ops.expression()?;
    Ok(TreeNode::Resource(Resource {
        modifiers,
        ty,
        name,
        initializer,
    }))
}

/// `this`, `Outer.this` and `(expression)`
fn primary(ops: &mut Operands<'_>) -> Reduced {
    if let Some(this) = ops.eat(TokenKind::This) {
        return Ok(TreeNode::Expression(Expression::This(this.position)));
    }
    if ops.eat(TokenKind::LeftParenthesis).is_some() {
        return Ok(TreeNode::Expression(ops.expression()?));
    }
    let name = ops.name()?;
    Ok(TreeNode::Expression(Expression::QualifiedThis(name)))
}

fn name_as_type(name: DottedName) -> Type {
    Type::Class(ClassType {
        segments: name
            .parts
            .into_iter()
            .map(|name| SimpleClassType {
                annotations: Vec::new(),
                name,
                type_arguments: Vec::new(),
            })
            .collect(),
    })
}

fn class_literal(ops: &mut Operands<'_>) -> Reduced {
    let (ty, position) = match ops.next()? {
        TreeNode::Token(token) => (None, token.position),
        TreeNode::Name(name) => {
            let position = name.position();
            (Some(name_as_type(name)), position)
        }
        TreeNode::Type(ty) => {
            let position = ty.position();
            (Some(ty), position)
        }
        other => return Err(ops.unexpected("class literal type", &other)),
    };
    let dims = ops.dims();
    Ok(TreeNode::Expression(Expression::ClassLiteral {
        ty: ty.map(|ty| ty.with_dims(dims)),
        position,
    }))
}

/// `outer.new Inner()`
fn qualified_creation(ops: &mut Operands<'_>) -> Reduced {
    let outer = ops.expression()?;
    ops.expect(TokenKind::Dot)?;
    match ops.expression()? {
        Expression::New(mut creation) => {
            creation.outer = Some(Box::new(outer));
            Ok(TreeNode::Expression(Expression::New(creation)))
        }
        other => Err(ops.unexpected("class instance creation", &TreeNode::Expression(other))),
    }
}

fn class_instance_creation(ops: &mut Operands<'_>) -> Reduced {
    let position = ops.expect(TokenKind::New)?.position;
    let type_arguments = ops.type_arguments();
    let ty = ops.ty()?;
    let diamond = ops.take_if(|node| matches!(node, TreeNode::Diamond)).is_some();
    let arguments = ops.arguments()?;
    let body = match ops.take_if(|node| matches!(node, TreeNode::ClassBody(_))) {
        Some(TreeNode::ClassBody(body)) => Some(body),
        _ => None,
    };
    Ok(TreeNode::Expression(Expression::New(ClassInstanceCreation {
        outer: None,
        type_arguments,
        ty,
        diamond,
        arguments,
        body,
        position,
    })))
}

fn diamond(_: &mut Operands<'_>) -> Reduced {
    Ok(TreeNode::Diamond)
}

fn arguments(ops: &mut Operands<'_>) -> Reduced {
    Ok(TreeNode::Arguments(ops.expressions()?))
}

/// The part before `.` or `::`: a name, `super`, `Outer.super`, a type or any
/// other primary expression
fn receiver(ops: &mut Operands<'_>, separator: TokenKind) -> Result<Receiver, TreeBuildError> {
    let receiver = match ops.next()? {
        TreeNode::Token(token) if token.kind == TokenKind::Super => Receiver::Super(token.position),
        TreeNode::Name(name) => {
            if ops.at(TokenKind::Dot) && ops.contains(TokenKind::Super) {
                ops.expect(TokenKind::Dot)?;
                ops.expect(TokenKind::Super)?;
                Receiver::QualifiedSuper(name)
            } else {
                Receiver::Name(name)
            }
        }
        TreeNode::Type(ty) => Receiver::Type(ty),
        other => {
            let found = other.kind_name();
            match other.into_expression() {
                Some(expression) => Receiver::Expression(Box::new(expression)),
                None => {
                    return Err(TreeBuildError::UnexpectedOperand {
                        rule: ops.rule().into(),
                        expected: "receiver",
                        found,
                    });
                }
            }
        }
    };
    ops.expect(separator)?;
    Ok(receiver)
}

fn field_access(ops: &mut Operands<'_>) -> Reduced {
    let receiver = receiver(ops, TokenKind::Dot)?;
    let name = ops.identifier()?;
    Ok(TreeNode::Expression(Expression::FieldAccess { receiver, name }))
}

fn array_access(ops: &mut Operands<'_>) -> Reduced {
    let array = Box::new(ops.expression()?);
    ops.expect(TokenKind::LeftBracket)?;
    let index = Box::new(ops.expression()?);
    Ok(TreeNode::Expression(Expression::ArrayAccess { array, index }))
}

fn method_invocation(ops: &mut Operands<'_>) -> Reduced {
    if ops.len() == 2 {
        // `name(args)` and `a.b.name(args)`
        let (receiver, name) = ops.name()?.split_last();
        let name = name.ok_or_else(|| TreeBuildError::MissingOperand {
            rule: ops.rule().into(),
        })?;
        let arguments = ops.arguments()?;
        return Ok(TreeNode::Expression(Expression::MethodInvocation(MethodInvocation {
            receiver: receiver.map(Receiver::Name),
            type_arguments: Vec::new(),
            name,
            arguments,
        })));
    }
    let receiver = receiver(ops, TokenKind::Dot)?;
    let type_arguments = ops.type_arguments();
    let name = ops.identifier()?;
    let arguments = ops.arguments()?;
    Ok(TreeNode::Expression(Expression::MethodInvocation(MethodInvocation {
        receiver: Some(receiver),
        type_arguments,
        name,
        arguments,
    })))
}

fn method_reference(ops: &mut Operands<'_>) -> Reduced {
    let receiver = receiver(ops, TokenKind::DoubleColon)?;
    let type_arguments = ops.type_arguments();
    let name = match ops.eat(TokenKind::New) {
        Some(_) => None,
        None => Some(ops.identifier()?),
    };
    Ok(TreeNode::Expression(Expression::MethodReference {
        receiver,
        type_arguments,
        name,
    }))
}

fn array_creation(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::New)?;
    let element = ops.ty()?;
    let node = ops.next()?;
    let (dimensions, extra_dims, initializer) = match node {
        TreeNode::Dims(dims) => match ops.expression()? {
            Expression::ArrayInitializer(values) => (Vec::new(), dims, Some(values)),
            other => return Err(ops.unexpected("array initializer", &TreeNode::Expression(other))),
        },
        node => {
            let dimensions = expressions_of(ops, node)?;
            (dimensions, ops.dims(), None)
        }
    };
    Ok(TreeNode::Expression(Expression::NewArray {
        element,
        dimensions,
        extra_dims,
        initializer,
    }))
}

fn dim_expr(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::LeftBracket)?;
    Ok(TreeNode::Expression(ops.expression()?))
}

fn lambda(ops: &mut Operands<'_>) -> Reduced {
    let parameters = match ops.next()? {
        TreeNode::LambdaParameters(parameters) => parameters,
        other => return Err(ops.unexpected("lambda parameters", &other)),
    };
    let arrow = ops.expect(TokenKind::Arrow)?;
    let position = match &parameters {
        LambdaParameters::Inferred(names) => names.first().map(|name| name.position),
        LambdaParameters::Formal(parameters) => parameters.first().map(|parameter| parameter.name.position),
    }
    .unwrap_or(arrow.position);
    let body = match ops.next()? {
        TreeNode::Block(block) => LambdaBody::Block(block),
        node => LambdaBody::Expression(Box::new(expression_of(ops, node)?)),
    };
    Ok(TreeNode::Expression(Expression::Lambda(Lambda {
        parameters,
        body,
        position,
    })))
}

fn lambda_parameters(ops: &mut Operands<'_>) -> Reduced {
    let items = ops.rest();
    let mut inferred = Vec::new();
    let mut formal = Vec::new();
    for item in items.into_iter().flat_map(TreeNode::into_items) {
        match item {
            TreeNode::Token(_) => {}
            TreeNode::Identifier(identifier) => inferred.push(identifier),
            TreeNode::FormalParameter(parameter) => formal.push(parameter),
            other => return Err(ops.unexpected("lambda parameter", &other)),
        }
    }
    Ok(TreeNode::LambdaParameters(if formal.is_empty() {
        LambdaParameters::Inferred(inferred)
    } else {
        LambdaParameters::Formal(formal)
    }))
}

fn assignment(ops: &mut Operands<'_>) -> Reduced {
    let target = Box::new(ops.expression()?);
    let operator = ops.token()?.kind;
    let value = Box::new(ops.expression()?);
    Ok(TreeNode::Expression(Expression::Assignment {
        target,
        operator,
        value,
    }))
}

fn conditional(ops: &mut Operands<'_>) -> Reduced {
    let condition = Box::new(ops.expression()?);
    ops.expect(TokenKind::QuestionMark)?;
    let then = Box::new(ops.expression()?);
    ops.expect(TokenKind::Colon)?;
    let otherwise = Box::new(ops.expression()?);
    Ok(TreeNode::Expression(Expression::Ternary {
        condition,
        then,
        otherwise,
    }))
}

/// `left op right`, and `expression instanceof Type`
fn binary(ops: &mut Operands<'_>) -> Reduced {
    let left = Box::new(ops.expression()?);
    let operator = ops.token()?.kind;
    if operator == TokenKind::Instanceof {
        let ty = ops.ty()?;
        return Ok(TreeNode::Expression(Expression::InstanceOf { expression: left, ty }));
    }
    let right = Box::new(ops.expression()?);
    Ok(TreeNode::Expression(Expression::Binary { left, operator, right }))
}

fn prefix(ops: &mut Operands<'_>) -> Reduced {
    let operator = ops.token()?.kind;
    let operand = Box::new(ops.expression()?);
    Ok(TreeNode::Expression(Expression::Unary {
        operator,
        operand,
        postfix: false,
    }))
}

fn postfix(ops: &mut Operands<'_>) -> Reduced {
    let operand = Box::new(ops.expression()?);
    let operator = ops.token()?.kind;
    Ok(TreeNode::Expression(Expression::Unary {
        operator,
        operand,
        postfix: true,
    }))
}

/// `(Type) e` and `(A & B) e`
fn cast(ops: &mut Operands<'_>) -> Reduced {
    ops.expect(TokenKind::LeftParenthesis)?;
    let mut types = vec![ops.ty()?];
    while !ops.at(TokenKind::RightParenthesis) {
        for item in ops.next()?.into_items() {
            match item {
                TreeNode::Type(ty) => types.push(ty),
                other => return Err(ops.unexpected("type", &other)),
            }
        }
    }
    ops.expect(TokenKind::RightParenthesis)?;
    let expression = Box::new(ops.expression()?);
    Ok(TreeNode::Expression(Expression::Cast { types, expression }))
}
