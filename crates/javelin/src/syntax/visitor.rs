//! Read-only traversal of syntax trees.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which
//! visits the children of the node. Override a method to act on a node kind,
//! calling the `walk_*` function to keep descending. Returning
//! [`ControlFlow::Break`] stops the whole traversal.

use crate::syntax::decl::{ClassBody, CompilationUnit, EnumConstant, FormalParameter, Member, Modifier, TypeDeclaration};
use crate::syntax::expr::{ClassInstanceCreation, Expression, LambdaBody, LambdaParameters, Receiver};
use crate::syntax::stmt::{Block, ForInit, LocalVariableDeclaration, Statement, SwitchLabel};
use crate::syntax::types::{Annotation, AnnotationArguments, ElementValue, Type, TypeArgument, WildcardBound};
use std::ops::ControlFlow;

/// Trait for visiting syntax trees
pub trait Visitor {
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) -> ControlFlow<()> {
        walk_compilation_unit(self, unit)
    }

    fn visit_type_declaration(&mut self, declaration: &TypeDeclaration) -> ControlFlow<()> {
        walk_type_declaration(self, declaration)
    }

    fn visit_enum_constant(&mut self, constant: &EnumConstant) -> ControlFlow<()> {
        walk_enum_constant(self, constant)
    }

    fn visit_class_body(&mut self, body: &ClassBody) -> ControlFlow<()> {
        walk_class_body(self, body)
    }

    fn visit_member(&mut self, member: &Member) -> ControlFlow<()> {
        walk_member(self, member)
    }

    fn visit_block(&mut self, block: &Block) -> ControlFlow<()> {
        walk_block(self, block)
    }

    fn visit_statement(&mut self, statement: &Statement) -> ControlFlow<()> {
        walk_statement(self, statement)
    }

    fn visit_expression(&mut self, expression: &Expression) -> ControlFlow<()> {
        walk_expression(self, expression)
    }

    /// `new T(...)`, with or without an anonymous class body
    fn visit_class_instance_creation(&mut self, creation: &ClassInstanceCreation) -> ControlFlow<()> {
        walk_class_instance_creation(self, creation)
    }

    fn visit_type(&mut self, ty: &Type) -> ControlFlow<()> {
        walk_type(self, ty)
    }

    fn visit_annotation(&mut self, annotation: &Annotation) -> ControlFlow<()> {
        walk_annotation(self, annotation)
    }
}

pub fn walk_compilation_unit<V: Visitor + ?Sized>(visitor: &mut V, unit: &CompilationUnit) -> ControlFlow<()> {
    if let Some(package) = &unit.package {
        for annotation in &package.annotations {
            visitor.visit_annotation(annotation)?;
        }
    }
    for declaration in &unit.types {
        visitor.visit_type_declaration(declaration)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_type_declaration<V: Visitor + ?Sized>(
    visitor: &mut V,
    declaration: &TypeDeclaration,
) -> ControlFlow<()> {
    walk_modifiers(visitor, declaration.modifiers())?;
    match declaration {
        TypeDeclaration::Class(class) => {
            for parameter in &class.type_parameters {
                walk_types(visitor, &parameter.bounds)?;
            }
            if let Some(superclass) = &class.superclass {
                visitor.visit_type(superclass)?;
            }
            walk_types(visitor, &class.interfaces)?;
        }
        TypeDeclaration::Interface(interface) => {
            for parameter in &interface.type_parameters {
                walk_types(visitor, &parameter.bounds)?;
            }
            walk_types(visitor, &interface.extends)?;
        }
        TypeDeclaration::Enum(declaration) => {
            walk_types(visitor, &declaration.interfaces)?;
            for constant in &declaration.constants {
                visitor.visit_enum_constant(constant)?;
            }
        }
    }
    visitor.visit_class_body(declaration.body())
}

pub fn walk_enum_constant<V: Visitor + ?Sized>(visitor: &mut V, constant: &EnumConstant) -> ControlFlow<()> {
    for annotation in &constant.annotations {
        visitor.visit_annotation(annotation)?;
    }
    if let Some(arguments) = &constant.arguments {
        walk_expressions(visitor, arguments)?;
    }
    match &constant.body {
        Some(body) => visitor.visit_class_body(body),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_class_body<V: Visitor + ?Sized>(visitor: &mut V, body: &ClassBody) -> ControlFlow<()> {
    for member in &body.members {
        visitor.visit_member(member)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_member<V: Visitor + ?Sized>(visitor: &mut V, member: &Member) -> ControlFlow<()> {
    match member {
        Member::Field(field) => {
            walk_modifiers(visitor, &field.modifiers)?;
            visitor.visit_type(&field.ty)?;
            for declarator in &field.declarators {
                if let Some(initializer) = &declarator.initializer {
                    visitor.visit_expression(initializer)?;
                }
            }
            ControlFlow::Continue(())
        }
        Member::Method(method) => {
            walk_modifiers(visitor, &method.modifiers)?;
            if let Some(result) = &method.result {
                visitor.visit_type(result)?;
            }
            walk_parameters(visitor, &method.parameters)?;
            walk_types(visitor, &method.throws)?;
            match &method.body {
                Some(body) => visitor.visit_block(body),
                None => ControlFlow::Continue(()),
            }
        }
        Member::Constructor(constructor) => {
            walk_modifiers(visitor, &constructor.modifiers)?;
            walk_parameters(visitor, &constructor.parameters)?;
            walk_types(visitor, &constructor.throws)?;
            visitor.visit_block(&constructor.body)
        }
        Member::Type(declaration) => visitor.visit_type_declaration(declaration),
        Member::Initializer { block, .. } => visitor.visit_block(block),
    }
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) -> ControlFlow<()> {
    for statement in &block.statements {
        visitor.visit_statement(statement)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) -> ControlFlow<()> {
    match statement {
        Statement::Block(block) => visitor.visit_block(block),
        Statement::Empty(_) | Statement::Break(..) | Statement::Continue(..) => ControlFlow::Continue(()),
        Statement::LocalVariable(declaration) => walk_local_variable(visitor, declaration),
        Statement::LocalClass(declaration) => visitor.visit_type_declaration(declaration),
        Statement::Expression(expression) | Statement::Throw(expression) => visitor.visit_expression(expression),
        Statement::If {
            condition,
            then,
            otherwise,
        } => {
            visitor.visit_expression(condition)?;
            visitor.visit_statement(then)?;
            match otherwise {
                Some(otherwise) => visitor.visit_statement(otherwise),
                None => ControlFlow::Continue(()),
            }
        }
        Statement::While { condition, body } | Statement::Do { body, condition } => {
            visitor.visit_expression(condition)?;
            visitor.visit_statement(body)
        }
        Statement::For {
            init,
            condition,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => walk_local_variable(visitor, declaration)?,
                Some(ForInit::Expressions(expressions)) => walk_expressions(visitor, expressions)?,
                None => {}
            }
            if let Some(condition) = condition {
                visitor.visit_expression(condition)?;
            }
            walk_expressions(visitor, update)?;
            visitor.visit_statement(body)
        }
        Statement::EnhancedFor {
            variable,
            iterable,
            body,
        } => {
            walk_local_variable(visitor, variable)?;
            visitor.visit_expression(iterable)?;
            visitor.visit_statement(body)
        }
        Statement::Labeled { statement, .. } => visitor.visit_statement(statement),
        Statement::Return(value, _) => match value {
            Some(value) => visitor.visit_expression(value),
            None => ControlFlow::Continue(()),
        },
        Statement::Synchronized { lock, body } => {
            visitor.visit_expression(lock)?;
            visitor.visit_block(body)
        }
        Statement::Try(statement) => {
            for resource in &statement.resources {
                walk_modifiers(visitor, &resource.modifiers)?;
                visitor.visit_type(&resource.ty)?;
                visitor.visit_expression(&resource.initializer)?;
            }
            visitor.visit_block(&statement.body)?;
            for clause in &statement.catches {
                walk_modifiers(visitor, &clause.modifiers)?;
                walk_types(visitor, &clause.types)?;
                visitor.visit_block(&clause.body)?;
            }
            match &statement.finally {
                Some(block) => visitor.visit_block(block),
                None => ControlFlow::Continue(()),
            }
        }
        Statement::Switch { selector, groups } => {
            visitor.visit_expression(selector)?;
            for group in groups {
                for label in &group.labels {
                    if let SwitchLabel::Case(expression) = label {
                        visitor.visit_expression(expression)?;
                    }
                }
                for statement in &group.statements {
                    visitor.visit_statement(statement)?;
                }
            }
            ControlFlow::Continue(())
        }
        Statement::Assert { condition, message } => {
            visitor.visit_expression(condition)?;
            match message {
                Some(message) => visitor.visit_expression(message),
                None => ControlFlow::Continue(()),
            }
        }
        Statement::ConstructorCall(call) => {
            if let Some(qualifier) = &call.qualifier {
                visitor.visit_expression(qualifier)?;
            }
            walk_type_arguments(visitor, &call.type_arguments)?;
            walk_expressions(visitor, &call.arguments)
        }
    }
}

pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) -> ControlFlow<()> {
    match expression {
        Expression::Literal(_) | Expression::Name(_) | Expression::This(_) | Expression::QualifiedThis(_) => {
            ControlFlow::Continue(())
        }
        Expression::Binary { left, right, .. } => {
            visitor.visit_expression(left)?;
            visitor.visit_expression(right)
        }
        Expression::Unary { operand, .. } => visitor.visit_expression(operand),
        Expression::Ternary {
            condition,
            then,
            otherwise,
        } => {
            visitor.visit_expression(condition)?;
            visitor.visit_expression(then)?;
            visitor.visit_expression(otherwise)
        }
        Expression::Assignment { target, value, .. } => {
            visitor.visit_expression(target)?;
            visitor.visit_expression(value)
        }
        Expression::InstanceOf { expression, ty } => {
            visitor.visit_expression(expression)?;
            visitor.visit_type(ty)
        }
        Expression::Cast { types, expression } => {
            walk_types(visitor, types)?;
            visitor.visit_expression(expression)
        }
        Expression::MethodInvocation(invocation) => {
            if let Some(receiver) = &invocation.receiver {
                walk_receiver(visitor, receiver)?;
            }
            walk_type_arguments(visitor, &invocation.type_arguments)?;
            walk_expressions(visitor, &invocation.arguments)
        }
        Expression::FieldAccess { receiver, .. } => walk_receiver(visitor, receiver),
        Expression::ArrayAccess { array, index } => {
            visitor.visit_expression(array)?;
            visitor.visit_expression(index)
        }
        Expression::New(creation) => visitor.visit_class_instance_creation(creation),
        Expression::NewArray {
            element,
            dimensions,
            initializer,
            ..
        } => {
            visitor.visit_type(element)?;
            walk_expressions(visitor, dimensions)?;
            match initializer {
                Some(values) => walk_expressions(visitor, values),
                None => ControlFlow::Continue(()),
            }
        }
        Expression::ArrayInitializer(values) => walk_expressions(visitor, values),
        Expression::Lambda(lambda) => {
            if let LambdaParameters::Formal(parameters) = &lambda.parameters {
                walk_parameters(visitor, parameters)?;
            }
            match &lambda.body {
                LambdaBody::Expression(expression) => visitor.visit_expression(expression),
                LambdaBody::Block(block) => visitor.visit_block(block),
            }
        }
        Expression::MethodReference {
            receiver,
            type_arguments,
            ..
        } => {
            walk_receiver(visitor, receiver)?;
            walk_type_arguments(visitor, type_arguments)
        }
        Expression::ClassLiteral { ty, .. } => match ty {
            Some(ty) => visitor.visit_type(ty),
            None => ControlFlow::Continue(()),
        },
    }
}

pub fn walk_class_instance_creation<V: Visitor + ?Sized>(
    visitor: &mut V,
    creation: &ClassInstanceCreation,
) -> ControlFlow<()> {
    if let Some(outer) = &creation.outer {
        visitor.visit_expression(outer)?;
    }
    walk_type_arguments(visitor, &creation.type_arguments)?;
    visitor.visit_type(&creation.ty)?;
    walk_expressions(visitor, &creation.arguments)?;
    match &creation.body {
        Some(body) => visitor.visit_class_body(body),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_type<V: Visitor + ?Sized>(visitor: &mut V, ty: &Type) -> ControlFlow<()> {
    match ty {
        Type::Primitive(primitive) => {
            for annotation in &primitive.annotations {
                visitor.visit_annotation(annotation)?;
            }
            ControlFlow::Continue(())
        }
        Type::Class(class) => {
            for segment in &class.segments {
                for annotation in &segment.annotations {
                    visitor.visit_annotation(annotation)?;
                }
                walk_type_arguments(visitor, &segment.type_arguments)?;
            }
            ControlFlow::Continue(())
        }
        Type::Array { element, .. } => visitor.visit_type(element),
    }
}

pub fn walk_annotation<V: Visitor + ?Sized>(visitor: &mut V, annotation: &Annotation) -> ControlFlow<()> {
    match &annotation.arguments {
        AnnotationArguments::Marker => ControlFlow::Continue(()),
        AnnotationArguments::Single(value) => walk_element_value(visitor, value),
        AnnotationArguments::Pairs(pairs) => {
            for pair in pairs {
                walk_element_value(visitor, &pair.value)?;
            }
            ControlFlow::Continue(())
        }
    }
}

fn walk_element_value<V: Visitor + ?Sized>(visitor: &mut V, value: &ElementValue) -> ControlFlow<()> {
    match value {
        ElementValue::Expression(expression) => visitor.visit_expression(expression),
        ElementValue::Array(values) => {
            for value in values {
                walk_element_value(visitor, value)?;
            }
            ControlFlow::Continue(())
        }
        ElementValue::Annotation(annotation) => visitor.visit_annotation(annotation),
    }
}

fn walk_receiver<V: Visitor + ?Sized>(visitor: &mut V, receiver: &Receiver) -> ControlFlow<()> {
    match receiver {
        Receiver::Expression(expression) => visitor.visit_expression(expression),
        Receiver::Type(ty) => visitor.visit_type(ty),
        Receiver::Name(_) | Receiver::Super(_) | Receiver::QualifiedSuper(_) => ControlFlow::Continue(()),
    }
}

fn walk_local_variable<V: Visitor + ?Sized>(
    visitor: &mut V,
    declaration: &LocalVariableDeclaration,
) -> ControlFlow<()> {
    walk_modifiers(visitor, &declaration.modifiers)?;
    visitor.visit_type(&declaration.ty)?;
    for declarator in &declaration.declarators {
        if let Some(initializer) = &declarator.initializer {
            visitor.visit_expression(initializer)?;
        }
    }
    ControlFlow::Continue(())
}

fn walk_modifiers<V: Visitor + ?Sized>(visitor: &mut V, modifiers: &[Modifier]) -> ControlFlow<()> {
    for modifier in modifiers {
        if let Modifier::Annotation(annotation) = modifier {
            visitor.visit_annotation(annotation)?;
        }
    }
    ControlFlow::Continue(())
}

fn walk_parameters<V: Visitor + ?Sized>(visitor: &mut V, parameters: &[FormalParameter]) -> ControlFlow<()> {
    for parameter in parameters {
        walk_modifiers(visitor, &parameter.modifiers)?;
        visitor.visit_type(&parameter.ty)?;
    }
    ControlFlow::Continue(())
}

fn walk_types<V: Visitor + ?Sized>(visitor: &mut V, types: &[Type]) -> ControlFlow<()> {
    for ty in types {
        visitor.visit_type(ty)?;
    }
    ControlFlow::Continue(())
}

fn walk_type_arguments<V: Visitor + ?Sized>(visitor: &mut V, arguments: &[TypeArgument]) -> ControlFlow<()> {
    for argument in arguments {
        match argument {
            TypeArgument::Type(ty)
            | TypeArgument::Wildcard(Some(WildcardBound::Extends(ty) | WildcardBound::Super(ty))) => {
                visitor.visit_type(ty)?;
            }
            TypeArgument::Wildcard(None) => {}
        }
    }
    ControlFlow::Continue(())
}

fn walk_expressions<V: Visitor + ?Sized>(visitor: &mut V, expressions: &[Expression]) -> ControlFlow<()> {
    for expression in expressions {
        visitor.visit_expression(expression)?;
    }
    ControlFlow::Continue(())
}
