//! # Javelin
//!
//! The front end of a compiler for a Java-like language: a lexer, an Earley
//! chart parser driven by an immutable grammar, and a tree builder that
//! reduces completed rules into a typed syntax tree.
//!
//! ## Overview
//!
//! - **Grammar driven**: the bundled grammar is plain text read at startup;
//!   any other grammar in the same format can be parsed with generic nodes
//! - **No backtracking**: all partial derivations are tracked column by column,
//!   so ambiguous prefixes cost nothing extra
//! - **Shared tables**: a [`Parser`] is built once and parses any number of
//!   files, concurrently with the `parallel` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use javelin::parser::Parser;
//!
//! let parser = Parser::java()?;
//! let unit = parser.parse_str("package demo; class Hello { void greet() { System.out.println(\"hi\"); } }")?;
//! assert_eq!(unit.kind_name(), "compilation unit");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Whole directories go through the [`Compiler`]:
//!
//! ```rust,no_run
//! use javelin::{CompilationSettings, Compiler};
//! use javelin::error::CompilerDiagnostics;
//!
//! let diagnostics = CompilerDiagnostics::new();
//! let compiler = Compiler::new(CompilationSettings::new(["src/main/java"]), &diagnostics)?;
//! match compiler.compile() {
//!     Ok(trees) => println!("parsed {} files", trees.len()),
//!     Err(error) => {
//!         for diagnostic in diagnostics.diagnostics() {
//!             eprintln!("{diagnostic}");
//!         }
//!         eprintln!("{error}");
//!     }
//! }
//! # Ok::<(), javelin::error::CompileError>(())
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] - Tokens and the token source contract
//! - [`grammar`] - Grammar model, grammar text and the predict cache
//! - [`earley`] - The chart parser
//! - [`syntax`] - Syntax tree, tree builder and visitor
//! - [`parser`] - Shared parser tables and batch parsing
//! - [`compiler`] - The pipeline over source directories
//! - [`error`] - Error types and diagnostics

pub mod compiler;
pub mod earley;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use compiler::{CompilationSettings, Compiler};
pub use error::{CompileError, GrammarError, LexerError, ParseError};
pub use grammar::{Grammar, GrammarBuilder, PredictCache, Rule};
pub use lexer::{Lexer, Token, TokenKind, TokenSource};
pub use parser::Parser;
pub use syntax::{SyntaxTree, TreeNode};
