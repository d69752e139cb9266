//! The column loop of the Earley parser

use crate::earley::EarleyParser;
use crate::earley::chart::{Column, Segment};
use crate::earley::merged::MultiState;
use crate::earley::state::State;
use crate::error::{LexerError, ParseError};
use crate::grammar::{Part, RuleName};
use crate::lexer::{Token, TokenKind, TokenSource};
use crate::syntax::{ParsePosition, TreeNode};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

/// Parse the whole token source.
///
/// A `>>` or `>>>` scanned where a single `>` was also possible may close
/// nested type arguments instead of shifting. When the parse fails after
/// such a token, it is retried from the start with the latest one split into
/// single `>` tokens. The furthest syntax error over all attempts is reported.
pub(super) fn parse(parser: &EarleyParser<'_>, source: &mut impl TokenSource) -> Result<Arc<TreeNode>, ParseError> {
    let started = Instant::now();
    let mut input = Replay::new(source);
    let mut splits = BTreeSet::new();
    let mut furthest: Option<ParseError> = None;

    loop {
        let mut shifts = Vec::new();
        let error = match run(parser, &mut input, &splits, &mut shifts) {
            Ok((root, columns, states)) => {
                log::debug!("parsed {columns} columns with {states} states in {:?}", started.elapsed());
                return Ok(root);
            }
            Err(error @ ParseError::Syntax { .. }) => error,
            Err(error) => return Err(error),
        };
        let error = match furthest.take() {
            Some(best) if best.position() >= error.position() => best,
            _ => error,
        };
        match shifts.into_iter().rev().find(|position| !splits.contains(position)) {
            Some(position) => {
                log::debug!("retrying with the shift at {position} split into '>' tokens");
                splits.insert(position);
                input.rewind();
                furthest = Some(error);
            }
            None => return Err(error),
        }
    }
}

/// One pass over the input; records every ambiguous shift token it scanned
fn run(
    parser: &EarleyParser<'_>,
    input: &mut Replay<'_, impl TokenSource>,
    splits: &BTreeSet<ParsePosition>,
    shifts: &mut Vec<ParsePosition>,
) -> Result<(Arc<TreeNode>, usize, usize), ParseError> {
    let grammar = parser.grammar;

    let mut first = Column::new(0);
    for &rule in parser.predictions.get(grammar.start()) {
        first.add(Segment::Predicted, State::predicted(rule, 0), grammar);
    }
    first.mark_predicted(grammar.start());
    let mut chart = vec![first];

    let root = loop {
        let accepted = close_column(parser, &mut chart)?;
        // the chart starts with one column and only grows
        let column = &chart[chart.len() - 1];
        let possible = column.view().possible_next_tokens();
        if parser.config.type_context_detection {
            input.set_inside_type_context(
                possible.contains(&TokenKind::Gt) && !possible.contains(&TokenKind::RightShift),
            );
        }

        let token = input.next(splits)?;
        if token.kind == TokenKind::EndOfInput && !possible.contains(&TokenKind::EndOfInput) {
            // the grammar does not mention end of input: the whole input is
            // accepted if the start rule completed over all of it
            break accepted.ok_or_else(|| syntax_error(&token, possible))?;
        }
        if is_shift(token.kind) && possible.contains(&TokenKind::Gt) {
            shifts.push(token.position);
        }

        let next = scan(parser, column, &token);
        if next.is_empty() {
            return Err(syntax_error(&token, possible));
        }
        chart.push(next);

        if token.kind == TokenKind::EndOfInput {
            let accepted = close_column(parser, &mut chart)?;
            let expected = chart
                .last()
                .map(|column| column.view().possible_next_tokens())
                .unwrap_or_default();
            break accepted.ok_or_else(|| syntax_error(&token, expected))?;
        }
    };

    Ok((root, chart.len(), chart.iter().map(Column::len).sum()))
}

const fn is_shift(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::RightShift | TokenKind::RightShiftUnsigned)
}

/// Significant tokens pulled from a token source, kept so a parse can be replayed
struct Replay<'s, S> {
    source: &'s mut S,
    tokens: Vec<Token>,
    cursor: usize,
    pending: VecDeque<Token>,
}

impl<'s, S: TokenSource> Replay<'s, S> {
    fn new(source: &'s mut S) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    /// Only tokens not yet pulled from the source are affected
    fn set_inside_type_context(&mut self, inside: bool) {
        if self.cursor == self.tokens.len() {
            self.source.set_inside_type_context(inside);
        }
    }

    /// The next token; shifts at `splits` come out as one `>` per character
    fn next(&mut self, splits: &BTreeSet<ParsePosition>) -> Result<Token, ParseError> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }
        let token = match self.tokens.get(self.cursor) {
            Some(token) => token.clone(),
            None => {
                let token = next_significant(&mut *self.source)?;
                self.tokens.push(token.clone());
                token
            }
        };
        self.cursor += 1;
        if !is_shift(token.kind) || !splits.contains(&token.position) {
            return Ok(token);
        }
        let ParsePosition { line, column } = token.position;
        let width = u32::try_from(token.text.len()).unwrap_or(1);
        self.pending.extend(
            (1..width).map(|offset| Token::new(TokenKind::Gt, ">", ParsePosition::new(line, column + offset))),
        );
        Ok(Token::new(TokenKind::Gt, ">", token.position))
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.pending.clear();
    }
}

/// Predict and complete in the last column until nothing new is added.
///
/// Returns the first reduction of the start rule spanning the whole input so far.
fn close_column(parser: &EarleyParser<'_>, chart: &mut [Column]) -> Result<Option<Arc<TreeNode>>, ParseError> {
    let grammar = parser.grammar;
    let Some((column, earlier)) = chart.split_last_mut() else {
        return Ok(None);
    };
    let mut accepted = None;
    let mut cursor = 0;

    while let Some(state) = column.agenda(cursor) {
        cursor += 1;
        match state.next_part(grammar) {
            Some(Part::Rule(name)) => predict(parser, column, name),
            Some(Part::Token(_)) => {}
            None => {
                let rule = grammar.rule(state.rule());
                let origin = state.origin();
                let node = parser.builder.reduce(rule, state.operands().clone())?;
                if origin == 0 && rule.name() == grammar.start() && accepted.is_none() {
                    accepted = Some(Arc::clone(&node));
                }
                // rules are never empty, so the origin is an earlier column
                let Some(waiting) = earlier.get(origin) else {
                    continue;
                };
                let advanced: Vec<State> = waiting
                    .view()
                    .states_waiting_on_rule(rule.name())
                    .map(|parent| parent.advance(Arc::clone(&node)))
                    .collect();
                for state in advanced {
                    column.add(Segment::Completed, state, grammar);
                }
            }
        }
    }

    if parser.config.trace_columns {
        let (scanned, completed, predicted) = column.segment_sizes();
        log::trace!(
            "column {}: {scanned} scanned, {completed} completed, {predicted} predicted",
            column.index()
        );
    }
    Ok(accepted)
}

fn predict(parser: &EarleyParser<'_>, column: &mut Column, name: RuleName) {
    if !column.mark_predicted(name) {
        return;
    }
    let origin = column.index();
    for &rule in parser.predictions.get(name) {
        column.add(Segment::Predicted, State::predicted(rule, origin), parser.grammar);
    }
}

/// Advance every state waiting on `token` into a new column
fn scan(parser: &EarleyParser<'_>, column: &Column, token: &Token) -> Column {
    let leaf = Arc::new(TreeNode::from_token(token.clone()));
    let mut next = Column::new(column.index() + 1);
    for state in column.view().states_waiting_on_token(token.kind) {
        next.add(Segment::Scanned, state.advance(Arc::clone(&leaf)), parser.grammar);
    }
    next
}

/// The next token that is neither whitespace nor a comment
fn next_significant(source: &mut impl TokenSource) -> Result<Token, ParseError> {
    loop {
        let token = source.next_token();
        if token.kind.is_trivia() {
            continue;
        }
        if let Some(error) = token.error() {
            return Err(LexerError::new(token.position, error.clone()).into());
        }
        return Ok(token);
    }
}

fn syntax_error(token: &Token, expected: BTreeSet<TokenKind>) -> ParseError {
    ParseError::Syntax {
        position: token.position,
        found: token.kind,
        expected: expected.into_iter().collect(),
    }
}
